//! Faction identity and display metadata.
//!
//! Faction codes are resolved to a small integer [`FactionId`] once at
//! ingestion. The geometry core only ever sees ids; names and colors are
//! looked up again when labels are sized and when results are rendered.

use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Compact faction identity carried through the geometry core.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct FactionId(pub u16);

impl FactionId {
    /// Territory owned by nobody. Filler sites outside every faction's reach
    /// carry this id.
    pub const UNCLAIMED: FactionId = FactionId(0);

    #[inline]
    pub fn is_unclaimed(self) -> bool {
        self == Self::UNCLAIMED
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display metadata of a faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub short_name: String,
    pub long_name: String,
    /// Any color string the renderer understands, e.g. `"#aa3300"`.
    pub color: String,
}

impl Faction {
    pub fn new(
        short_name: impl Into<String>,
        long_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
            color: color.into(),
        }
    }
}

/// Code of the synthetic faction for contested systems.
pub const DISPUTED_CODE: &str = "D";
/// Code of the faction for unaligned systems, always drawn black.
pub const INDEPENDENT_CODE: &str = "I";

const INDEPENDENT_COLOR: &str = "#000000";
const DISPUTED_COLOR: &str = "#808080";

/// Maps faction codes to ids and ids to metadata.
///
/// Ids are assigned in registration order starting at 1; id 0 is
/// [`FactionId::UNCLAIMED`] and has no metadata.
#[derive(Debug, Clone, Default)]
pub struct FactionRegistry {
    codes: Vec<String>,
    factions: Vec<Faction>,
    by_code: HashMap<String, FactionId>,
}

impl FactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a faction under `code` and returns its new id.
    pub fn register(&mut self, code: impl Into<String>, faction: Faction) -> Result<FactionId> {
        let code = code.into();
        if self.by_code.contains_key(&code) {
            return Err(MapError::DuplicateFaction(code));
        }
        let raw = u16::try_from(self.factions.len() + 1).map_err(|_| {
            MapError::InvalidConfig(format!("too many factions at {code:?}"))
        })?;
        let id = FactionId(raw);

        self.by_code.insert(code.clone(), id);
        self.codes.push(code);
        self.factions.push(faction);
        Ok(id)
    }

    /// Injects the two reserved factions.
    ///
    /// `D` ("Disputed") is added if missing. `I` ("Independent") is added if
    /// missing; an existing `I` keeps its names but is recolored black.
    pub fn register_reserved(&mut self) -> Result<()> {
        if !self.by_code.contains_key(DISPUTED_CODE) {
            self.register(
                DISPUTED_CODE,
                Faction::new("Disputed", "Disputed", DISPUTED_COLOR),
            )?;
        }

        match self.by_code.get(INDEPENDENT_CODE).copied() {
            Some(id) => {
                if let Some(faction) = self.get_mut(id) {
                    faction.color = INDEPENDENT_COLOR.to_string();
                }
            }
            None => {
                self.register(
                    INDEPENDENT_CODE,
                    Faction::new("Ind.", "Independent", INDEPENDENT_COLOR),
                )?;
            }
        }
        Ok(())
    }

    /// Resolves a faction code.
    pub fn id_of(&self, code: &str) -> Result<FactionId> {
        self.by_code
            .get(code)
            .copied()
            .ok_or_else(|| MapError::UnknownFaction(code.to_string()))
    }

    pub fn get(&self, id: FactionId) -> Option<&Faction> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.factions.get(index)
    }

    fn get_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(move |i| self.factions.get_mut(i))
    }

    /// The code a faction was registered under.
    pub fn code(&self, id: FactionId) -> Option<&str> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|i| self.codes.get(i))
            .map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.factions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }

    /// Iterates `(id, code, faction)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (FactionId, &str, &Faction)> {
        self.codes
            .iter()
            .zip(&self.factions)
            .enumerate()
            .map(|(i, (code, faction))| {
                (FactionId(i as u16 + 1), code.as_str(), faction)
            })
    }
}
