//! Axis-aligned rectangles tagged with an owner id.
//!
//! Every rectangle comparison in the crate goes through [`Rect::intersects`],
//! which treats rectangles as closed sets: rectangles that only touch along
//! an edge or a corner overlap.

use crate::primitives::Point2;
use std::fmt;

/// What a rectangle in the overlap grid stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RectKind {
    /// The dot drawn for a star system.
    Site,
    /// The name label of a star system.
    SiteLabel,
    /// The ellipse drawn around a cluster of systems.
    Cluster,
    /// The name label of a cluster.
    ClusterLabel,
    /// A label placed along a faction border.
    BorderLabel,
    /// Any other caller-supplied region that labels must avoid.
    Obstacle,
}

impl RectKind {
    fn as_str(self) -> &'static str {
        match self {
            RectKind::Site => "site",
            RectKind::SiteLabel => "site-label",
            RectKind::Cluster => "cluster",
            RectKind::ClusterLabel => "cluster-label",
            RectKind::BorderLabel => "border-label",
            RectKind::Obstacle => "obstacle",
        }
    }
}

/// Identity of a rectangle: its kind plus an index within that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RectId {
    pub kind: RectKind,
    pub index: usize,
}

impl RectId {
    #[inline]
    pub fn new(kind: RectKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for RectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.index)
    }
}

/// An axis-aligned rectangle `{x, y, w, h}` with an owner id.
///
/// Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub id: RectId,
}

impl Rect {
    /// Creates a rectangle, clamping negative extents to zero.
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64, id: RectId) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
            id,
        }
    }

    /// Creates the smallest rectangle containing all `points`.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn bounding<I>(points: I, id: RectId) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Point2::new(min.x.min(p.x), min.y.min(p.y));
            max = Point2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y, id))
    }

    /// Returns the same geometry under a different id.
    #[inline]
    pub fn with_id(self, id: RectId) -> Self {
        Self { id, ..self }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Returns `true` if the rectangles share at least one point.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains_point(&self, p: Point2<f64>) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Returns `true` if `other` lies completely inside this rectangle.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }

    /// Area shared by both rectangles (zero when they only touch).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Returns the rectangle grown by `margin` on every side.
    #[inline]
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
            self.id,
        )
    }
}
