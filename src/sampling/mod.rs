//! Blue-noise point generation for filler sites.

mod poisson;

pub use poisson::{poisson_disk, PoissonDiskSampler};
