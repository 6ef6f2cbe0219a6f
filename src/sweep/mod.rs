//! Sweep layer: axis configuration + job matrix generation.
//!
//! This module is intentionally separate from dispatching and parsing. It
//! owns:
//! - SweepConfig (the enumerated benchmark axes, JSON-configurable)
//! - JobDescriptor and the pure matrix enumeration

pub mod config;
pub mod matrix;

pub use config::{ImageEntry, ProgramVariant, SweepConfig, VariantClass};
pub use matrix::{JobDescriptor, generate_jobs};
