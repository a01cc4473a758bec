//! Shared types for the blockrange workspace: transforms and gameplay tuning.
//!
//! # Invariants
//! - `Tuning` values that reach the simulator have passed `Tuning::validate`;
//!   `Tuning::from_json`, `Tuning::load` and `FrameSimulator::new` all check it.

mod tuning;
mod types;

pub use tuning::{Tuning, TuningError};
pub use types::Transform;
