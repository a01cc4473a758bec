//! Developer tooling: frame rate counter and state inspector.
//!
//! # Invariants
//! - Tools only read simulation state.

mod fps;
mod inspector;

pub use fps::FpsCounter;
pub use inspector::{StateInspector, StateSummary};
