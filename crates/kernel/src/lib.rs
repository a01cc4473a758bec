//! Simulation kernel: authoritative demo state and the per-frame step.
//!
//! # Invariants
//! - All state lives in `SimState`; the simulator holds only tuning.
//! - After every tick the player rests at or above ground height.
//! - Target and smoothed pitch stay within [-π/2, π/2].
//! - A projectile is removed exactly once and never comes back.

pub mod camera;
pub mod event;
pub mod simulator;
pub mod state;

pub use camera::{CameraOrientation, CameraRig};
pub use event::SimEvent;
pub use simulator::{FrameOutput, FrameSimulator};
pub use state::{GunState, PlayerState, Projectile, SimState};
