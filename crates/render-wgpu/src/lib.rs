//! wgpu render backend for the demo scene.
//!
//! Draws every `SceneObject` as a lit, instanced box over a grid of ground
//! lines and clears to the sky color.
//!
//! # Invariants
//! - Renderer never mutates simulation state.
//! - The view comes from the kernel's camera rig; this crate owns only the
//!   projection.

mod camera;
mod gpu;
mod shaders;

pub use camera::Projection;
pub use gpu::WgpuRenderer;
