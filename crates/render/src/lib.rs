//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderer cannot mutate simulation state.
//! - Everything drawn derives from `SimState` and the camera rig of the last tick.
//!
//! Backends implement `Renderer`; `DebugTextRenderer` is the headless one used
//! by the CLI and tests.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{GROUND_SIZE, SKY_COLOR, SceneObject, SceneObjectKind, scene_objects};
