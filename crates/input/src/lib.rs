//! Input: raw device events mapped to held controls and discrete actions.
//!
//! # Invariants
//! - The simulator consumes `FrameInput` snapshots, never raw device events.
//! - Discrete actions are queued once per press and drained once per tick.

pub mod action;
pub mod bindings;
pub mod event;
pub mod script;
pub mod state;

pub use action::{Action, Control};
pub use bindings::{BindingError, KeyBindings};
pub use event::{InputEvent, Key, KeyParseError, MouseButton};
pub use script::{InputScript, ScriptError, parse_script};
pub use state::{FrameInput, InputState};
