use std::collections::{HashSet, VecDeque};

use glam::Vec2;

use crate::action::{Action, Control};
use crate::bindings::KeyBindings;
use crate::event::{InputEvent, Key, MouseButton};

/// Everything the simulator needs from the player for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub held: HashSet<Control>,
    /// Pointer deltas in arrival order. Applied one by one so the pitch clamp
    /// sees each delta separately.
    pub look_deltas: Vec<Vec2>,
    /// Discrete actions in press order.
    pub actions: Vec<Action>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn with_held(mut self, control: Control) -> Self {
        self.held.insert(control);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_look(mut self, dx: f32, dy: f32) -> Self {
        self.look_deltas.push(Vec2::new(dx, dy));
        self
    }
}

/// Input accumulated between ticks.
#[derive(Debug, Clone)]
pub struct InputState {
    bindings: KeyBindings,
    keys_down: HashSet<Key>,
    look_deltas: Vec<Vec2>,
    actions: VecDeque<Action>,
    pointer_locked: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            keys_down: HashSet::new(),
            look_deltas: Vec::new(),
            actions: VecDeque::new(),
            pointer_locked: false,
        }
    }

    /// Process an input event and update state.
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                // Auto-repeat arrives as further KeyDowns; only the first one queues.
                if self.keys_down.insert(*key) {
                    if let Some(action) = self.bindings.action_for(*key) {
                        self.queue_action(action);
                    }
                }
            }
            InputEvent::KeyUp(key) => {
                self.keys_down.remove(key);
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_deltas.push(Vec2::new(*dx, *dy));
                }
            }
            InputEvent::MouseButton { button, pressed } => {
                if *button == MouseButton::Left && *pressed {
                    self.queue_action(Action::PrimaryUse);
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
            }
        }
    }

    pub fn queue_action(&mut self, action: Action) {
        tracing::trace!(action = action.name(), "action queued");
        self.actions.push_back(action);
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn clear_keys(&mut self) {
        self.keys_down.clear();
    }

    /// Controls currently held, resolved through the key bindings.
    pub fn held_controls(&self) -> HashSet<Control> {
        self.keys_down
            .iter()
            .filter_map(|k| self.bindings.control_for(*k))
            .collect()
    }

    /// Snapshot held controls and drain look deltas and queued actions.
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            held: self.held_controls(),
            look_deltas: std::mem::take(&mut self.look_deltas),
            actions: self.actions.drain(..).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked() -> InputState {
        let mut input = InputState::default();
        input.process_event(&InputEvent::PointerLockChanged { locked: true });
        input
    }

    #[test]
    fn held_keys_map_to_controls() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::KeyDown(Key::W));
        input.process_event(&InputEvent::KeyDown(Key::D));
        input.process_event(&InputEvent::KeyDown(Key::Escape));

        let frame = input.take_frame();
        assert!(frame.is_held(Control::Forward));
        assert!(frame.is_held(Control::StrafeRight));
        assert_eq!(frame.held.len(), 2);
    }

    #[test]
    fn held_controls_survive_take_frame() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::KeyDown(Key::Space));
        assert!(input.take_frame().is_held(Control::Jump));
        assert!(input.take_frame().is_held(Control::Jump));

        input.process_event(&InputEvent::KeyUp(Key::Space));
        assert!(!input.take_frame().is_held(Control::Jump));
    }

    #[test]
    fn action_key_queues_once_per_press() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::KeyDown(Key::Q));
        input.process_event(&InputEvent::KeyDown(Key::Q)); // auto-repeat
        assert_eq!(input.pending_actions(), 1);

        input.process_event(&InputEvent::KeyUp(Key::Q));
        input.process_event(&InputEvent::KeyDown(Key::Q));
        assert_eq!(input.take_frame().actions, vec![Action::DropGun, Action::DropGun]);
        assert_eq!(input.pending_actions(), 0);
    }

    #[test]
    fn left_click_queues_primary_use() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        input.process_event(&InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        input.process_event(&InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        assert_eq!(input.take_frame().actions, vec![Action::PrimaryUse]);
    }

    #[test]
    fn mouse_motion_ignored_without_pointer_lock() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::MouseMove { dx: 5.0, dy: 1.0 });
        assert!(input.take_frame().look_deltas.is_empty());
    }

    #[test]
    fn mouse_motion_kept_per_event_while_locked() {
        let mut input = locked();
        input.process_event(&InputEvent::MouseMove { dx: 5.0, dy: 1.0 });
        input.process_event(&InputEvent::MouseMove { dx: -2.0, dy: 3.0 });

        let frame = input.take_frame();
        assert_eq!(
            frame.look_deltas,
            vec![Vec2::new(5.0, 1.0), Vec2::new(-2.0, 3.0)]
        );
        assert!(input.take_frame().look_deltas.is_empty());
    }

    #[test]
    fn focus_lost_releases_everything() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::KeyDown(Key::W));
        input.process_event(&InputEvent::KeyDown(Key::A));
        input.process_event(&InputEvent::FocusLost);
        assert!(input.take_frame().held.is_empty());
    }

    #[test]
    fn frame_input_builders() {
        let frame = FrameInput::idle()
            .with_held(Control::Jump)
            .with_action(Action::Fire)
            .with_look(1.0, 2.0);
        assert!(frame.is_held(Control::Jump));
        assert_eq!(frame.actions, vec![Action::Fire]);
        assert_eq!(frame.look_deltas, vec![Vec2::new(1.0, 2.0)]);
    }
}
