use std::collections::HashMap;

use crate::action::{Action, Control};
use crate::event::{Key, KeyParseError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("binding `{0}` is not of the form key=name")]
    Malformed(String),
    #[error(transparent)]
    Key(#[from] KeyParseError),
    #[error("`{0}` is neither a control nor an action")]
    UnknownTarget(String),
}

/// Key mapping configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    controls: HashMap<Key, Control>,
    actions: HashMap<Key, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let controls = HashMap::from([
            (Key::W, Control::Forward),
            (Key::S, Control::Backward),
            (Key::A, Control::StrafeLeft),
            (Key::D, Control::StrafeRight),
            (Key::Space, Control::Jump),
        ]);
        let actions = HashMap::from([(Key::Q, Action::DropGun), (Key::R, Action::ResetPlayer)]);
        Self { controls, actions }
    }
}

impl KeyBindings {
    /// Bind `key` to a held control, replacing any previous binding of that key.
    pub fn bind_control(&mut self, key: Key, control: Control) {
        self.actions.remove(&key);
        self.controls.insert(key, control);
    }

    /// Bind `key` to a discrete action, replacing any previous binding of that key.
    pub fn bind_action(&mut self, key: Key, action: Action) {
        self.controls.remove(&key);
        self.actions.insert(key, action);
    }

    /// Apply one `key=name` override, e.g. `f=fire` or `w=jump`. The name is
    /// a control or action name as used in input scripts.
    pub fn apply_override(&mut self, binding: &str) -> Result<(), BindingError> {
        let (key, target) = binding
            .split_once('=')
            .ok_or_else(|| BindingError::Malformed(binding.to_string()))?;
        let key: Key = key.trim().parse()?;
        let target = target.trim();
        if let Some(control) = Control::from_name(target) {
            self.bind_control(key, control);
        } else if let Some(action) = Action::from_name(target) {
            self.bind_action(key, action);
        } else {
            return Err(BindingError::UnknownTarget(target.to_string()));
        }
        tracing::debug!(?key, target, "key rebound");
        Ok(())
    }

    pub fn control_for(&self, key: Key) -> Option<Control> {
        self.controls.get(&key).copied()
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.actions.get(&key).copied()
    }
}
