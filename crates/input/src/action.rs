/// A discrete, one-shot action. Queued on press and applied at the start of the
/// next tick, so its effect does not depend on how often the host delivers
/// device events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Spawn a projectile from the held gun.
    Fire,
    /// Drop the held gun where the player stands.
    DropGun,
    /// Pick the gun back up when close enough.
    PickUpGun,
    /// Primary button: fire when holding the gun, otherwise try to pick it up.
    PrimaryUse,
    /// Teleport the player back to the spawn point.
    ResetPlayer,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Fire => "fire",
            Action::DropGun => "drop",
            Action::PickUpGun => "pickup",
            Action::PrimaryUse => "use",
            Action::ResetPlayer => "reset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fire" => Some(Action::Fire),
            "drop" => Some(Action::DropGun),
            "pickup" => Some(Action::PickUpGun),
            "use" => Some(Action::PrimaryUse),
            "reset" => Some(Action::ResetPlayer),
            _ => None,
        }
    }
}

/// A continuous control, active for every tick its key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Jump,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Forward,
        Control::Backward,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::Jump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "w",
            Control::Backward => "s",
            Control::StrafeLeft => "a",
            Control::StrafeRight => "d",
            Control::Jump => "space",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .or(if name == "jump" { Some(Control::Jump) } else { None })
    }
}
