use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gameplay tuning. All rates are per tick, not per second: the simulator runs
/// once per rendered frame.
///
/// Keep this separate from host configuration (window size, log level, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal distance covered per tick for each held movement control.
    pub move_speed: f32,
    /// Added to vertical velocity every tick.
    pub gravity: f32,
    /// Vertical velocity set by a jump.
    pub jump_impulse: f32,
    /// Resting height of the player's origin above the ground plane.
    pub ground_height: f32,
    /// Below this height the player is teleported back to `spawn_point`.
    pub fall_limit: f32,
    pub spawn_point: Vec3,

    /// Radians of target rotation per unit of pointer delta.
    pub look_sensitivity: f32,
    /// Fraction of the remaining angle covered per tick.
    pub look_damping: f32,
    pub camera_distance: f32,
    pub camera_height: f32,

    pub bullet_speed: f32,
    /// Projectiles farther than this from the player are removed.
    pub bullet_range: f32,
    /// Spawn distance in front of the player along the facing direction.
    pub muzzle_forward: f32,
    /// Spawn height above the player's origin.
    pub muzzle_up: f32,

    /// World-space offset from the player where a dropped gun lands.
    pub drop_offset: Vec3,
    /// Player-relative offset of a held gun.
    pub held_offset: Vec3,
    /// Pickup succeeds only when strictly closer than this.
    pub pickup_radius: f32,

    /// Position of the static bot decoration.
    pub bot_position: Vec3,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            gravity: -0.01,
            jump_impulse: 0.2,
            ground_height: 1.0,
            fall_limit: -10.0,
            spawn_point: Vec3::new(0.0, 1.0, 0.0),
            look_sensitivity: 0.002,
            look_damping: 0.1,
            camera_distance: 5.0,
            camera_height: 2.0,
            bullet_speed: 0.2,
            bullet_range: 50.0,
            muzzle_forward: 1.5,
            muzzle_up: 1.5,
            drop_offset: Vec3::new(0.0, 0.0, -2.0),
            held_offset: Vec3::new(0.5, 0.5, -1.0),
            pickup_radius: 2.0,
            bot_position: Vec3::new(5.0, 1.0, 0.0),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default values.
    pub fn from_json(text: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let scalars = [
            ("move_speed", self.move_speed),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("ground_height", self.ground_height),
            ("fall_limit", self.fall_limit),
            ("look_sensitivity", self.look_sensitivity),
            ("look_damping", self.look_damping),
            ("camera_distance", self.camera_distance),
            ("camera_height", self.camera_height),
            ("bullet_speed", self.bullet_speed),
            ("bullet_range", self.bullet_range),
            ("muzzle_forward", self.muzzle_forward),
            ("muzzle_up", self.muzzle_up),
            ("pickup_radius", self.pickup_radius),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }
        let vectors = [
            ("spawn_point", self.spawn_point),
            ("drop_offset", self.drop_offset),
            ("held_offset", self.held_offset),
            ("bot_position", self.bot_position),
        ];
        for (field, value) in vectors {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        if !(self.look_damping > 0.0 && self.look_damping <= 1.0) {
            return Err(TuningError::Invalid {
                field: "look_damping",
                reason: "must be in (0, 1]",
            });
        }
        if self.bullet_range <= 0.0 {
            return Err(TuningError::Invalid {
                field: "bullet_range",
                reason: "must be positive",
            });
        }
        if self.move_speed < 0.0 || self.bullet_speed < 0.0 || self.pickup_radius < 0.0 {
            return Err(TuningError::Invalid {
                field: "move_speed/bullet_speed/pickup_radius",
                reason: "must not be negative",
            });
        }
        if self.fall_limit >= self.ground_height {
            return Err(TuningError::Invalid {
                field: "fall_limit",
                reason: "must be below ground_height",
            });
        }
        Ok(())
    }
}
