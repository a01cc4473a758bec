use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Look angles. Pointer input moves the targets; the simulator eases the
/// current angles toward them once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraOrientation {
    pub yaw: f32,
    pub pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
}

impl CameraOrientation {
    /// Apply one pointer delta to the targets. Pitch is clamped here, per
    /// delta, not after smoothing.
    pub fn apply_look(&mut self, delta: Vec2, sensitivity: f32) {
        self.target_yaw -= delta.x * sensitivity;
        self.target_pitch =
            (self.target_pitch - delta.y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Exponential approach toward the targets. Not frame-rate independent.
    pub fn smooth(&mut self, damping: f32) {
        self.yaw += (self.target_yaw - self.yaw) * damping;
        self.pitch += (self.target_pitch - self.pitch) * damping;
    }

    /// Horizontal facing direction at the current yaw.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Horizontal strafe direction, a quarter turn clockwise from `forward`.
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw - FRAC_PI_2;
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }
}

/// Follow-camera placement derived each tick for the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraRig {
    /// Place the camera `distance` behind the player along the facing
    /// direction, `height` above it, raised further by the pitch.
    pub fn follow(player: Vec3, orientation: &CameraOrientation, distance: f32, height: f32) -> Self {
        let forward = orientation.forward();
        let eye = Vec3::new(
            player.x - forward.x * distance,
            player.y + height + orientation.pitch.sin() * distance,
            player.z - forward.z * distance,
        );
        Self {
            eye,
            target: player + Vec3::new(0.0, height, 0.0),
        }
    }
}
