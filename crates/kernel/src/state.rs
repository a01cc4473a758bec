use blockrange_common::Tuning;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraOrientation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity_y: f32,
    /// Resting on the ground plane and allowed to jump.
    pub grounded: bool,
}

impl PlayerState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity_y: 0.0,
            grounded: false,
        }
    }

    /// Teleport back to `spawn` and cancel vertical motion.
    pub fn reset(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.velocity_y = 0.0;
    }
}

/// The gun prop. While held, `position` is an offset from the player and the
/// render layer attaches it; once dropped it is a fixed world point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GunState {
    pub held: bool,
    pub position: Vec3,
}

impl GunState {
    pub fn held_at(offset: Vec3) -> Self {
        Self {
            held: true,
            position: offset,
        }
    }

    pub fn dropped_at(position: Vec3) -> Self {
        Self {
            held: false,
            position,
        }
    }

    /// Where the gun is in the world given the player's position.
    pub fn world_position(&self, player: Vec3) -> Vec3 {
        if self.held {
            player + self.position
        } else {
            self.position
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u64,
    pub origin: Vec3,
    /// Unit vector fixed at spawn.
    pub direction: Vec3,
    /// Ticks advanced since spawn.
    pub age: u32,
    pub position: Vec3,
}

impl Projectile {
    pub fn new(id: u64, origin: Vec3, direction: Vec3) -> Self {
        Self {
            id,
            origin,
            direction: direction.normalize_or_zero(),
            age: 0,
            position: origin,
        }
    }

    /// Move one tick along `direction`. Position is recomputed from the origin
    /// so long flights do not accumulate rounding error.
    pub fn advance(&mut self, speed: f32) {
        self.age += 1;
        self.position = self.origin + self.direction * (speed * self.age as f32);
    }
}

/// Authoritative demo state. Owned by the host and handed to
/// `FrameSimulator::tick` once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub tick: u64,
    pub player: PlayerState,
    pub camera: CameraOrientation,
    pub gun: GunState,
    pub projectiles: Vec<Projectile>,
    /// Static decoration; never simulated.
    pub bot_position: Vec3,
    next_projectile_id: u64,
}

impl SimState {
    /// Starting state: player at the spawn point holding the gun.
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tick: 0,
            player: PlayerState::at(tuning.spawn_point),
            camera: CameraOrientation::default(),
            gun: GunState::held_at(tuning.held_offset),
            projectiles: Vec::new(),
            bot_position: tuning.bot_position,
            next_projectile_id: 0,
        }
    }

    /// Add a projectile and return its id. Ids are never reused.
    pub fn spawn_projectile(&mut self, origin: Vec3, direction: Vec3) -> u64 {
        let id = self.next_projectile_id;
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile::new(id, origin, direction));
        id
    }

    pub fn projectile(&self, id: u64) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }
}
