use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Notable state changes produced by a tick, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Fired {
        id: u64,
        origin: Vec3,
        direction: Vec3,
    },
    /// Projectile left the range around the player and was removed.
    ProjectileExpired { id: u64 },
    GunDropped { position: Vec3 },
    GunPickedUp,
    Jumped,
    /// Came to rest on the ground after being airborne.
    Landed,
    /// Fell below the fall limit and was teleported to spawn.
    Recovered,
    /// Reset to spawn on request.
    PlayerReset,
}
