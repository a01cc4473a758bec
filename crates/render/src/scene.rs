use blockrange_common::Transform;
use blockrange_kernel::SimState;
use glam::Vec3;

/// Side length of the square ground plane.
pub const GROUND_SIZE: f32 = 100.0;

/// Clear color behind the scene (#bfd1e5).
pub const SKY_COLOR: [f32; 4] = [0.749, 0.820, 0.898, 1.0];

const PLAYER_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);
const GUN_SIZE: Vec3 = Vec3::new(1.0, 0.3, 2.0);
const BULLET_SIZE: Vec3 = Vec3::splat(0.2);
const GROUND_THICKNESS: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneObjectKind {
    Ground,
    Player,
    Bot,
    Gun,
    Projectile,
}

impl SceneObjectKind {
    pub fn color(self) -> [f32; 4] {
        match self {
            SceneObjectKind::Ground => [0.45, 0.55, 0.32, 1.0],
            SceneObjectKind::Player => [1.0, 0.0, 0.0, 1.0],
            SceneObjectKind::Bot => [0.0, 1.0, 0.0, 1.0],
            SceneObjectKind::Gun => [0.25, 0.25, 0.28, 1.0],
            SceneObjectKind::Projectile => [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// One box to draw. Every object in the demo is an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub kind: SceneObjectKind,
    pub transform: Transform,
}

/// Everything visible in `state`, ground first.
pub fn scene_objects(state: &SimState) -> Vec<SceneObject> {
    let player = state.player.position;
    let mut objects = Vec::with_capacity(4 + state.projectiles.len());

    objects.push(SceneObject {
        kind: SceneObjectKind::Ground,
        transform: Transform::boxed(
            Vec3::new(0.0, -GROUND_THICKNESS / 2.0, 0.0),
            Vec3::new(GROUND_SIZE, GROUND_THICKNESS, GROUND_SIZE),
        ),
    });
    objects.push(SceneObject {
        kind: SceneObjectKind::Player,
        transform: Transform::boxed(player, PLAYER_SIZE),
    });
    objects.push(SceneObject {
        kind: SceneObjectKind::Bot,
        transform: Transform::boxed(state.bot_position, PLAYER_SIZE),
    });
    objects.push(SceneObject {
        kind: SceneObjectKind::Gun,
        transform: Transform::boxed(state.gun.world_position(player), GUN_SIZE),
    });
    objects.extend(state.projectiles.iter().map(|p| SceneObject {
        kind: SceneObjectKind::Projectile,
        transform: Transform::boxed(p.position, BULLET_SIZE),
    }));

    objects
}
