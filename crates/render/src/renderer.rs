use blockrange_kernel::{CameraRig, SimState};
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

impl RenderView {
    pub fn from_rig(rig: &CameraRig) -> Self {
        Self {
            eye: rig.eye,
            target: rig.target,
            ..Self::default()
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads simulation state and a view, then produces output. It
/// never mutates the state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given state and view.
    fn render(&self, state: &SimState, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the frame. Used for CLI output, logging,
/// and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List every projectile instead of just the count.
    pub list_projectiles: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            list_projectiles: true,
        }
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, state: &SimState, view: &RenderView) -> String {
        let mut out = String::new();
        let p = &state.player;
        out.push_str(&format!("=== Frame (tick={}) ===\n", state.tick));
        out.push_str(&format!(
            "Player: pos={} vy={:.3} grounded={}\n",
            fmt_vec(p.position),
            p.velocity_y,
            p.grounded
        ));
        out.push_str(&format!(
            "Look: yaw={:.3} pitch={:.3} (target {:.3}, {:.3})\n",
            state.camera.yaw, state.camera.pitch, state.camera.target_yaw, state.camera.target_pitch
        ));
        out.push_str(&format!(
            "Camera: eye={} target={} fov={:.0}\n",
            fmt_vec(view.eye),
            fmt_vec(view.target),
            view.fov_degrees
        ));
        if state.gun.held {
            out.push_str("Gun: held\n");
        } else {
            out.push_str(&format!("Gun: dropped at {}\n", fmt_vec(state.gun.position)));
        }
        out.push_str(&format!("Projectiles: {}\n", state.projectiles.len()));
        if self.list_projectiles {
            for proj in &state.projectiles {
                out.push_str(&format!(
                    "  [{}] pos={} age={}\n",
                    proj.id,
                    fmt_vec(proj.position),
                    proj.age
                ));
            }
        }

        out
    }
}
