use blockrange_render::RenderView;
use glam::{Mat4, Vec3};

/// Perspective projection for the window surface. The field of view comes
/// from each `RenderView`; this only tracks the surface shape and clip range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        let mut projection = Self::default();
        projection.resize(width, height);
        projection
    }

    /// Zero-sized surfaces (minimized windows) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn projection_matrix(&self, fov_degrees: f32) -> Mat4 {
        Mat4::perspective_rh(fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(view: &RenderView) -> Mat4 {
        Mat4::look_at_rh(view.eye, view.target, Vec3::Y)
    }

    pub fn view_projection(&self, view: &RenderView) -> Mat4 {
        self.projection_matrix(view.fov_degrees) * Self::view_matrix(view)
    }
}
