//! Projection of 3D scene anchors onto the 2D effect plane.

use crate::frame::Bounds;
use glam::{DMat4, DVec2, DVec3};

/// A view-projection transform, as held by the scene's active camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    view_proj: DMat4,
}

impl Camera {
    pub fn from_view_proj(view_proj: DMat4) -> Self {
        Self { view_proj }
    }

    /// Right-handed perspective camera at `eye` looking at `target`
    /// (OpenGL clip conventions, `fov_y` in radians).
    pub fn look_at(
        eye: DVec3,
        target: DVec3,
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        let view = DMat4::look_at_rh(eye, target, DVec3::Y);
        let proj = DMat4::perspective_rh_gl(fov_y, aspect, near, far);
        Self::from_view_proj(proj * view)
    }

    /// Projects a world-space point into screen pixels inside `bounds`
    /// (origin top-left, y down). Returns `None` for points behind the camera
    /// or when the result is not finite.
    pub fn project(&self, point: DVec3, bounds: Bounds) -> Option<DVec2> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= f64::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let screen = DVec2::new(
            (ndc.x + 1.0) * 0.5 * bounds.width,
            (1.0 - ndc.y) * 0.5 * bounds.height,
        );
        screen.is_finite().then_some(screen)
    }
}
