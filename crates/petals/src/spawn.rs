//! Where excitation bursts come from and how big they are.

use sakura_fx_core::glam::{DVec2, DVec3};
use sakura_fx_core::{Bounds, Camera};

/// Largest burst a single excitation may produce.
pub const MAX_BURST: usize = 4;

/// Origin of an excitation burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnSource {
    /// Already in effect-local pixels.
    Screen(DVec2),
    /// A point in the 3D scene (e.g. a swaying branch tip), projected through
    /// the active camera. Without a camera nothing spawns.
    Anchor { point: DVec3, camera: Option<Camera> },
}

impl SpawnSource {
    /// Effect-local spawn position, or `None` when it cannot be resolved.
    pub fn resolve(&self, bounds: Bounds) -> Option<DVec2> {
        match self {
            SpawnSource::Screen(p) => p.is_finite().then_some(*p),
            SpawnSource::Anchor { point, camera } => camera.as_ref()?.project(*point, bounds),
        }
    }
}

/// Petals to spawn for an excitation `strength`: grows with strength,
/// always between 1 and [`MAX_BURST`].
pub fn burst_size(strength: f64) -> usize {
    if !strength.is_finite() || strength <= 0.0 {
        return 1;
    }
    let n = 1.0 + (strength * 3.0).floor();
    (n.min(MAX_BURST as f64) as usize).max(1)
}

/// Result of a spawn call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurstOutcome {
    pub spawned: usize,
    /// Oldest petals dropped to stay within the live cap.
    pub evicted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_fx_core::glam::DMat4;

    #[test]
    fn burst_size_is_bounded_and_monotonic() {
        assert_eq!(burst_size(0.0), 1);
        assert_eq!(burst_size(0.2), 1);
        assert_eq!(burst_size(0.34), 2);
        assert_eq!(burst_size(0.7), 3);
        assert_eq!(burst_size(1.0), 4);
        assert_eq!(burst_size(50.0), MAX_BURST);
        assert_eq!(burst_size(f64::NAN), 1);
        let sizes: Vec<usize> = (0..100).map(|i| burst_size(i as f64 / 20.0)).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn screen_source_resolves_to_itself() {
        let b = Bounds::new(100.0, 100.0);
        assert_eq!(
            SpawnSource::Screen(DVec2::new(3.0, 4.0)).resolve(b),
            Some(DVec2::new(3.0, 4.0))
        );
        assert_eq!(SpawnSource::Screen(DVec2::new(f64::NAN, 0.0)).resolve(b), None);
    }

    #[test]
    fn anchor_without_camera_is_unresolved() {
        let src = SpawnSource::Anchor {
            point: DVec3::ZERO,
            camera: None,
        };
        assert_eq!(src.resolve(Bounds::new(100.0, 100.0)), None);
    }

    #[test]
    fn anchor_projects_through_camera() {
        let src = SpawnSource::Anchor {
            point: DVec3::ZERO,
            camera: Some(Camera::from_view_proj(DMat4::IDENTITY)),
        };
        assert_eq!(
            src.resolve(Bounds::new(200.0, 100.0)),
            Some(DVec2::new(100.0, 50.0))
        );
    }
}
