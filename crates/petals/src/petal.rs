//! A single petal and the per-frame kinematics applied to it.

use crate::params::PetalParams;
use sakura_fx_core::glam::DVec2;
use sakura_fx_core::{Bounds, Transform, Xorshift64};

/// Opacity changes at or below this are not worth a repaint.
pub const OPACITY_EPSILON: f64 = 0.01;

/// Pointer push on one petal for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    /// Linear falloff in [0, 1]: 1 at the pointer, 0 at the radius.
    pub force: f64,
    /// Radial displacement away from the pointer, `force * strength` long.
    pub displacement: DVec2,
}

/// Radial push away from `pointer` for a petal at `pos`.
///
/// `None` outside `radius`. A petal exactly under the pointer gets full
/// force along +x, since `atan2(0, 0)` is 0.
pub fn repulsion(pos: DVec2, pointer: DVec2, radius: f64, strength: f64) -> Option<Repulsion> {
    let offset = pos - pointer;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let distance = dist_sq.sqrt();
    let force = (radius - distance) / radius;
    let angle = offset.y.atan2(offset.x);
    Some(Repulsion {
        force,
        displacement: DVec2::new(angle.cos(), angle.sin()) * force * strength,
    })
}

/// What the field should do with a petal after it moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    /// Fell past the bottom; roll it again at the top.
    Respawn,
    /// Lifespan elapsed (or fell out while mortal); drop it.
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Petal {
    pub id: u64,
    pub pos: DVec2,
    /// Base drift (x) and fall speed (y) per frame.
    pub speed: DVec2,
    /// Degrees.
    pub rotation: f64,
    pub rotation_speed: f64,
    /// Phase of the lateral swing, radians.
    pub swing: f64,
    pub swing_speed: f64,
    pub size: f64,
    /// Opacity rolled at spawn; `opacity` fades from it near end of life.
    pub base_opacity: f64,
    pub opacity: f64,
    /// Frames this petal may live; `None` for the ambient pool.
    pub lifespan: Option<f64>,
    pub age: f64,
    pub(crate) last_applied: Option<Transform>,
}

impl Petal {
    /// Rolls a fresh petal at `pos`.
    pub fn spawn(id: u64, pos: DVec2, params: &PetalParams, rng: &mut Xorshift64) -> Self {
        let mut petal = Self {
            id,
            pos,
            speed: DVec2::ZERO,
            rotation: 0.0,
            rotation_speed: 0.0,
            swing: 0.0,
            swing_speed: 0.0,
            size: 0.0,
            base_opacity: 0.0,
            opacity: 0.0,
            lifespan: None,
            age: 0.0,
            last_applied: None,
        };
        petal.reroll(params, rng);
        petal
    }

    /// New size, speeds, spin, swing phase and opacity. Position, lifespan
    /// and age are left alone.
    pub fn reroll(&mut self, params: &PetalParams, rng: &mut Xorshift64) {
        self.size = rng.roll(params.size);
        self.speed = DVec2::new(rng.roll(params.speed_x), rng.roll(params.speed_y));
        self.rotation = rng.next_range(0.0, 360.0);
        self.rotation_speed = rng.roll(params.rotation_speed);
        self.swing = rng.next_angle();
        self.swing_speed = rng.roll(params.swing_speed);
        self.base_opacity = rng.roll(params.opacity).clamp(0.0, 1.0);
        self.opacity = self.base_opacity;
    }

    /// Sends the petal back above the top edge with fresh rolls.
    pub fn respawn(&mut self, bounds: Bounds, params: &PetalParams, rng: &mut Xorshift64) {
        self.reroll(params, rng);
        self.pos = DVec2::new(rng.next_f64() * bounds.width, rng.roll(params.respawn_band));
    }

    /// Integrates one frame of motion.
    pub fn advance(
        &mut self,
        delta: f64,
        bounds: Bounds,
        pointer: Option<DVec2>,
        params: &PetalParams,
    ) -> Fate {
        let push = pointer
            .and_then(|p| repulsion(self.pos, p, params.pointer_radius, params.repulsion_strength))
            .map_or(DVec2::ZERO, |r| r.displacement);

        self.pos.y += self.speed.y * delta;
        self.swing += self.swing_speed * delta;
        self.pos.x += (self.swing.sin() * params.swing_amplitude
            + self.speed.x
            + push.x * params.drift_coupling)
            * delta;
        self.pos.y += push.y * params.lift_coupling * delta;
        self.rotation += (self.rotation_speed + push.x.abs() * params.spin_coupling) * delta;

        if let Some(lifespan) = self.lifespan {
            self.age += delta;
            if self.age >= lifespan {
                return Fate::Expired;
            }
            self.opacity =
                self.base_opacity * fade_factor(self.age, lifespan, params.fade_fraction);
        }

        if self.pos.y > bounds.height + params.reset_margin {
            return if self.lifespan.is_some() {
                Fate::Expired
            } else {
                Fate::Respawn
            };
        }

        if self.pos.x > bounds.width + params.margin {
            self.pos.x = -params.margin;
        } else if self.pos.x < -params.margin {
            self.pos.x = bounds.width + params.margin;
        }
        Fate::Alive
    }

    /// Render-ready transform with position and rotation rounded to 0.1.
    pub fn transform(&self) -> Transform {
        Transform {
            x: round_tenth(self.pos.x),
            y: round_tenth(self.pos.y),
            rotation: round_tenth(self.rotation),
            scale: self.size,
            opacity: self.opacity,
        }
    }

    /// The transform to push if it differs visibly from the last one pushed.
    pub(crate) fn dirty_transform(&self) -> Option<Transform> {
        let next = self.transform();
        match &self.last_applied {
            Some(last)
                if last.same_placement(&next)
                    && (last.opacity - next.opacity).abs() <= OPACITY_EPSILON =>
            {
                None
            }
            _ => Some(next),
        }
    }
}

/// Opacity multiplier: 1 until the last `fade_fraction` of the lifespan,
/// then linear down to 0.
pub fn fade_factor(age: f64, lifespan: f64, fade_fraction: f64) -> f64 {
    let fade_start = lifespan * (1.0 - fade_fraction);
    if age <= fade_start || fade_fraction <= 0.0 {
        return 1.0;
    }
    ((lifespan - age) / (lifespan * fade_fraction)).clamp(0.0, 1.0)
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
