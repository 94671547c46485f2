#![deny(unsafe_code)]
//! Falling petal particle field.
//!
//! A [`PetalField`] owns a FIFO pool of petals. Each frame every petal falls,
//! swings sideways on a sine, spins, and is pushed away from the pointer when
//! it comes within range. Petals that drop below the field respawn above the
//! top edge; petals spawned by an excitation burst live for a fixed time and
//! fade out. Rendering pushes only visibly changed transforms to a
//! [`TransformSink`].

pub mod params;
pub mod petal;
pub mod spawn;

pub use params::PetalParams;
pub use petal::{repulsion, Fate, Petal, Repulsion};
pub use spawn::{burst_size, BurstOutcome, SpawnSource};

use sakura_fx_core::error::EngineError;
use sakura_fx_core::field::Field;
use sakura_fx_core::glam::DVec2;
use sakura_fx_core::{Bounds, Engine, FrameInput, TransformSink, Xorshift64};
use serde_json::Value;
use std::collections::VecDeque;

/// Horizontal jitter around a burst origin, px.
const BURST_JITTER_X: f64 = 20.0;
/// Vertical jitter around a burst origin, px.
const BURST_JITTER_Y: f64 = 10.0;

pub struct PetalField {
    petals: VecDeque<Petal>,
    params: PetalParams,
    bounds: Bounds,
    rng: Xorshift64,
    next_id: u64,
    /// Ids dropped since the last render, still to be released by the sink.
    pending_removals: Vec<u64>,
}

impl PetalField {
    /// Creates the initial pool inside `bounds`.
    ///
    /// Most petals start somewhere on screen; a share given by
    /// `params.initial_above` starts in the respawn band so the top edge
    /// is not empty for the first seconds.
    pub fn new(bounds: Bounds, seed: u64, params: PetalParams) -> Result<Self, EngineError> {
        if !bounds.is_drawable() {
            return Err(EngineError::InvalidDimensions);
        }
        params.validate()?;
        let mut field = Self {
            petals: VecDeque::with_capacity(params.max_live),
            params,
            bounds,
            rng: Xorshift64::new(seed),
            next_id: 0,
            pending_removals: Vec::new(),
        };
        for _ in 0..field.params.count {
            let x = field.rng.next_f64() * bounds.width;
            let y = if field.rng.chance(field.params.initial_above) {
                field.rng.roll(field.params.respawn_band)
            } else {
                field.rng.next_f64() * bounds.height
            };
            let id = field.take_id();
            let petal = Petal::spawn(id, DVec2::new(x, y), &field.params, &mut field.rng);
            field.petals.push_back(petal);
        }
        Ok(field)
    }

    /// Creates a field from a JSON params object (see [`PetalParams::from_json`]).
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(
            Bounds::new(width as f64, height as f64),
            seed,
            PetalParams::from_json(params)?,
        )
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.petals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.petals.is_empty()
    }

    /// Live petals, oldest first.
    pub fn petals(&self) -> impl Iterator<Item = &Petal> + '_ {
        self.petals.iter()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn settings(&self) -> &PetalParams {
        &self.params
    }

    /// Pushes `count` mortal petals around `origin`, then evicts the oldest
    /// petals until the pool is back within `max_live`.
    pub fn spawn_burst(&mut self, count: usize, origin: DVec2) -> BurstOutcome {
        for _ in 0..count {
            let jitter = DVec2::new(
                self.rng.next_range(-BURST_JITTER_X, BURST_JITTER_X),
                self.rng.next_range(-BURST_JITTER_Y, BURST_JITTER_Y),
            );
            let id = self.take_id();
            let mut petal = Petal::spawn(id, origin + jitter, &self.params, &mut self.rng);
            petal.lifespan = Some(self.params.burst_lifespan);
            self.petals.push_back(petal);
        }
        let mut evicted = 0;
        while self.petals.len() > self.params.max_live {
            if let Some(old) = self.petals.pop_front() {
                self.pending_removals.push(old.id);
                evicted += 1;
            }
        }
        BurstOutcome {
            spawned: count,
            evicted,
        }
    }

    /// Spawns a burst sized by `strength` when it exceeds the threshold.
    ///
    /// Does nothing when the source cannot be resolved (no camera, anchor
    /// behind the camera).
    pub fn excite(&mut self, strength: f64, source: &SpawnSource) -> BurstOutcome {
        if !(strength > self.params.excitation_threshold) {
            return BurstOutcome::default();
        }
        match source.resolve(self.bounds) {
            Some(origin) => self.spawn_burst(burst_size(strength), origin),
            None => BurstOutcome::default(),
        }
    }

    /// Pushes changed transforms and releases dropped petals.
    pub fn render(&mut self, sink: &mut dyn TransformSink) {
        for id in self.pending_removals.drain(..) {
            sink.remove(id);
        }
        for petal in self.petals.iter_mut() {
            if let Some(t) = petal.dirty_transform() {
                sink.apply(petal.id, &t);
                petal.last_applied = Some(t);
            }
        }
    }

    /// Releases every petal from the sink and empties the pool.
    pub fn teardown(&mut self, sink: &mut dyn TransformSink) {
        for id in self.pending_removals.drain(..) {
            sink.remove(id);
        }
        for petal in self.petals.drain(..) {
            sink.remove(petal.id);
        }
    }
}

impl Engine for PetalField {
    fn step(&mut self, input: &FrameInput) -> Result<(), EngineError> {
        if !input.bounds.is_drawable() {
            return Ok(());
        }
        self.bounds = input.bounds;
        let params = &self.params;
        let rng = &mut self.rng;
        let removals = &mut self.pending_removals;
        self.petals.retain_mut(|petal| {
            match petal.advance(input.delta, input.bounds, input.pointer, params) {
                Fate::Alive => true,
                Fate::Respawn => {
                    petal.respawn(input.bounds, params, rng);
                    true
                }
                Fate::Expired => {
                    removals.push(petal.id);
                    false
                }
            }
        });
        Ok(())
    }

    /// Respawns every petal for the new bounds.
    fn resize(&mut self, bounds: Bounds) -> Result<(), EngineError> {
        if !bounds.is_drawable() {
            return Err(EngineError::InvalidDimensions);
        }
        self.bounds = bounds;
        for petal in self.petals.iter_mut() {
            petal.respawn(bounds, &self.params, &mut self.rng);
        }
        Ok(())
    }

    /// One cell per pixel; each petal is a disc of its scaled sprite size
    /// at its opacity.
    fn snapshot(&self) -> Result<Field, EngineError> {
        let w = self.bounds.width.ceil().max(1.0) as usize;
        let h = self.bounds.height.ceil().max(1.0) as usize;
        let mut field = Field::new(w, h)?;
        let half = self.params.sprite_px * 0.5;
        for petal in &self.petals {
            field.stamp_disc(
                petal.pos.x + half,
                petal.pos.y + half,
                half * petal.size,
                petal.opacity,
            );
        }
        Ok(field)
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        PetalParams::schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_fx_core::RecordingSink;
    use serde_json::json;

    fn bounds() -> Bounds {
        Bounds::new(1280.0, 720.0)
    }

    fn field(seed: u64) -> PetalField {
        PetalField::new(bounds(), seed, PetalParams::canopy()).unwrap()
    }

    fn idle() -> FrameInput {
        FrameInput::idle(bounds())
    }

    // ---- Construction ----

    #[test]
    fn new_creates_configured_pool() {
        let f = field(1);
        assert_eq!(f.len(), 180);
        let ids: Vec<u64> = f.petals().map(|p| p.id).collect();
        assert_eq!(ids, (0..180).collect::<Vec<_>>());
    }

    #[test]
    fn new_rejects_empty_bounds_and_bad_params() {
        assert!(PetalField::new(Bounds::new(0.0, 10.0), 1, PetalParams::canopy()).is_err());
        let bad = PetalParams {
            pointer_radius: -1.0,
            ..PetalParams::canopy()
        };
        assert!(PetalField::new(bounds(), 1, bad).is_err());
    }

    #[test]
    fn initial_pool_is_on_screen_or_above() {
        let f = field(5);
        for p in f.petals() {
            assert!(p.pos.y < 720.0, "y = {}", p.pos.y);
            assert!((0.0..1280.0).contains(&p.pos.x));
        }
        assert!(f.petals().any(|p| p.pos.y < 0.0), "expected some petals above the top");
    }

    #[test]
    fn from_json_selects_preset() {
        let f = PetalField::from_json(640, 480, 3, &json!({"preset": "snowfall"})).unwrap();
        assert_eq!(f.len(), 80);
        assert_eq!(f.params()["pointer_radius"], 100.0);
    }

    #[test]
    fn same_seed_same_pool() {
        let mut a = field(77);
        let mut b = field(77);
        for _ in 0..30 {
            a.step(&idle()).unwrap();
            b.step(&idle()).unwrap();
        }
        assert!(a.petals().zip(b.petals()).all(|(pa, pb)| pa == pb));
    }

    // ---- Stepping ----

    #[test]
    fn petals_fall_without_pointer() {
        let mut f = field(2);
        let before: Vec<(u64, f64)> = f.petals().map(|p| (p.id, p.pos.y)).collect();
        f.step(&idle()).unwrap();
        for ((id, y0), p) in before.iter().zip(f.petals()) {
            assert_eq!(*id, p.id);
            assert!(p.pos.y > *y0, "petal {id} did not fall: {y0} -> {}", p.pos.y);
        }
    }

    #[test]
    fn petal_past_bottom_respawns_above_top() {
        let mut f = field(3);
        f.petals[0].pos.y = 720.0 + 250.0;
        let id = f.petals[0].id;
        f.step(&idle()).unwrap();
        let p = f.petals().find(|p| p.id == id).unwrap();
        assert!(p.pos.y <= 0.0, "respawned at {}", p.pos.y);
        assert_eq!(f.len(), 180);
    }

    #[test]
    fn undrawable_input_is_ignored() {
        let mut f = field(4);
        let before: Vec<Petal> = f.petals().cloned().collect();
        f.step(&FrameInput::idle(Bounds::new(0.0, 0.0))).unwrap();
        assert!(f.petals().zip(before.iter()).all(|(a, b)| a == b));
    }

    #[test]
    fn pointer_scatters_nearby_petals() {
        let mut calm = field(8);
        let mut stirred = field(8);
        let target = calm.petals[10].pos;
        calm.step(&idle()).unwrap();
        stirred.step(&idle().with_pointer(target)).unwrap();
        let a = calm.petals[10].pos;
        let b = stirred.petals[10].pos;
        assert!((b.x - a.x - 25.0 * 0.4).abs() < 1e-9, "push on x: {}", b.x - a.x);
    }

    // ---- Bursts ----

    #[test]
    fn burst_over_cap_evicts_oldest_first() {
        let params = PetalParams {
            count: 199,
            max_live: 200,
            ..PetalParams::canopy()
        };
        let mut f = PetalField::new(bounds(), 1, params).unwrap();
        assert_eq!(f.len(), 199);
        let outcome = f.spawn_burst(6, DVec2::new(640.0, 100.0));
        assert_eq!(
            outcome,
            BurstOutcome {
                spawned: 6,
                evicted: 5
            }
        );
        assert_eq!(f.len(), 200);
        assert_eq!(f.petals().next().map(|p| p.id), Some(5));
        let mut sink = RecordingSink::new();
        f.render(&mut sink);
        assert_eq!(sink.removed, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn burst_petals_are_mortal_and_fade() {
        let params = PetalParams {
            count: 0,
            burst_lifespan: 10.0,
            ..PetalParams::canopy()
        };
        let mut f = PetalField::new(bounds(), 1, params).unwrap();
        f.spawn_burst(3, DVec2::new(100.0, 100.0));
        assert!(f.petals().all(|p| p.lifespan == Some(10.0)));
        for _ in 0..8 {
            f.step(&idle()).unwrap();
        }
        assert!(f.petals().all(|p| p.opacity < p.base_opacity));
        f.step(&idle()).unwrap();
        f.step(&idle()).unwrap();
        assert!(f.is_empty());
        let mut sink = RecordingSink::new();
        f.render(&mut sink);
        assert_eq!(sink.removed.len(), 3);
    }

    #[test]
    fn excite_below_threshold_spawns_nothing() {
        let mut f = field(1);
        let out = f.excite(0.1, &SpawnSource::Screen(DVec2::new(10.0, 10.0)));
        assert_eq!(out, BurstOutcome::default());
        assert_eq!(f.len(), 180);
    }

    #[test]
    fn excite_spawns_proportional_burst() {
        let mut f = field(1);
        let out = f.excite(0.5, &SpawnSource::Screen(DVec2::new(10.0, 10.0)));
        assert_eq!(out.spawned, 2);
        assert_eq!(f.len(), 182);
        let out = f.excite(5.0, &SpawnSource::Screen(DVec2::new(10.0, 10.0)));
        assert_eq!(out.spawned, 4);
    }

    #[test]
    fn excite_without_camera_is_noop() {
        let mut f = field(1);
        let src = SpawnSource::Anchor {
            point: sakura_fx_core::glam::DVec3::ZERO,
            camera: None,
        };
        assert_eq!(f.excite(1.0, &src), BurstOutcome::default());
        assert_eq!(f.len(), 180);
    }

    // ---- Rendering ----

    #[test]
    fn first_render_applies_every_petal() {
        let mut f = field(1);
        let mut sink = RecordingSink::new();
        f.render(&mut sink);
        assert_eq!(sink.applied.len(), 180);
    }

    #[test]
    fn unchanged_frame_renders_nothing() {
        let mut f = field(1);
        let mut sink = RecordingSink::new();
        f.render(&mut sink);
        sink.clear();
        f.render(&mut sink);
        assert!(sink.applied.is_empty());
    }

    #[test]
    fn teardown_releases_everything() {
        let mut f = field(1);
        f.spawn_burst(30, DVec2::new(5.0, 5.0));
        let mut sink = RecordingSink::new();
        f.teardown(&mut sink);
        assert!(f.is_empty());
        assert_eq!(sink.removed.len(), 210);
    }

    // ---- Engine ----

    #[test]
    fn resize_respawns_pool_above_new_top() {
        let mut f = field(1);
        f.resize(Bounds::new(400.0, 300.0)).unwrap();
        assert_eq!(f.bounds(), Bounds::new(400.0, 300.0));
        assert!(f.petals().all(|p| p.pos.y <= 0.0 && p.pos.x < 400.0));
        assert!(f.resize(Bounds::new(-1.0, 5.0)).is_err());
    }

    #[test]
    fn snapshot_matches_bounds_and_shows_petals() {
        let mut f = field(1);
        let params = f.settings().clone();
        f.petals[0].pos = DVec2::new(100.0, 100.0);
        f.petals[0].opacity = 0.8;
        let snap = f.snapshot().unwrap();
        assert_eq!((snap.width(), snap.height()), (1280, 720));
        let c = 100 + (params.sprite_px / 2.0) as usize;
        assert!(snap.get(c, c).unwrap() >= 0.8);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn pointer() -> impl Strategy<Value = Option<DVec2>> {
            let point = (-300.0_f64..1600.0, -300.0_f64..1000.0);
            prop::option::of(point.prop_map(|(x, y)| DVec2::new(x, y)))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn invariants_hold_every_frame(
                seed: u64,
                frames in 1_usize..60,
                delta in 0.05_f64..2.0,
                ptr in pointer(),
                bursts in 0_usize..40,
            ) {
                let mut f = PetalField::new(bounds(), seed, PetalParams::canopy()).unwrap();
                f.spawn_burst(bursts, DVec2::new(640.0, 360.0));
                let margin = f.settings().margin;
                let input = FrameInput { delta, bounds: bounds(), pointer: ptr };
                for _ in 0..frames {
                    f.step(&input).unwrap();
                    prop_assert!(f.len() <= f.settings().max_live);
                    for p in f.petals() {
                        let in_range = p.pos.x >= -margin && p.pos.x <= 1280.0 + margin;
                        prop_assert!(in_range, "x = {}", p.pos.x);
                        prop_assert!((0.0..=1.0).contains(&p.opacity), "opacity = {}", p.opacity);
                    }
                }
            }

            #[test]
            fn y_strictly_increases_without_pointer(seed: u64, delta in 0.05_f64..2.0) {
                let mut f = PetalField::new(bounds(), seed, PetalParams::snowfall()).unwrap();
                let input = FrameInput::idle(bounds()).with_delta(delta);
                let before: Vec<(u64, f64)> = f.petals().map(|p| (p.id, p.pos.y)).collect();
                f.step(&input).unwrap();
                for ((id, y0), p) in before.iter().zip(f.petals()) {
                    prop_assert_eq!(*id, p.id);
                    prop_assert!(p.pos.y > *y0, "petal {} went from {} to {}", id, y0, p.pos.y);
                }
            }
        }
    }
}
