//! Tunable constants for a petal field and the two presets the site uses.

use sakura_fx_core::error::EngineError;
use sakura_fx_core::params::{param_f64, param_range, param_usize};
use serde_json::{json, Value};

/// Names accepted by [`PetalParams::preset`].
pub const PRESET_NAMES: &[&str] = &["canopy", "snowfall"];

/// Simulation constants for a [`PetalField`](crate::PetalField).
///
/// Ranges are half-open `(lo, hi)` pairs rolled uniformly on every
/// (re)spawn. Durations are in baseline frames (1.0 = 1/60 s).
#[derive(Debug, Clone, PartialEq)]
pub struct PetalParams {
    /// Petals created at mount.
    pub count: usize,
    /// Pointer influence radius in px.
    pub pointer_radius: f64,
    /// Displacement magnitude at zero distance from the pointer.
    pub repulsion_strength: f64,
    /// Share of the displacement applied to x each frame.
    pub drift_coupling: f64,
    /// Share of the displacement applied to y each frame.
    pub lift_coupling: f64,
    /// Extra spin per unit of horizontal displacement.
    pub spin_coupling: f64,
    /// Amplitude of the lateral sine swing.
    pub swing_amplitude: f64,
    /// Horizontal slack beyond each edge before a petal wraps.
    pub margin: f64,
    /// Distance below the bottom edge at which a petal respawns.
    pub reset_margin: f64,
    pub size: (f64, f64),
    pub speed_x: (f64, f64),
    pub speed_y: (f64, f64),
    pub rotation_speed: (f64, f64),
    pub swing_speed: (f64, f64),
    pub opacity: (f64, f64),
    /// Vertical band (both ends <= 0) that respawned petals start in.
    pub respawn_band: (f64, f64),
    /// Chance that an initial petal starts in the respawn band instead of
    /// somewhere on screen.
    pub initial_above: f64,
    /// Hard cap on live petals; the oldest are evicted beyond it.
    pub max_live: usize,
    /// Lifetime of burst-spawned petals.
    pub burst_lifespan: f64,
    /// Terminal share of a lifetime during which opacity fades to 0.
    pub fade_fraction: f64,
    /// Excitation must exceed this before a burst spawns.
    pub excitation_threshold: f64,
    /// Rendered sprite edge in px before scaling.
    pub sprite_px: f64,
}

impl Default for PetalParams {
    fn default() -> Self {
        Self::canopy()
    }
}

impl PetalParams {
    /// Dense pool drifting down in front of the tree.
    pub fn canopy() -> Self {
        Self {
            count: 180,
            pointer_radius: 150.0,
            repulsion_strength: 25.0,
            drift_coupling: 0.4,
            lift_coupling: 0.25,
            spin_coupling: 1.2,
            swing_amplitude: 1.2,
            margin: 200.0,
            reset_margin: 200.0,
            size: (0.25, 0.6),
            speed_x: (-0.15, 0.15),
            speed_y: (0.6, 1.5),
            rotation_speed: (-0.75, 0.75),
            swing_speed: (0.015, 0.035),
            opacity: (0.5, 1.0),
            respawn_band: (-400.0, -100.0),
            initial_above: 0.2,
            max_live: 200,
            burst_lifespan: 240.0,
            fade_fraction: 0.3,
            excitation_threshold: 0.15,
            sprite_px: 30.0,
        }
    }

    /// Lighter, faster snowfall across a whole section.
    pub fn snowfall() -> Self {
        Self {
            count: 80,
            pointer_radius: 100.0,
            repulsion_strength: 15.0,
            drift_coupling: 0.3,
            lift_coupling: 0.2,
            spin_coupling: 0.5,
            swing_amplitude: 2.0,
            margin: 100.0,
            reset_margin: 100.0,
            size: (0.3, 0.7),
            speed_x: (-0.3, 0.3),
            speed_y: (0.6, 1.8),
            rotation_speed: (-1.5, 1.5),
            swing_speed: (0.02, 0.05),
            opacity: (0.4, 0.9),
            respawn_band: (-150.0, -50.0),
            initial_above: 0.0,
            max_live: 200,
            burst_lifespan: 180.0,
            fade_fraction: 0.3,
            excitation_threshold: 0.15,
            sprite_px: 20.0,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "canopy" => Some(Self::canopy()),
            "snowfall" => Some(Self::snowfall()),
            _ => None,
        }
    }

    /// Reads overrides from a JSON object on top of a preset.
    ///
    /// `"preset"` selects the base (canopy when absent); every other key
    /// overrides one field. Unknown presets are an error, malformed values
    /// fall back to the base. The result is validated.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let base = match params.get("preset").and_then(Value::as_str) {
            Some(name) => Self::preset(name)
                .ok_or_else(|| {
                    EngineError::invalid_param("preset", format!("unknown preset '{name}'"))
                })?,
            None => Self::default(),
        };
        let p = Self {
            count: param_usize(params, "count", base.count),
            pointer_radius: param_f64(params, "pointer_radius", base.pointer_radius),
            repulsion_strength: param_f64(params, "repulsion_strength", base.repulsion_strength),
            drift_coupling: param_f64(params, "drift_coupling", base.drift_coupling),
            lift_coupling: param_f64(params, "lift_coupling", base.lift_coupling),
            spin_coupling: param_f64(params, "spin_coupling", base.spin_coupling),
            swing_amplitude: param_f64(params, "swing_amplitude", base.swing_amplitude),
            margin: param_f64(params, "margin", base.margin),
            reset_margin: param_f64(params, "reset_margin", base.reset_margin),
            size: param_range(params, "size", base.size),
            speed_x: param_range(params, "speed_x", base.speed_x),
            speed_y: param_range(params, "speed_y", base.speed_y),
            rotation_speed: param_range(params, "rotation_speed", base.rotation_speed),
            swing_speed: param_range(params, "swing_speed", base.swing_speed),
            opacity: param_range(params, "opacity", base.opacity),
            respawn_band: param_range(params, "respawn_band", base.respawn_band),
            initial_above: param_f64(params, "initial_above", base.initial_above),
            max_live: param_usize(params, "max_live", base.max_live),
            burst_lifespan: param_f64(params, "burst_lifespan", base.burst_lifespan),
            fade_fraction: param_f64(params, "fade_fraction", base.fade_fraction),
            excitation_threshold: param_f64(
                params,
                "excitation_threshold",
                base.excitation_threshold,
            ),
            sprite_px: param_f64(params, "sprite_px", base.sprite_px),
        };
        p.validate()?;
        Ok(p)
    }

    /// Checks the constraints the simulation relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.pointer_radius > 0.0) {
            return Err(EngineError::invalid_param("pointer_radius", "must be positive"));
        }
        if !(self.margin >= 0.0) {
            return Err(EngineError::invalid_param("margin", "must be non-negative"));
        }
        if !(self.reset_margin >= 0.0) {
            return Err(EngineError::invalid_param("reset_margin", "must be non-negative"));
        }
        let ranges = [
            ("size", self.size),
            ("speed_x", self.speed_x),
            ("speed_y", self.speed_y),
            ("rotation_speed", self.rotation_speed),
            ("swing_speed", self.swing_speed),
            ("opacity", self.opacity),
            ("respawn_band", self.respawn_band),
        ];
        if let Some((name, _)) = ranges.iter().find(|(_, (lo, hi))| !(lo <= hi)) {
            return Err(EngineError::invalid_param(name, "range must be [lo, hi] with lo <= hi"));
        }
        if self.respawn_band.1 > 0.0 {
            return Err(EngineError::invalid_param(
                "respawn_band",
                "must lie above the top edge (<= 0)",
            ));
        }
        if self.opacity.0 < 0.0 || self.opacity.1 > 1.0 {
            return Err(EngineError::invalid_param("opacity", "must lie within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.initial_above) {
            return Err(EngineError::invalid_param("initial_above", "must lie within [0, 1]"));
        }
        if self.max_live == 0 {
            return Err(EngineError::invalid_param("max_live", "must be at least 1"));
        }
        if self.count > self.max_live {
            return Err(EngineError::invalid_param("count", "cannot exceed max_live"));
        }
        if !(self.burst_lifespan > 0.0) {
            return Err(EngineError::invalid_param("burst_lifespan", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.fade_fraction) {
            return Err(EngineError::invalid_param("fade_fraction", "must lie within [0, 1]"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "count": self.count,
            "pointer_radius": self.pointer_radius,
            "repulsion_strength": self.repulsion_strength,
            "drift_coupling": self.drift_coupling,
            "lift_coupling": self.lift_coupling,
            "spin_coupling": self.spin_coupling,
            "swing_amplitude": self.swing_amplitude,
            "margin": self.margin,
            "reset_margin": self.reset_margin,
            "size": [self.size.0, self.size.1],
            "speed_x": [self.speed_x.0, self.speed_x.1],
            "speed_y": [self.speed_y.0, self.speed_y.1],
            "rotation_speed": [self.rotation_speed.0, self.rotation_speed.1],
            "swing_speed": [self.swing_speed.0, self.swing_speed.1],
            "opacity": [self.opacity.0, self.opacity.1],
            "respawn_band": [self.respawn_band.0, self.respawn_band.1],
            "initial_above": self.initial_above,
            "max_live": self.max_live,
            "burst_lifespan": self.burst_lifespan,
            "fade_fraction": self.fade_fraction,
            "excitation_threshold": self.excitation_threshold,
            "sprite_px": self.sprite_px,
        })
    }

    pub fn schema() -> Value {
        let d = Self::default();
        json!({
            "preset": {
                "type": "string",
                "default": "canopy",
                "enum": PRESET_NAMES,
                "description": "Base preset the other keys override"
            },
            "count": {
                "type": "integer",
                "default": d.count,
                "min": 0,
                "description": "Petals created at mount"
            },
            "pointer_radius": {
                "type": "number",
                "default": d.pointer_radius,
                "min": 1.0,
                "max": 1000.0,
                "description": "Pointer influence radius in px"
            },
            "repulsion_strength": {
                "type": "number",
                "default": d.repulsion_strength,
                "min": 0.0,
                "max": 100.0,
                "description": "Displacement at zero distance from the pointer"
            },
            "drift_coupling": {
                "type": "number",
                "default": d.drift_coupling,
                "min": 0.0,
                "max": 2.0,
                "description": "Share of displacement applied to x"
            },
            "lift_coupling": {
                "type": "number",
                "default": d.lift_coupling,
                "min": 0.0,
                "max": 2.0,
                "description": "Share of displacement applied to y"
            },
            "spin_coupling": {
                "type": "number",
                "default": d.spin_coupling,
                "min": 0.0,
                "max": 5.0,
                "description": "Extra spin per unit of horizontal displacement"
            },
            "swing_amplitude": {
                "type": "number",
                "default": d.swing_amplitude,
                "min": 0.0,
                "max": 10.0,
                "description": "Lateral swing amplitude"
            },
            "margin": {
                "type": "number",
                "default": d.margin,
                "min": 0.0,
                "description": "Horizontal wrap slack in px"
            },
            "reset_margin": {
                "type": "number",
                "default": d.reset_margin,
                "min": 0.0,
                "description": "Distance below the bottom edge that triggers a respawn"
            },
            "size": {
                "type": "range",
                "default": [d.size.0, d.size.1],
                "description": "Scale factor roll"
            },
            "speed_x": {
                "type": "range",
                "default": [d.speed_x.0, d.speed_x.1],
                "description": "Horizontal drift roll"
            },
            "speed_y": {
                "type": "range",
                "default": [d.speed_y.0, d.speed_y.1],
                "description": "Fall speed roll"
            },
            "rotation_speed": {
                "type": "range",
                "default": [d.rotation_speed.0, d.rotation_speed.1],
                "description": "Spin roll in degrees per frame"
            },
            "swing_speed": {
                "type": "range",
                "default": [d.swing_speed.0, d.swing_speed.1],
                "description": "Swing phase advance roll"
            },
            "opacity": {
                "type": "range",
                "default": [d.opacity.0, d.opacity.1],
                "description": "Opacity roll"
            },
            "respawn_band": {
                "type": "range",
                "default": [d.respawn_band.0, d.respawn_band.1],
                "description": "Vertical band above the top edge for respawns"
            },
            "initial_above": {
                "type": "number",
                "default": d.initial_above,
                "min": 0.0,
                "max": 1.0,
                "description": "Chance an initial petal starts above the top edge"
            },
            "max_live": {
                "type": "integer",
                "default": d.max_live,
                "min": 1,
                "description": "Cap on live petals (oldest evicted first)"
            },
            "burst_lifespan": {
                "type": "number",
                "default": d.burst_lifespan,
                "min": 1.0,
                "description": "Lifetime of burst petals in frames"
            },
            "fade_fraction": {
                "type": "number",
                "default": d.fade_fraction,
                "min": 0.0,
                "max": 1.0,
                "description": "Terminal share of a lifetime spent fading out"
            },
            "excitation_threshold": {
                "type": "number",
                "default": d.excitation_threshold,
                "min": 0.0,
                "description": "Excitation needed to spawn a burst"
            },
            "sprite_px": {
                "type": "number",
                "default": d.sprite_px,
                "min": 1.0,
                "description": "Sprite edge in px before scaling"
            }
        })
    }
}
