#![deny(unsafe_code)]
//! Effect registry: maps effect names to implementations and provides
//! CPU-side snapshot rendering.
//!
//! Sits between `sakura-fx-core` (the `Engine` trait) and the effect crates
//! (`sakura-fx-petals`, `sakura-fx-clouds`) so the CLI can pick an effect by
//! name. The wasm bindings hold the concrete effect types instead, since
//! they attach DOM sinks to them directly.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use pixel::Tint;
use sakura_fx_clouds::CloudField;
use sakura_fx_core::error::EngineError;
use sakura_fx_core::field::Field;
use sakura_fx_core::{Bounds, Engine, FrameInput, Seed};
use sakura_fx_petals::PetalField;
use serde_json::Value;

/// All available effect names.
const ENGINE_NAMES: &[&str] = &["petals", "clouds"];

/// Every available effect behind one type.
pub enum EngineKind {
    /// Falling petals with pointer repulsion.
    Petals(PetalField),
    /// Scrolling ASCII clouds.
    Clouds(CloudField),
}

impl EngineKind {
    /// Constructs an effect by name. `width` and `height` are viewport px.
    ///
    /// `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        match name {
            "petals" => Ok(EngineKind::Petals(PetalField::from_json(width, height, seed, params)?)),
            "clouds" => Ok(EngineKind::Clouds(CloudField::from_json(width, height, seed, params)?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Builds the effect a seed describes and replays its frames.
    pub fn from_seed(seed: &Seed) -> Result<Self, EngineError> {
        seed.validate()?;
        let mut engine =
            Self::from_name(&seed.engine, seed.width, seed.height, seed.seed, &seed.params)?;
        let bounds = Bounds::new(seed.width as f64, seed.height as f64);
        let input = FrameInput::idle(bounds).with_delta(seed.delta);
        for _ in 0..seed.frames {
            engine.step(&input)?;
        }
        Ok(engine)
    }

    /// Returns a slice of all recognized effect names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Named parameter presets for an effect.
    pub fn presets(name: &str) -> &'static [&'static str] {
        match name {
            "petals" => sakura_fx_petals::params::PRESET_NAMES,
            _ => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Petals(_) => "petals",
            EngineKind::Clouds(_) => "clouds",
        }
    }

    /// Colors used when rasterizing this effect.
    pub fn tint(&self) -> Tint {
        match self {
            EngineKind::Petals(_) => Tint::SAKURA,
            EngineKind::Clouds(_) => Tint::CLOUD,
        }
    }

    /// The frame as text, for effects that render to text.
    pub fn render_text(&self) -> Option<String> {
        match self {
            EngineKind::Petals(_) => None,
            EngineKind::Clouds(e) => Some(e.render_text()),
        }
    }
}

impl Engine for EngineKind {
    fn step(&mut self, input: &FrameInput) -> Result<(), EngineError> {
        match self {
            EngineKind::Petals(e) => e.step(input),
            EngineKind::Clouds(e) => e.step(input),
        }
    }

    fn resize(&mut self, bounds: Bounds) -> Result<(), EngineError> {
        match self {
            EngineKind::Petals(e) => e.resize(bounds),
            EngineKind::Clouds(e) => e.resize(bounds),
        }
    }

    fn snapshot(&self) -> Result<Field, EngineError> {
        match self {
            EngineKind::Petals(e) => e.snapshot(),
            EngineKind::Clouds(e) => e.snapshot(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Petals(e) => e.params(),
            EngineKind::Clouds(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Petals(e) => e.param_schema(),
            EngineKind::Clouds(e) => e.param_schema(),
        }
    }
}
