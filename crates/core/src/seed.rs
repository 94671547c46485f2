//! Reproducible description of an effect run.
//!
//! A [`Seed`] names the engine, the viewport it ran in, its parameter
//! overrides, the PRNG seed and how many fixed-delta frames were simulated.
//! Replaying a seed through the same binary reproduces the frame exactly.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

fn default_delta() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    /// Viewport width in CSS pixels.
    pub width: usize,
    /// Viewport height in CSS pixels.
    pub height: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    pub frames: usize,
    /// Frame delta in baseline frames; fixed so runs are deterministic.
    #[serde(default = "default_delta")]
    pub delta: f64,
}

impl Seed {
    /// Seed with empty params, zero frames and a delta of one baseline frame.
    pub fn new(engine: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            frames: 0,
            delta: default_delta(),
        }
    }

    /// Rejects empty or overflowing viewports and non-positive deltas.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(EngineError::invalid_param("delta", "must be a positive number"));
        }
        Ok(())
    }
}
