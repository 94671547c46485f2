//! The `Engine` trait every visual effect implements.
//!
//! The trait is object-safe so hosts can hold `Box<dyn Engine>` and switch
//! effects at runtime. Rendering is deliberately not part of it: each effect
//! talks to the sink type that fits it (transforms or text).

use crate::error::EngineError;
use crate::field::Field;
use crate::frame::{Bounds, FrameInput};
use serde_json::Value;

pub trait Engine {
    /// Advance the simulation by `input.delta` baseline frames.
    fn step(&mut self, input: &FrameInput) -> Result<(), EngineError>;

    /// React to a viewport change.
    fn resize(&mut self, bounds: Bounds) -> Result<(), EngineError>;

    /// Grayscale raster of the current state, values in [0, 1].
    fn snapshot(&self) -> Result<Field, EngineError>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema for every parameter: type, default, range, description.
    fn param_schema(&self) -> Value;
}
