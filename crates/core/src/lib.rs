#![deny(unsafe_code)]
//! Core types and traits for the sakura-fx visual effects.
//!
//! Provides the `Engine` trait, the `Field` scalar grid, frame timing
//! (`FrameClock`, `IntervalTimer`, `FrameInput`), camera projection, the
//! render sink traits, the `Xorshift64` PRNG, `Seed`, and parameter helpers.

pub mod camera;
pub mod engine;
pub mod error;
pub mod field;
pub mod frame;
pub mod params;
pub mod prng;
pub mod seed;
pub mod sink;

pub use camera::Camera;
pub use engine::Engine;
pub use error::EngineError;
pub use field::Field;
pub use frame::{Bounds, FrameClock, FrameInput, IntervalTimer};
pub use prng::Xorshift64;
pub use seed::Seed;
pub use sink::{RecordingSink, TextSink, Transform, TransformSink};

pub use glam;
