//! Imperative render backends.
//!
//! Effects never own DOM nodes or terminal handles. They push transforms or
//! text to a sink, and the host decides what that means: the wasm crate
//! writes inline styles, the CLI prints, tests record.

use serde::{Deserialize, Serialize};

/// Placement of one sprite: translation in px, rotation in degrees, uniform
/// scale and opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Transform {
    /// CSS `transform` value for this placement.
    pub fn css(&self) -> String {
        format!(
            "translate3d({}px,{}px,0)rotate({}deg)scale({})",
            self.x, self.y, self.rotation, self.scale
        )
    }

    /// Whether the geometric part (everything except opacity) matches.
    pub fn same_placement(&self, other: &Transform) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.rotation == other.rotation
            && self.scale == other.scale
    }
}

/// Receives sprite placements keyed by entity id.
pub trait TransformSink {
    fn apply(&mut self, id: u64, transform: &Transform);

    /// The entity is gone; release whatever represents it.
    fn remove(&mut self, id: u64);
}

/// Receives a whole text frame.
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

impl TextSink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// Sink that keeps every call, for tests and frame dumps.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub applied: Vec<(u64, Transform)>,
    pub removed: Vec<u64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.applied.clear();
        self.removed.clear();
    }

    /// Most recent transform applied to `id`.
    pub fn last_for(&self, id: u64) -> Option<&Transform> {
        self.applied
            .iter()
            .rev()
            .find(|(applied_id, _)| *applied_id == id)
            .map(|(_, t)| t)
    }
}

impl TransformSink for RecordingSink {
    fn apply(&mut self, id: u64, transform: &Transform) {
        self.applied.push((id, *transform));
    }

    fn remove(&mut self, id: u64) {
        self.removed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(x: f64) -> Transform {
        Transform {
            x,
            y: 20.5,
            rotation: 90.0,
            scale: 0.5,
            opacity: 1.0,
        }
    }

    #[test]
    fn css_matches_browser_notation() {
        assert_eq!(
            t(10.0).css(),
            "translate3d(10px,20.5px,0)rotate(90deg)scale(0.5)"
        );
    }

    #[test]
    fn same_placement_ignores_opacity() {
        let a = t(1.0);
        let b = Transform { opacity: 0.2, ..a };
        assert!(a.same_placement(&b));
        assert!(!a.same_placement(&t(2.0)));
    }

    #[test]
    fn recording_sink_tracks_last_transform() {
        let mut sink = RecordingSink::new();
        sink.apply(7, &t(1.0));
        sink.apply(8, &t(2.0));
        sink.apply(7, &t(3.0));
        sink.remove(8);
        assert_eq!(sink.last_for(7).map(|t| t.x), Some(3.0));
        assert_eq!(sink.removed, vec![8]);
        sink.clear();
        assert!(sink.applied.is_empty() && sink.removed.is_empty());
    }

    #[test]
    fn string_is_a_text_sink() {
        let mut s = String::from("old");
        s.set_text("new frame");
        assert_eq!(s, "new frame");
    }
}
