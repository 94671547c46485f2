#![deny(unsafe_code)]
//! Scrolling ASCII cloud backdrop.
//!
//! A [`CloudField`] keeps one density value per character cell. Every tick
//! the grid moves one column to the left and a fresh column is sampled at
//! the right edge from the banded sine noise in [`noise`]. Weak samples are
//! cut to 0 so the sky shows separate clouds rather than uniform haze.
//! Frames are printed with the glyph ramp in [`glyph`].

pub mod glyph;
pub mod noise;

pub use glyph::{glyph, RAMP};
pub use noise::{falloff, layers_for, sample, threshold, CloudLayer};

use sakura_fx_core::error::EngineError;
use sakura_fx_core::field::Field;
use sakura_fx_core::params::param_f64;
use sakura_fx_core::{Bounds, Engine, FrameInput, IntervalTimer, TextSink};
use serde_json::{json, Value};

/// Cell width in px: a 12px monospace glyph plus letter spacing.
const DEFAULT_CHAR_WIDTH_PX: f64 = 9.0;
/// Cell height in px (line height).
const DEFAULT_CHAR_HEIGHT_PX: f64 = 12.0;
/// Horizontal noise offset added per tick.
const DEFAULT_SCROLL_SPEED: f64 = 0.2;
/// Minimum time between ticks.
const DEFAULT_INTERVAL_MS: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParams {
    pub char_width_px: f64,
    pub char_height_px: f64,
    pub threshold: f64,
    pub scroll_speed: f64,
    pub interval_ms: f64,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            char_width_px: DEFAULT_CHAR_WIDTH_PX,
            char_height_px: DEFAULT_CHAR_HEIGHT_PX,
            threshold: noise::DEFAULT_THRESHOLD,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl CloudParams {
    /// Reads overrides from a JSON object; missing keys keep their defaults.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let d = Self::default();
        let p = Self {
            char_width_px: param_f64(params, "char_width_px", d.char_width_px),
            char_height_px: param_f64(params, "char_height_px", d.char_height_px),
            threshold: param_f64(params, "threshold", d.threshold),
            scroll_speed: param_f64(params, "scroll_speed", d.scroll_speed),
            interval_ms: param_f64(params, "interval_ms", d.interval_ms),
        };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.char_width_px > 0.0) {
            return Err(EngineError::invalid_param("char_width_px", "must be positive"));
        }
        if !(self.char_height_px > 0.0) {
            return Err(EngineError::invalid_param("char_height_px", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(EngineError::invalid_param("threshold", "must lie within [0, 1)"));
        }
        if !self.scroll_speed.is_finite() {
            return Err(EngineError::invalid_param("scroll_speed", "must be finite"));
        }
        if !(self.interval_ms >= 0.0) {
            return Err(EngineError::invalid_param("interval_ms", "must be non-negative"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "char_width_px": self.char_width_px,
            "char_height_px": self.char_height_px,
            "threshold": self.threshold,
            "scroll_speed": self.scroll_speed,
            "interval_ms": self.interval_ms,
        })
    }

    pub fn schema() -> Value {
        let d = Self::default();
        json!({
            "char_width_px": {
                "type": "number",
                "default": d.char_width_px,
                "min": 1.0,
                "description": "Pixel width of one character cell"
            },
            "char_height_px": {
                "type": "number",
                "default": d.char_height_px,
                "min": 1.0,
                "description": "Pixel height of one character cell"
            },
            "threshold": {
                "type": "number",
                "default": d.threshold,
                "min": 0.0,
                "max": 1.0,
                "description": "Samples at or below this are clear sky"
            },
            "scroll_speed": {
                "type": "number",
                "default": d.scroll_speed,
                "description": "Noise offset added per tick"
            },
            "interval_ms": {
                "type": "number",
                "default": d.interval_ms,
                "min": 0.0,
                "description": "Minimum milliseconds between ticks"
            }
        })
    }

    /// Grid size for a viewport in px, at least one cell each way.
    pub fn grid_for(&self, px_width: f64, px_height: f64) -> (usize, usize) {
        let columns = (px_width / self.char_width_px).floor().max(1.0) as usize;
        let rows = (px_height / self.char_height_px).floor().max(1.0) as usize;
        (columns, rows)
    }
}

/// Character-cell cloud grid.
pub struct CloudField {
    grid: Field,
    layers: Vec<CloudLayer>,
    params: CloudParams,
    /// Horizontal noise position of the rightmost column, minus the width.
    offset: f64,
    /// Started by the first [`CloudField::tick_at`].
    timer: Option<IntervalTimer>,
}

impl CloudField {
    /// A `columns` x `rows` grid seeded with thresholded noise.
    pub fn new(columns: usize, rows: usize, params: CloudParams) -> Result<Self, EngineError> {
        params.validate()?;
        let mut field = Self {
            grid: Field::new(columns, rows)?,
            layers: Vec::new(),
            params,
            offset: 0.0,
            timer: None,
        };
        field.reseed();
        Ok(field)
    }

    /// Sizes the grid to fit a viewport given in px.
    pub fn for_viewport(
        px_width: f64,
        px_height: f64,
        params: CloudParams,
    ) -> Result<Self, EngineError> {
        if !Bounds::new(px_width, px_height).is_drawable() {
            return Err(EngineError::InvalidDimensions);
        }
        let (columns, rows) = params.grid_for(px_width, px_height);
        Self::new(columns, rows, params)
    }

    /// Creates a field from a JSON params object. `width` and `height` are
    /// viewport px; the grid is derived from the cell size. The noise is
    /// deterministic, so the seed is unused.
    pub fn from_json(
        width: usize,
        height: usize,
        _seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        Self::for_viewport(width as f64, height as f64, CloudParams::from_json(params)?)
    }

    /// Reallocates for a new viewport and starts the scroll over.
    pub fn resize_viewport(&mut self, px_width: f64, px_height: f64) -> Result<(), EngineError> {
        if !Bounds::new(px_width, px_height).is_drawable() {
            return Err(EngineError::InvalidDimensions);
        }
        let (columns, rows) = self.params.grid_for(px_width, px_height);
        self.grid = Field::new(columns, rows)?;
        self.offset = 0.0;
        self.reseed();
        Ok(())
    }

    fn reseed(&mut self) {
        self.layers = layers_for(self.grid.height());
        let layers = &self.layers;
        let cutoff = self.params.threshold;
        self.grid
            .fill_with(|x, y| threshold(sample(layers, x as f64, y as f64), cutoff));
    }

    pub fn columns(&self) -> usize {
        self.grid.width()
    }

    pub fn rows(&self) -> usize {
        self.grid.height()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn grid(&self) -> &Field {
        &self.grid
    }

    pub fn layers(&self) -> &[CloudLayer] {
        &self.layers
    }

    pub fn settings(&self) -> &CloudParams {
        &self.params
    }

    /// One scroll step: shift left, sample a new rightmost column.
    pub fn scroll(&mut self) {
        self.offset += self.params.scroll_speed;
        self.grid.shift_left();
        let x = self.grid.width() as f64 + self.offset;
        let last = self.grid.width() - 1;
        let layers = &self.layers;
        let cutoff = self.params.threshold;
        self.grid
            .fill_column(last, |y| threshold(sample(layers, x, y as f64), cutoff));
    }

    /// Scrolls if the tick interval elapsed since the last scroll. The first
    /// call only starts the clock. Returns whether the grid changed.
    pub fn tick_at(&mut self, now_ms: f64) -> bool {
        match self.timer.as_mut() {
            Some(timer) => {
                if timer.poll(now_ms) {
                    self.scroll();
                    true
                } else {
                    false
                }
            }
            None => {
                self.timer = Some(IntervalTimer::new(self.params.interval_ms, now_ms));
                false
            }
        }
    }

    /// The frame as text: one line per row, each ending in `'\n'`.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(self.rows() * (self.columns() + 1));
        for row in self.grid.rows() {
            out.extend(row.iter().map(|&v| glyph(v)));
            out.push('\n');
        }
        out
    }

    pub fn render(&self, sink: &mut dyn TextSink) {
        sink.set_text(&self.render_text());
    }
}

impl Engine for CloudField {
    /// Scrolls once; the delta is ignored since the grid moves per tick,
    /// not per unit of time.
    fn step(&mut self, _input: &FrameInput) -> Result<(), EngineError> {
        self.scroll();
        Ok(())
    }

    fn resize(&mut self, bounds: Bounds) -> Result<(), EngineError> {
        self.resize_viewport(bounds.width, bounds.height)
    }

    fn snapshot(&self) -> Result<Field, EngineError> {
        Ok(self.grid.clone())
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        CloudParams::schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> CloudField {
        CloudField::for_viewport(1350.0, 720.0, CloudParams::default()).unwrap()
    }

    #[test]
    fn viewport_maps_to_cells() {
        let f = field();
        assert_eq!((f.columns(), f.rows()), (150, 60));
        assert_eq!(f.layers().len(), 3);
    }

    #[test]
    fn tiny_viewport_still_has_one_cell() {
        let f = CloudField::for_viewport(4.0, 4.0, CloudParams::default()).unwrap();
        assert_eq!((f.columns(), f.rows()), (1, 1));
        assert_eq!(f.render_text(), " \n");
    }

    #[test]
    fn empty_viewport_is_rejected() {
        assert!(CloudField::for_viewport(0.0, 500.0, CloudParams::default()).is_err());
        assert!(CloudField::for_viewport(f64::NAN, 500.0, CloudParams::default()).is_err());
    }

    #[test]
    fn seeded_grid_matches_thresholded_noise() {
        let f = field();
        for (x, y, v) in f.grid().iter() {
            let expected = threshold(sample(f.layers(), x as f64, y as f64), 0.35).min(1.0);
            assert_eq!(v, expected, "cell ({x}, {y})");
        }
    }

    #[test]
    fn scroll_shifts_left_and_samples_right_edge() {
        let mut f = field();
        let before = f.grid().clone();
        f.scroll();
        assert!((f.offset() - 0.2).abs() < 1e-12);
        for y in 0..f.rows() {
            for x in 0..f.columns() - 1 {
                assert_eq!(f.grid().get(x, y), before.get(x + 1, y));
            }
            let expected = threshold(sample(f.layers(), 150.2, y as f64), 0.35).min(1.0);
            assert_eq!(f.grid().get(149, y), Some(expected));
        }
    }

    #[test]
    fn render_has_one_line_per_row() {
        let f = field();
        let text = f.render_text();
        assert!(text.ends_with('\n'));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 60);
        assert!(lines.iter().all(|l| l.chars().count() == 150));
        assert!(text.chars().any(|c| c != ' ' && c != '\n'), "expected some cloud");
    }

    #[test]
    fn render_pushes_to_text_sink() {
        let f = field();
        let mut out = String::new();
        f.render(&mut out);
        assert_eq!(out, f.render_text());
    }

    #[test]
    fn tick_at_is_throttled() {
        let mut f = field();
        assert!(!f.tick_at(1_000.0));
        assert!(!f.tick_at(1_016.0));
        assert!(!f.tick_at(1_079.0));
        assert!(f.tick_at(1_080.0));
        assert!(!f.tick_at(1_100.0));
        assert!(f.tick_at(1_500.0));
        assert!((f.offset() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn resize_reallocates_and_resets_offset() {
        let mut f = field();
        f.scroll();
        f.scroll();
        f.resize_viewport(900.0, 240.0).unwrap();
        assert_eq!((f.columns(), f.rows()), (100, 20));
        assert_eq!(f.offset(), 0.0);
        assert_eq!(f.layers()[1].center_row, 10.0);
        assert!(f.resize_viewport(-5.0, 240.0).is_err());
    }

    #[test]
    fn engine_resize_and_snapshot() {
        let mut f = field();
        f.resize(Bounds::new(90.0, 120.0)).unwrap();
        let snap = f.snapshot().unwrap();
        assert_eq!((snap.width(), snap.height()), (10, 10));
        f.step(&FrameInput::idle(Bounds::new(90.0, 120.0))).unwrap();
        assert!((f.offset() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn params_from_json_override_and_validate() {
        let p = CloudParams::from_json(&json!({"threshold": 0.5, "interval_ms": 40})).unwrap();
        assert_eq!(p.threshold, 0.5);
        assert_eq!(p.interval_ms, 40.0);
        assert_eq!(p.char_width_px, 9.0);
        assert!(CloudParams::from_json(&json!({"char_width_px": 0})).is_err());
        assert!(CloudParams::from_json(&json!({"threshold": 1.5})).is_err());
    }

    #[test]
    fn schema_covers_params() {
        let schema = CloudParams::schema();
        for key in CloudParams::default().to_json().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "missing {key}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn cells_are_never_in_the_cut_band(
            w in 9.0_f64..900.0,
            h in 12.0_f64..480.0,
            ticks in 0_usize..40,
        ) {
            let mut f = CloudField::for_viewport(w, h, CloudParams::default()).unwrap();
            for _ in 0..ticks {
                f.scroll();
            }
            for (_, _, v) in f.grid().iter() {
                prop_assert!(v == 0.0 || (v > 0.35 && v <= 1.0), "v = {}", v);
            }
        }
    }
}
