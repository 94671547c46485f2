//! Density ramp used to print the grid.

/// Sparse to dense. The leading spaces keep thin haze invisible.
pub const RAMP: [char; 11] = [' ', ' ', ' ', ' ', '.', ':', '~', '=', '*', '#', '@'];

/// Glyph for a cell value in [0, 1]. Out-of-range values are clamped.
pub fn glyph(value: f64) -> char {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let idx = (v * (RAMP.len() - 1) as f64).floor() as usize;
    RAMP[idx.min(RAMP.len() - 1)]
}
