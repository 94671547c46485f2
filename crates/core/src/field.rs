//! Dense row-major scalar grid with values in [0, 1].
//!
//! Used as the cloud density grid and as the CPU raster that snapshots draw
//! from. Unlike a simulation lattice it does not wrap: out-of-range reads
//! return `None` and writes report [`EngineError::OutOfBounds`].

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

fn cell_count(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)
}

impl Field {
    /// Zero-filled field. Fails on a zero or overflowing size.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Builds a field from row-major data, which must hold exactly
    /// `width * height` values. Values are clamped to [0, 1].
    pub fn from_data(width: usize, height: usize, mut data: Vec<f64>) -> Result<Self, EngineError> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(EngineError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        data.iter_mut().for_each(|v| *v = v.clamp(0.0, 1.0));
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells (columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells (rows).
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes a clamped value at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<(), EngineError> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.data[y * self.width + x] = value.clamp(0.0, 1.0);
        Ok(())
    }

    /// One row as a slice.
    pub fn row(&self, y: usize) -> Option<&[f64]> {
        (y < self.height).then(|| &self.data[y * self.width..(y + 1) * self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.width)
    }

    /// Moves every column one step left, dropping column 0. The rightmost
    /// column is zeroed and left for the caller to refill.
    pub fn shift_left(&mut self) {
        let w = self.width;
        for row in self.data.chunks_exact_mut(w) {
            row.copy_within(1.., 0);
            row[w - 1] = 0.0;
        }
    }

    /// Fills column `x` with `f(row)`, clamped. Out-of-range columns are ignored.
    pub fn fill_column(&mut self, x: usize, mut f: impl FnMut(usize) -> f64) {
        if x >= self.width {
            return;
        }
        for y in 0..self.height {
            self.data[y * self.width + x] = f(y).clamp(0.0, 1.0);
        }
    }

    /// Fills every cell with `f(x, y)`, clamped.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize) -> f64) {
        let w = self.width;
        for (i, v) in self.data.iter_mut().enumerate() {
            *v = f(i % w, i / w).clamp(0.0, 1.0);
        }
    }

    /// Stamps a filled disc, keeping the brighter of old and new per cell.
    /// Parts of the disc outside the field are clipped.
    pub fn stamp_disc(&mut self, cx: f64, cy: f64, radius: f64, value: f64) {
        if radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        let x0 = (cx - radius).floor().max(0.0) as usize;
        let y0 = (cy - radius).floor().max(0.0) as usize;
        let x1 = ((cx + radius).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((cy + radius).ceil().max(0.0) as usize).min(self.height);
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    let cell = &mut self.data[y * self.width + x];
                    *cell = cell.max(value);
                }
            }
        }
    }

    /// Iterates `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (i % self.width, i / self.width, v))
    }
}
