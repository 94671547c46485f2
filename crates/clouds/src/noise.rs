//! Layered sine "noise" that shapes the cloud bands.
//!
//! Not real gradient noise: four sine octaves mixed over x and y, evaluated
//! only inside horizontal bands and faded toward each band's edges.

/// Cutoff below which a sample is treated as clear sky.
pub const DEFAULT_THRESHOLD: f64 = 0.35;
/// Exponent of the vertical falloff inside a band.
const FALLOFF_EXPONENT: f64 = 1.8;

/// `(center, half_height, scale)` of each band; center and half-height are
/// fractions of the row count.
const BANDS: [(f64, f64, f64); 3] = [(0.2, 0.2, 0.1), (0.5, 0.25, 0.08), (0.825, 0.225, 0.09)];

/// One horizontal cloud band, in rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudLayer {
    pub center_row: f64,
    pub half_height: f64,
    /// Spatial frequency applied to both axes before the sine mix.
    pub scale: f64,
}

impl CloudLayer {
    /// Value this band contributes at `(x, y)`, or `None` outside it.
    pub fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let d = (y - self.center_row).abs();
        if !(d < self.half_height) {
            return None;
        }
        let v = (octaves(x * self.scale, y * self.scale) + 1.0) / 2.0;
        Some(v * falloff(d, self.half_height))
    }
}

/// Bands for a grid `rows` tall. Rows are whole, so centers and heights
/// are floored; a very short grid can end up with empty bands.
pub fn layers_for(rows: usize) -> Vec<CloudLayer> {
    let rows = rows as f64;
    BANDS
        .iter()
        .map(|&(center, half, scale)| CloudLayer {
            center_row: (rows * center).floor(),
            half_height: (rows * half).floor(),
            scale,
        })
        .collect()
}

fn octaves(nx: f64, ny: f64) -> f64 {
    0.5 * (1.2 * nx + 0.8 * ny).sin()
        + 0.3 * (2.5 * nx - 1.5 * ny).sin()
        + 0.15 * (4.0 * nx + 3.0 * ny).sin()
        + 0.25 * (0.7 * nx + 2.0 * ny).sin()
}

/// 1 at the band center, 0 at its edge.
pub fn falloff(distance: f64, half_height: f64) -> f64 {
    1.0 - (distance / half_height).powf(FALLOFF_EXPONENT)
}

/// Strongest band value at `(x, y)`; bands never add up. 0 outside all bands.
pub fn sample(layers: &[CloudLayer], x: f64, y: f64) -> f64 {
    layers
        .iter()
        .filter_map(|layer| layer.sample(x, y))
        .fold(0.0, f64::max)
}

/// Keeps `v` when it is above `cutoff`, otherwise 0.
pub fn threshold(v: f64, cutoff: f64) -> f64 {
    if v > cutoff {
        v
    } else {
        0.0
    }
}
