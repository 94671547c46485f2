//! Field to RGBA8 conversion.
//!
//! Always available, with or without the `png` feature. Effects are
//! single-channel, so a two-stop [`Tint`] is all the color they need.

use sakura_fx_core::field::Field;

/// Linear blend from `background` at 0 to `ink` at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub background: [u8; 3],
    pub ink: [u8; 3],
}

impl Tint {
    /// Pink petals on near-black.
    pub const SAKURA: Tint = Tint {
        background: [0x0a, 0x0a, 0x0a],
        ink: [0xff, 0x34, 0xb8],
    };

    /// Gray cloud glyph color on black.
    pub const CLOUD: Tint = Tint {
        background: [0x00, 0x00, 0x00],
        ink: [0x9c, 0xa3, 0xaf],
    };

    pub fn sample(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        [
            mix(self.background[0], self.ink[0]),
            mix(self.background[1], self.ink[1]),
            mix(self.background[2], self.ink[2]),
        ]
    }
}

/// Writes `width * height * 4` bytes: tinted R, G, B and an opaque alpha.
pub fn field_to_rgba(field: &Field, tint: &Tint) -> Vec<u8> {
    field
        .data()
        .iter()
        .flat_map(|&t| {
            let [r, g, b] = tint.sample(t);
            [r, g, b, 255u8]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tint_endpoints() {
        assert_eq!(Tint::SAKURA.sample(0.0), [0x0a, 0x0a, 0x0a]);
        assert_eq!(Tint::SAKURA.sample(1.0), [0xff, 0x34, 0xb8]);
        assert_eq!(Tint::CLOUD.sample(f64::NAN), [0, 0, 0]);
        assert_eq!(Tint::CLOUD.sample(4.0), [0x9c, 0xa3, 0xaf]);
    }

    #[test]
    fn midpoint_blends() {
        let tint = Tint {
            background: [0, 100, 200],
            ink: [200, 100, 0],
        };
        assert_eq!(tint.sample(0.5), [100, 100, 100]);
    }

    #[test]
    fn opaque_alpha() {
        let field = Field::from_data(2, 2, vec![0.0, 0.3, 0.6, 1.0]).unwrap();
        let buf = field_to_rgba(&field, &Tint::SAKURA);
        assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
        assert_eq!(&buf[12..15], &[0xff, 0x34, 0xb8]);
    }

    proptest! {
        #[test]
        fn buffer_covers_every_cell(w in 1_usize..40, h in 1_usize..40) {
            let field = Field::new(w, h).unwrap();
            prop_assert_eq!(field_to_rgba(&field, &Tint::CLOUD).len(), w * h * 4);
        }
    }
}
