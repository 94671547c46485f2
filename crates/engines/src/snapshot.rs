//! PNG output for effect snapshots.
//!
//! Gated behind `png` (default on) so wasm builds skip the `image` crate.

use sakura_fx_core::error::EngineError;
use sakura_fx_core::field::Field;
use std::path::Path;

use crate::pixel::{field_to_rgba, Tint};

/// Writes `field` through `tint` as a PNG.
///
/// `EngineError::InvalidDimensions` when a side does not fit `u32`,
/// `EngineError::Io` when encoding or writing fails.
pub fn write_png(field: &Field, tint: &Tint, path: &Path) -> Result<(), EngineError> {
    let rgba = field_to_rgba(field, tint);
    let w = u32::try_from(field.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(field.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_readable_png() {
        let mut field = Field::new(24, 12).unwrap();
        field.stamp_disc(6.0, 6.0, 4.0, 1.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petals.png");

        write_png(&field, &Tint::SAKURA, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (24, 12));
        assert_eq!(img.get_pixel(5, 5).0, [0xff, 0x34, 0xb8, 255]);
        assert_eq!(img.get_pixel(20, 10).0, [0x0a, 0x0a, 0x0a, 255]);
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let field = Field::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(
            write_png(&field, &Tint::CLOUD, &path),
            Err(EngineError::Io(_))
        ));
    }
}
