use std::path::Path;

use image::{ImageReader, RgbaImage};
use log::debug;

use crate::error::SheetError;

/// Load a sprite sheet as an RGBA buffer
///
/// With `require_alpha`, images whose pixel format carries no alpha channel
/// are rejected instead of being silently converted to fully opaque RGBA.
pub fn load_sheet(path: &Path, require_alpha: bool) -> Result<RgbaImage, SheetError> {
    if !path.exists() {
        return Err(SheetError::InputNotFound(path.to_path_buf()));
    }

    let img = ImageReader::open(path)
        .map_err(|e| SheetError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| SheetError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| SheetError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

    let color = img.color();
    if require_alpha && !color.has_alpha() {
        return Err(SheetError::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            color,
        });
    }

    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        color
    );

    Ok(img.into_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.png");

        let err = load_sheet(&path, true).unwrap_err();
        assert!(matches!(err, SheetError::InputNotFound(p) if p == path));
    }

    #[test]
    fn test_load_rgba() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheet.png");
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(3, 1, Rgba([1, 2, 3, 200]));
        img.save(&path).unwrap();

        let loaded = load_sheet(&path, true).unwrap();
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(*loaded.get_pixel(3, 1), Rgba([1, 2, 3, 200]));
    }

    #[test]
    fn test_rgb_rejected_when_alpha_required() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("opaque.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path).unwrap();

        let err = load_sheet(&path, true).unwrap_err();
        assert!(matches!(err, SheetError::UnsupportedPixelFormat { .. }));
    }

    #[test]
    fn test_rgb_converted_when_alpha_optional() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("opaque.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path).unwrap();

        let loaded = load_sheet(&path, false).unwrap();
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_garbage_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = load_sheet(&path, false).unwrap_err();
        assert!(matches!(err, SheetError::ImageLoad { .. }));
    }
}
