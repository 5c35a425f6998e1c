use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::align::{AlignedSheet, TileAlignment};
use crate::error::SheetError;
use crate::retile::{RetiledSheet, Retiler, TilePlacement};
use crate::sheet::{GridShape, TileSize};

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    command: &'static str,
}

impl Meta {
    fn new(command: &'static str) -> Self {
        Self {
            app: "tilesheet",
            version: env!("CARGO_PKG_VERSION"),
            command,
        }
    }
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

/// JSON report for the `align` command
#[derive(Serialize)]
pub struct AlignReport {
    meta: Meta,
    image: String,
    size: Size,
    tile: TileSize,
    grid: GridShape,
    empty_tiles: usize,
    tiles: Vec<TileAlignment>,
}

impl AlignReport {
    pub fn new(aligned: &AlignedSheet, tile: TileSize, image: &Path) -> Self {
        Self {
            meta: Meta::new("align"),
            image: image.to_string_lossy().into_owned(),
            size: Size {
                w: aligned.image.width(),
                h: aligned.image.height(),
            },
            tile,
            grid: aligned.grid,
            empty_tiles: aligned.empty_tiles(),
            tiles: aligned.tiles.clone(),
        }
    }
}

/// JSON report for the `retile` command
#[derive(Serialize)]
pub struct RetileReport {
    meta: Meta,
    image: String,
    size: Size,
    tile: TileSize,
    old_grid: GridShape,
    new_grid: GridShape,
    dropped: usize,
    tiles: Vec<TilePlacement>,
}

impl RetileReport {
    pub fn new(retiled: &RetiledSheet, retiler: &Retiler, image: &Path) -> Self {
        Self {
            meta: Meta::new("retile"),
            image: image.to_string_lossy().into_owned(),
            size: Size {
                w: retiled.image.width(),
                h: retiled.image.height(),
            },
            tile: retiler.tile,
            old_grid: retiler.old,
            new_grid: retiler.new,
            dropped: retiled.dropped(),
            tiles: retiled.placements.clone(),
        }
    }
}

/// Write a report as pretty JSON
pub fn write_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;

    fs::write(path, content).map_err(|e| SheetError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use crate::align::align_sheet;

    #[test]
    fn test_align_report_json() {
        let mut sheet = RgbaImage::new(4, 2);
        sheet.put_pixel(0, 0, Rgba([1, 1, 1, 255]));
        let tile = TileSize::new(2, 2).unwrap();
        let aligned = align_sheet(&sheet, tile).unwrap();

        let report = AlignReport::new(&aligned, tile, Path::new("aligned.png"));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["meta"]["command"], "align");
        assert_eq!(value["image"], "aligned.png");
        assert_eq!(value["grid"]["columns"], 2);
        assert_eq!(value["empty_tiles"], 1);
        assert_eq!(value["tiles"][0]["bottom_most"], 0);
        assert_eq!(value["tiles"][0]["offset"], 1);
        assert!(value["tiles"][1]["bottom_most"].is_null());
    }

    #[test]
    fn test_retile_report_written() {
        let tile = TileSize::new(1, 1).unwrap();
        let retiler = Retiler::new(
            tile,
            GridShape::new(3, 1).unwrap(),
            GridShape::new(2, 1).unwrap(),
        );
        let retiled = retiler.retile(&RgbaImage::new(3, 1)).unwrap();
        let report = RetileReport::new(&retiled, &retiler, Path::new("re.png"));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        write_report(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["meta"]["command"], "retile");
        assert_eq!(value["dropped"], 1);
        assert_eq!(value["tiles"][1]["new"], serde_json::json!([1, 0]));
        assert!(value["tiles"][2]["new"].is_null());
    }
}
