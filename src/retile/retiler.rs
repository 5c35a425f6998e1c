use image::{RgbaImage, imageops};
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::SheetError;
use crate::sheet::{GridShape, Rect, TileSize};

/// Where one tile of the old grid ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TilePlacement {
    pub index: u64,
    pub old: (u32, u32),
    /// `None` when the new grid has no room for this index
    pub new: Option<(u32, u32)>,
}

/// Output of [`Retiler::retile`]
#[derive(Debug)]
pub struct RetiledSheet {
    pub image: RgbaImage,
    pub placements: Vec<TilePlacement>,
}

impl RetiledSheet {
    pub fn dropped(&self) -> usize {
        self.placements.iter().filter(|p| p.new.is_none()).count()
    }
}

/// Re-lays a sheet from one grid shape into another, keeping row-major order
#[derive(Debug, Clone, Copy)]
pub struct Retiler {
    pub tile: TileSize,
    pub old: GridShape,
    pub new: GridShape,
}

impl Retiler {
    pub fn new(tile: TileSize, old: GridShape, new: GridShape) -> Self {
        Self { tile, old, new }
    }

    /// New grid with `columns` columns and just enough rows for every old tile.
    pub fn rows_for(old: GridShape, columns: u32) -> Result<u32, SheetError> {
        if columns == 0 {
            return Err(SheetError::InvalidGridGeometry(
                "new column count must be non-zero".to_string(),
            ));
        }
        u32::try_from(old.tile_count().div_ceil(u64::from(columns))).map_err(|e| {
            SheetError::InvalidGridGeometry(format!("row count out of range: {}", e))
        })
    }

    /// Copy every tile of the old grid into a fresh sheet sized for the new grid.
    ///
    /// Tiles past the new grid's capacity are dropped. New grid cells without a
    /// source tile stay transparent.
    pub fn retile(&self, sheet: &RgbaImage) -> Result<RetiledSheet, SheetError> {
        let tile = self.tile.validated()?;
        let old = self.old.validated()?;
        let new = self.new.validated()?;

        let (src_width, src_height) = sheet.dimensions();
        let (old_width, old_height) = old.sheet_size(tile)?;
        let source = Rect::new(0, 0, src_width, src_height);
        if !source.contains(&Rect::new(0, 0, old_width, old_height)) {
            return Err(SheetError::InvalidGridGeometry(format!(
                "{}x{} grid of {}x{} tiles needs {}x{} px, sheet is {}x{}",
                old.columns,
                old.rows,
                tile.width,
                tile.height,
                old_width,
                old_height,
                src_width,
                src_height
            )));
        }

        let (new_width, new_height) = new.sheet_size(tile)?;

        info!(
            "Re-tiling {}x{} -> {}x{} ({}x{} px tiles)",
            old.columns, old.rows, new.columns, new.rows, tile.width, tile.height
        );

        let mut image = RgbaImage::new(new_width, new_height);
        let total = old.tile_count();
        let mut placements = Vec::with_capacity(usize::try_from(total).unwrap_or(0));

        for index in 0..total {
            let from = narrow(old.position(index));
            let src = old.tile_rect(from.0, from.1, tile);

            let to = place(new, index);

            if let Some((col, row)) = to {
                let dst = new.tile_rect(col, row, tile);
                let pixels =
                    imageops::crop_imm(sheet, src.x, src.y, src.width, src.height).to_image();
                imageops::replace(&mut image, &pixels, i64::from(dst.x), i64::from(dst.y));
                debug!("Tile {}: ({}, {}) -> ({}, {})", index, from.0, from.1, col, row);
            } else {
                debug!("Tile {}: ({}, {}) dropped", index, from.0, from.1);
            }

            placements.push(TilePlacement {
                index,
                old: from,
                new: to,
            });
        }

        let retiled = RetiledSheet { image, placements };

        let dropped = retiled.dropped();
        if dropped > 0 {
            warn!(
                "New grid holds {} tiles, dropped the last {} of {}",
                new.tile_count(),
                dropped,
                total
            );
        }

        Ok(retiled)
    }
}

/// Cell of `grid` holding linear index `index`, if the grid has room for it.
fn place(grid: GridShape, index: u64) -> Option<(u32, u32)> {
    let (col, row) = grid.position(index);
    if row < u64::from(grid.rows) {
        Some(narrow((col, row)))
    } else {
        None
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "positions are bounded by a u32 grid shape"
)]
fn narrow((col, row): (u64, u64)) -> (u32, u32) {
    (col as u32, row as u32)
}
