use image::{RgbaImage, imageops};
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::SheetError;
use crate::sheet::{GridShape, TileSize};

/// Bottom row and downward shift of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileShift {
    /// Lowest row holding a visible pixel, `None` for fully transparent tiles
    pub bottom_most: Option<u32>,
    pub offset: u32,
}

/// Alignment applied to one tile of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileAlignment {
    pub column: u32,
    pub row: u32,
    #[serde(flatten)]
    pub shift: TileShift,
}

/// Output of [`align_sheet`]
#[derive(Debug)]
pub struct AlignedSheet {
    pub image: RgbaImage,
    pub grid: GridShape,
    pub tiles: Vec<TileAlignment>,
}

impl AlignedSheet {
    pub fn empty_tiles(&self) -> usize {
        self.tiles.iter().filter(|t| t.shift.bottom_most.is_none()).count()
    }
}

/// Find the lowest row of `tile` containing a pixel with non-zero alpha.
pub fn bottom_most_visible_row(tile: &RgbaImage) -> Option<u32> {
    (0..tile.height())
        .rev()
        .find(|&y| (0..tile.width()).any(|x| tile.get_pixel(x, y)[3] != 0))
}

/// Shift the tile content down so its lowest visible row lands on the last row.
///
/// Fully transparent tiles count as having their bottom at row 0 and are
/// shifted by `height - 1`. Content pushed past the bottom edge is clipped.
pub fn align_tile(tile: &RgbaImage) -> (RgbaImage, TileShift) {
    let bottom_most = bottom_most_visible_row(tile);
    let offset = tile.height().saturating_sub(1) - bottom_most.unwrap_or(0);

    let mut aligned = RgbaImage::new(tile.width(), tile.height());
    imageops::replace(&mut aligned, tile, 0, i64::from(offset));

    (
        aligned,
        TileShift {
            bottom_most,
            offset,
        },
    )
}

/// Align every tile of a sheet to a common baseline.
///
/// The sheet must be an exact multiple of `tile_size`. The result has the same
/// dimensions as the input.
pub fn align_sheet(sheet: &RgbaImage, tile_size: TileSize) -> Result<AlignedSheet, SheetError> {
    let tile_size = tile_size.validated()?;
    let (width, height) = sheet.dimensions();
    let grid = GridShape::fit(width, height, tile_size)?;

    info!(
        "Aligning {}x{} tiles of {}x{} px",
        grid.columns, grid.rows, tile_size.width, tile_size.height
    );

    let mut image = RgbaImage::new(width, height);
    let mut tiles = Vec::with_capacity(usize::try_from(grid.tile_count()).unwrap_or(0));

    for row in 0..grid.rows {
        for column in 0..grid.columns {
            let rect = grid.tile_rect(column, row, tile_size);
            let tile = imageops::crop_imm(sheet, rect.x, rect.y, rect.width, rect.height).to_image();

            let (aligned, shift) = align_tile(&tile);
            imageops::replace(&mut image, &aligned, i64::from(rect.x), i64::from(rect.y));

            match shift.bottom_most {
                Some(bottom) => debug!(
                    "Tile ({}, {}): bottom row {}, shifted by {}",
                    column, row, bottom, shift.offset
                ),
                None => debug!(
                    "Tile ({}, {}): empty, shifted by {}",
                    column, row, shift.offset
                ),
            }

            tiles.push(TileAlignment { column, row, shift });
        }
    }

    let aligned = AlignedSheet { image, grid, tiles };

    let empty = aligned.empty_tiles();
    if empty > 0 {
        warn!(
            "{} fully transparent tile(s) treated as bottom row 0 (shift {})",
            empty,
            tile_size.height - 1
        );
    }

    Ok(aligned)
}
