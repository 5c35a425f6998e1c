use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// Pixel size of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub fn new(width: u32, height: u32) -> Result<Self, SheetError> {
        if width == 0 || height == 0 {
            return Err(SheetError::InvalidGridGeometry(format!(
                "tile size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Re-run the non-zero check on a value that may have been built directly.
    pub fn validated(self) -> Result<Self, SheetError> {
        Self::new(self.width, self.height)
    }
}

/// Number of columns and rows in a tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub columns: u32,
    pub rows: u32,
}

impl GridShape {
    pub fn new(columns: u32, rows: u32) -> Result<Self, SheetError> {
        if columns == 0 || rows == 0 {
            return Err(SheetError::InvalidGridGeometry(format!(
                "grid shape must be non-zero, got {}x{}",
                columns, rows
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Re-run the non-zero check on a value that may have been built directly.
    pub fn validated(self) -> Result<Self, SheetError> {
        Self::new(self.columns, self.rows)
    }

    /// Grid that exactly covers a sheet of the given pixel size.
    pub fn fit(width: u32, height: u32, tile: TileSize) -> Result<Self, SheetError> {
        let tile = tile.validated()?;
        if width % tile.width != 0 || height % tile.height != 0 {
            return Err(SheetError::InvalidGridGeometry(format!(
                "sheet {}x{} is not evenly divisible by tile size {}x{}",
                width, height, tile.width, tile.height
            )));
        }
        Self::new(width / tile.width, height / tile.height)
    }

    pub fn tile_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Row-major (column, row) of a linear tile index.
    ///
    /// The row is not bounded by `self.rows`; callers check capacity.
    pub fn position(&self, index: u64) -> (u64, u64) {
        let columns = u64::from(self.columns);
        (index % columns, index / columns)
    }

    /// Pixel size of a sheet holding this grid.
    pub fn sheet_size(&self, tile: TileSize) -> Result<(u32, u32), SheetError> {
        let width = self.columns.checked_mul(tile.width);
        let height = self.rows.checked_mul(tile.height);
        match (width, height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(SheetError::InvalidGridGeometry(format!(
                "{}x{} grid of {}x{} tiles overflows the sheet size",
                self.columns, self.rows, tile.width, tile.height
            ))),
        }
    }

    /// Pixel rectangle of the tile at (column, row).
    pub fn tile_rect(&self, column: u32, row: u32, tile: TileSize) -> Rect {
        Rect::new(
            column * tile.width,
            row * tile.height,
            tile.width,
            tile.height,
        )
    }
}

/// A pixel rectangle inside a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if this rectangle fully contains another
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.x + self.width >= other.x + other.width
            && self.y + self.height >= other.y + other.height
    }
}
