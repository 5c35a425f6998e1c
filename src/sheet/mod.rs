mod grid;
mod loader;

pub use grid::{GridShape, Rect, TileSize};
pub use loader::load_sheet;
