pub mod align;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod retile;
pub mod sheet;

pub use align::{AlignedSheet, align_sheet};
pub use cli::{CliArgs, Command, CommonArgs, CompressionLevel};
pub use error::SheetError;
pub use retile::{RetiledSheet, Retiler};
pub use sheet::{GridShape, TileSize, load_sheet};
