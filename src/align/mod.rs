mod aligner;

pub use aligner::{
    AlignedSheet, TileAlignment, TileShift, align_sheet, align_tile,
    bottom_most_visible_row,
};
