mod format;
mod report;

pub use format::save_sheet_image;
pub use report::{AlignReport, RetileReport, write_report};
