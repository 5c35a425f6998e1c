use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image '{path}' has no alpha channel (pixel format {color:?})")]
    UnsupportedPixelFormat {
        path: PathBuf,
        color: image::ColorType,
    },

    #[error("Invalid grid geometry: {0}")]
    InvalidGridGeometry(String),

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },
}
