use serde::{Deserialize, Serialize};

use crate::cli::CompressionLevel;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

impl CompressConfig {
    pub fn to_level(&self) -> Result<CompressionLevel, String> {
        match self {
            CompressConfig::Level(n) => n.to_string().parse(),
            CompressConfig::Max(s) => s.parse(),
        }
    }
}

impl From<CompressionLevel> for CompressConfig {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Level(n) => CompressConfig::Level(n),
            CompressionLevel::Max => CompressConfig::Max("max".to_string()),
        }
    }
}

/// Tilesheet job configuration file structure.
///
/// Every setting is optional; missing values fall back to the command's
/// defaults. Paths are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input sprite sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Output image path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Tile width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_width: Option<u32>,
    /// Tile height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_height: Option<u32>,
    /// Columns in the input grid (retile only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_cols: Option<u32>,
    /// Rows in the input grid (retile only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_rows: Option<u32>,
    /// Columns in the output grid (retile only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cols: Option<u32>,
    /// Rows in the output grid (retile only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_rows: Option<u32>,
    /// PNG compression configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress: Option<CompressConfig>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: None,
            output: None,
            tile_width: None,
            tile_height: None,
            old_cols: None,
            old_rows: None,
            new_cols: None,
            new_rows: None,
            compress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SheetConfig =
            serde_json::from_str(r#"{ "input": "party.png", "new_cols": 16 }"#).unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.input.as_deref(), Some("party.png"));
        assert_eq!(config.new_cols, Some(16));
        assert_eq!(config.new_rows, None);
        assert_eq!(config.compress, None);
    }

    #[test]
    fn test_compress_forms() {
        let level: SheetConfig = serde_json::from_str(r#"{ "compress": 4 }"#).unwrap();
        assert_eq!(
            level.compress.unwrap().to_level(),
            Ok(CompressionLevel::Level(4))
        );

        let max: SheetConfig = serde_json::from_str(r#"{ "compress": "max" }"#).unwrap();
        assert_eq!(max.compress.unwrap().to_level(), Ok(CompressionLevel::Max));

        let bad: SheetConfig = serde_json::from_str(r#"{ "compress": 9 }"#).unwrap();
        assert!(bad.compress.unwrap().to_level().is_err());
    }
}
