use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tilesheet")]
#[command(version, about = "Sprite sheet baseline aligner and grid re-tiler", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Shift every tile down so its lowest visible pixel sits on the tile's last row
    Align(AlignArgs),
    /// Re-lay tiles from one grid shape into another, keeping row-major order
    Retile(RetileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AlignArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Tile width in pixels [default: 64]
    #[arg(long)]
    pub tile_width: Option<u32>,

    /// Tile height in pixels [default: 64]
    #[arg(long)]
    pub tile_height: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct RetileArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Tile width in pixels [default: 32]
    #[arg(long)]
    pub tile_width: Option<u32>,

    /// Tile height in pixels [default: 32]
    #[arg(long)]
    pub tile_height: Option<u32>,

    /// Columns in the input grid [default: 25]
    #[arg(long, conflicts_with = "infer_old")]
    pub old_cols: Option<u32>,

    /// Rows in the input grid [default: 7]
    #[arg(long, conflicts_with = "infer_old")]
    pub old_rows: Option<u32>,

    /// Derive the input grid from the sheet size and tile size
    #[arg(long)]
    pub infer_old: bool,

    /// Columns in the output grid [default: 16]
    #[arg(long)]
    pub new_cols: Option<u32>,

    /// Rows in the output grid [default: 10, or enough rows for every tile when only --new-cols is set]
    #[arg(long)]
    pub new_rows: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input sprite sheet
    #[arg(required_unless_present = "config")]
    pub input: Option<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output image path [default: input name prefixed with aligned_ or re_]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON report of the per-tile changes
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Write the effective settings to a config file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("0".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(0)));
        assert_eq!("6".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(6)));
        assert_eq!("MAX".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_parse_align() {
        let cli = CliArgs::try_parse_from(["tilesheet", "align", "front.png", "--tile-height", "48"])
            .unwrap();
        let Command::Align(args) = cli.command else {
            panic!("expected align");
        };
        assert_eq!(args.common.input, Some(PathBuf::from("front.png")));
        assert_eq!(args.tile_width, None);
        assert_eq!(args.tile_height, Some(48));
    }

    #[test]
    fn test_parse_retile_bare_compress() {
        let cli = CliArgs::try_parse_from([
            "tilesheet",
            "retile",
            "party.png",
            "--new-cols",
            "16",
            "--compress",
        ])
        .unwrap();
        let Command::Retile(args) = cli.command else {
            panic!("expected retile");
        };
        assert_eq!(args.new_cols, Some(16));
        assert_eq!(args.new_rows, None);
        assert_eq!(args.common.compress, Some(CompressionLevel::Level(2)));
    }

    #[test]
    fn test_input_required_without_config() {
        assert!(CliArgs::try_parse_from(["tilesheet", "align"]).is_err());
        assert!(CliArgs::try_parse_from(["tilesheet", "align", "-c", "job.json"]).is_ok());
    }

    #[test]
    fn test_infer_old_conflicts_with_explicit_shape() {
        let result = CliArgs::try_parse_from([
            "tilesheet",
            "retile",
            "party.png",
            "--infer-old",
            "--old-cols",
            "25",
        ]);
        assert!(result.is_err());
    }
}
