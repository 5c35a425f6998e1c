use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tilesheet::align::align_sheet;
use tilesheet::cli::{AlignArgs, CliArgs, Command, CommonArgs, CompressionLevel, RetileArgs};
use tilesheet::config::{LoadedConfig, SheetConfig, make_relative, save_config};
use tilesheet::output::{AlignReport, RetileReport, save_sheet_image, write_report};
use tilesheet::retile::Retiler;
use tilesheet::sheet::{GridShape, TileSize, load_sheet};

const ALIGN_TILE_SIZE: u32 = 64;
const RETILE_TILE_SIZE: u32 = 32;
const RETILE_OLD_SHAPE: (u32, u32) = (25, 7);
const RETILE_NEW_SHAPE: (u32, u32) = (16, 10);

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let common = match &cli.command {
        Command::Align(args) => &args.common,
        Command::Retile(args) => &args.common,
    };

    let loaded_config = if let Some(config_path) = &common.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    env_logger::Builder::new()
        .filter_level(if common.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Tilesheet v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Align(args) => run_align(args, loaded_config.as_ref()),
        Command::Retile(args) => run_retile(args, loaded_config.as_ref()),
    }
}

fn run_align(args: &AlignArgs, loaded: Option<&LoadedConfig>) -> Result<()> {
    let config = loaded.map(|lc| &lc.config);
    let io = merge_io(&args.common, loaded, "aligned_")?;

    let tile = TileSize::new(
        pick(args.tile_width, config.and_then(|c| c.tile_width), ALIGN_TILE_SIZE),
        pick(args.tile_height, config.and_then(|c| c.tile_height), ALIGN_TILE_SIZE),
    )?;

    let sheet = load_sheet(&io.input, true)?;
    info!(
        "Loaded {} ({}x{})",
        io.input.display(),
        sheet.width(),
        sheet.height()
    );

    let aligned = align_sheet(&sheet, tile)?;

    prepare_output_dir(&io.output)?;
    save_sheet_image(&aligned.image, &io.output, io.compress)?;
    info!("Saved {}", io.output.display());

    if let Some(report_path) = &args.common.report {
        write_report(&AlignReport::new(&aligned, tile, &io.output), report_path)?;
        info!("Generated report {}", report_path.display());
    }

    if let Some(config_path) = &args.common.save_config {
        let config = SheetConfig {
            tile_width: Some(tile.width),
            tile_height: Some(tile.height),
            ..io.to_config(config_path)
        };
        save_config(&config, config_path)?;
        info!("Saved settings to {}", config_path.display());
    }

    info!("Done!");

    Ok(())
}

fn run_retile(args: &RetileArgs, loaded: Option<&LoadedConfig>) -> Result<()> {
    let config = loaded.map(|lc| &lc.config);
    let io = merge_io(&args.common, loaded, "re_")?;

    let tile = TileSize::new(
        pick(args.tile_width, config.and_then(|c| c.tile_width), RETILE_TILE_SIZE),
        pick(args.tile_height, config.and_then(|c| c.tile_height), RETILE_TILE_SIZE),
    )?;

    let sheet = load_sheet(&io.input, false)?;
    info!(
        "Loaded {} ({}x{})",
        io.input.display(),
        sheet.width(),
        sheet.height()
    );

    let old = if args.infer_old {
        GridShape::fit(sheet.width(), sheet.height(), tile)?
    } else {
        GridShape::new(
            pick(args.old_cols, config.and_then(|c| c.old_cols), RETILE_OLD_SHAPE.0),
            pick(args.old_rows, config.and_then(|c| c.old_rows), RETILE_OLD_SHAPE.1),
        )?
    };

    let new = merge_new_shape(args, config, old)?;

    let retiler = Retiler::new(tile, old, new);
    let retiled = retiler.retile(&sheet)?;

    prepare_output_dir(&io.output)?;
    save_sheet_image(&retiled.image, &io.output, io.compress)?;
    info!(
        "Saved {} ({}x{})",
        io.output.display(),
        retiled.image.width(),
        retiled.image.height()
    );

    if let Some(report_path) = &args.common.report {
        write_report(&RetileReport::new(&retiled, &retiler, &io.output), report_path)?;
        info!("Generated report {}", report_path.display());
    }

    if let Some(config_path) = &args.common.save_config {
        let config = SheetConfig {
            tile_width: Some(tile.width),
            tile_height: Some(tile.height),
            old_cols: Some(old.columns),
            old_rows: Some(old.rows),
            new_cols: Some(new.columns),
            new_rows: Some(new.rows),
            ..io.to_config(config_path)
        };
        save_config(&config, config_path)?;
        info!("Saved settings to {}", config_path.display());
    }

    info!("Done!");

    Ok(())
}

/// Input/output settings shared by both commands.
struct MergedIo {
    input: PathBuf,
    output: PathBuf,
    compress: Option<CompressionLevel>,
}

impl MergedIo {
    /// Config holding these paths relative to the directory of `config_path`.
    fn to_config(&self, config_path: &Path) -> SheetConfig {
        let base = config_path.parent().unwrap_or(Path::new(""));
        SheetConfig {
            input: Some(make_relative(&self.input, base)),
            output: Some(make_relative(&self.output, base)),
            compress: self.compress.map(Into::into),
            ..SheetConfig::default()
        }
    }
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_io(args: &CommonArgs, loaded: Option<&LoadedConfig>, prefix: &str) -> Result<MergedIo> {
    let input = args
        .input
        .clone()
        .or_else(|| loaded.and_then(LoadedConfig::resolve_input))
        .context("no input sheet given on the command line or in the config file")?;

    let output = args
        .output
        .clone()
        .or_else(|| loaded.and_then(LoadedConfig::resolve_output))
        .unwrap_or_else(|| default_output_path(&input, prefix));

    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(c) = loaded.and_then(|lc| lc.config.compress.as_ref()) {
        Some(
            c.to_level()
                .map_err(|e| anyhow::anyhow!("invalid compress value in config file: {}", e))?,
        )
    } else {
        None
    };

    Ok(MergedIo {
        input,
        output,
        compress,
    })
}

/// New grid shape: CLI > config > default.
///
/// When only the column count is chosen, rows are sized to hold every tile
/// of the old grid.
fn merge_new_shape(
    args: &RetileArgs,
    config: Option<&SheetConfig>,
    old: GridShape,
) -> Result<GridShape> {
    let cols = args.new_cols.or_else(|| config.and_then(|c| c.new_cols));
    let rows = args.new_rows.or_else(|| config.and_then(|c| c.new_rows));

    let shape = match (cols, rows) {
        (Some(cols), None) => GridShape::new(cols, Retiler::rows_for(old, cols)?)?,
        (cols, rows) => GridShape::new(
            cols.unwrap_or(RETILE_NEW_SHAPE.0),
            rows.unwrap_or(RETILE_NEW_SHAPE.1),
        )?,
    };

    Ok(shape)
}

fn pick(cli: Option<u32>, config: Option<u32>, default: u32) -> u32 {
    cli.or(config).unwrap_or(default)
}

/// `<dir>/<prefix><stem>.png` next to the input sheet.
fn default_output_path(input: &Path, prefix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());
    input.with_file_name(format!("{}{}.png", prefix, stem))
}

fn prepare_output_dir(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}
