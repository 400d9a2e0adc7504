use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tilekit_core::TilesetDescriptor;
use tilekit_tsx::{
    load_tileset, to_tsx_string, ImagePolicy, InvalidEntryPolicy, LoadOptions, LoadReport,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilekit", version, about, long_about = None)]
struct Args {
    /// TOML file with load options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Drop invalid tiles and wang tiles instead of failing
    #[arg(long, global = true)]
    drop_invalid: bool,

    /// Fail when the sprite sheet is missing
    #[arg(long, global = true)]
    require_image: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load each file and report problems
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print grid size, collision tiles and wang sets
    Info { file: PathBuf },
    /// Load and re-save a tileset in canonical layout
    Fmt {
        file: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the tileset as pretty JSON
    Export {
        file: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = resolve_options(&args)?;
    debug!(?options, "Resolved load options");

    match &args.command {
        Command::Check { files } => {
            let failed = check(files, &options);
            if failed > 0 {
                eprintln!("{failed} of {} files failed", files.len());
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Info { file } => {
            let report = load(file, &options)?;
            print_diagnostics(file, &report);
            print!("{}", describe(&report.tileset));
            Ok(ExitCode::SUCCESS)
        }
        Command::Fmt { file, output } => {
            let report = load(file, &options)?;
            print_diagnostics(file, &report);
            let text = to_tsx_string(&report.tileset)?;
            write_output(output.as_deref(), &text)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { file, output } => {
            let report = load(file, &options)?;
            print_diagnostics(file, &report);
            let mut json = serde_json::to_string_pretty(&report.tileset)?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Options from `--config`, with the command line flags on top
fn resolve_options(args: &Args) -> anyhow::Result<LoadOptions> {
    let mut options = match &args.config {
        Some(path) => LoadOptions::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => LoadOptions::default(),
    };

    if args.drop_invalid {
        options.invalid_entries = InvalidEntryPolicy::Drop;
    }
    if args.require_image {
        options.image = ImagePolicy::Require;
    }
    Ok(options)
}

fn load(file: &Path, options: &LoadOptions) -> anyhow::Result<LoadReport> {
    load_tileset(file, options).with_context(|| format!("Failed to load {}", file.display()))
}

/// Returns the number of files that failed to load
fn check(files: &[PathBuf], options: &LoadOptions) -> usize {
    let mut failed = 0;
    for file in files {
        match load_tileset(file, options) {
            Ok(report) => {
                print_diagnostics(file, &report);
                println!("{}: ok", file.display());
            }
            Err(e) => {
                println!("{}: {e}", file.display());
                failed += 1;
            }
        }
    }
    failed
}

fn print_diagnostics(file: &Path, report: &LoadReport) {
    for diagnostic in &report.diagnostics {
        eprintln!("warning: {}: {diagnostic}", file.display());
    }
}

fn describe(tileset: &TilesetDescriptor) -> String {
    let mut out = format!(
        "{}\n  tiles: {} ({} x {} grid of {}x{} px)\n  image: {} ({}x{})\n  collision tiles: {}\n",
        tileset.name,
        tileset.tile_count,
        tileset.columns,
        tileset.rows(),
        tileset.tile_width,
        tileset.tile_height,
        tileset.image.source,
        tileset.image.width,
        tileset.image.height,
        tileset.collision_tiles().count(),
    );

    if tileset.wang_sets.is_empty() {
        out.push_str("  wang sets: none\n");
    } else {
        out.push_str("  wang sets:\n");
        for set in &tileset.wang_sets {
            out.push_str(&format!(
                "    {} ({}, {} colours, {} tiles)\n",
                set.name,
                set.set_type.as_str(),
                set.colors.len(),
                set.tiles.len()
            ));
        }
    }
    out
}

fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
