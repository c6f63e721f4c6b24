//! Dopamine Bout Analyzer CLI
//!
//! Aligns a locomotion recording with a dopamine recording and exports
//! bout-anchored tables.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dopamine_bout_analyzer::{
    config::{BinWindow, Config, ExportFormat},
    export::{ManifestBuilder, NamedTable},
    input::{read_concentration, read_locomotion, RunningMeasure},
    pipeline::run_analysis,
    VERSION,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// File holding every table when exporting JSON.
const JSON_TABLES_FILE: &str = "tables.json";

#[derive(Parser)]
#[command(name = "dopamine-bouts")]
#[command(version = VERSION)]
#[command(about = "Align running-wheel locomotion with dopamine recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one locomotion/dopamine recording pair
    Analyze {
        /// Locomotion table (CSV export of the wheel software)
        #[arg(long)]
        locomotion: PathBuf,

        /// Dopamine concentration table (CSV)
        #[arg(long)]
        dopamine: PathBuf,

        /// Output directory (defaults to the configured export path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Export format (csv or json)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Minimum consecutive running seconds for a running bout
        #[arg(long, allow_negative_numbers = true)]
        min_running_bout: Option<i64>,

        /// Half-width of the all-zero neighborhood for sedentary seconds
        #[arg(long, allow_negative_numbers = true)]
        sedentary_window: Option<i64>,

        /// Seconds before bout start in the Before window
        #[arg(long, allow_negative_numbers = true)]
        pre_running: Option<i64>,

        /// Seconds after bout end in the After window
        #[arg(long, allow_negative_numbers = true)]
        post_running: Option<i64>,

        /// Seconds before bout end in the Offset window
        #[arg(long, allow_negative_numbers = true)]
        pre_offset: Option<i64>,

        /// Locomotion column used to classify running
        /// (average-speed, interval-count or distance)
        #[arg(long)]
        measure: Option<RunningMeasure>,

        /// Use the narrow [s, s + 0.9] bin window
        #[arg(long)]
        narrow_bins: bool,

        /// Configuration file (defaults to the user config)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show configuration
    Config,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            locomotion,
            dopamine,
            output,
            format,
            min_running_bout,
            sedentary_window,
            pre_running,
            post_running,
            pre_offset,
            measure,
            narrow_bins,
            config,
        } => {
            let mut config = match config {
                Some(path) => Config::load_from(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => Config::load().context("failed to load config")?,
            };

            let analysis = &mut config.analysis;
            if let Some(value) = min_running_bout {
                analysis.min_running_bout_length = value;
            }
            if let Some(value) = sedentary_window {
                analysis.sedentary_window_length = value;
            }
            if let Some(value) = pre_running {
                analysis.pre_running_seconds = value;
            }
            if let Some(value) = post_running {
                analysis.post_running_seconds = value;
            }
            if let Some(value) = pre_offset {
                analysis.pre_offset_seconds = value;
            }
            if let Some(value) = measure {
                analysis.running_measure = value;
            }
            if narrow_bins {
                analysis.bin_window = BinWindow::Narrow;
            }
            if let Some(format) = format {
                config.export_format = format;
            }
            if let Some(output) = output {
                config.export_path = output;
            }

            cmd_analyze(&config, &locomotion, &dopamine)
        }
        Commands::Config => cmd_config(),
        Commands::Init { force } => cmd_init(force),
    }
}

fn cmd_analyze(config: &Config, locomotion_path: &Path, dopamine_path: &Path) -> Result<()> {
    println!("Dopamine Bout Analyzer v{VERSION}");
    println!();

    let locomotion = read_locomotion(locomotion_path)
        .with_context(|| format!("failed to read {}", locomotion_path.display()))?;
    let dopamine = read_concentration(dopamine_path)
        .with_context(|| format!("failed to read {}", dopamine_path.display()))?;

    let analysis = run_analysis(&locomotion, &dopamine, &config.analysis)
        .context("analysis failed")?;
    let bundle = analysis.bundle();

    let out_dir = &config.export_path;
    let builder = ManifestBuilder::new().with_inputs(locomotion_path, dopamine_path);
    let manifest = match config.export_format {
        ExportFormat::Csv => {
            let written = bundle
                .write_csv_dir(out_dir)
                .with_context(|| format!("failed to write tables to {}", out_dir.display()))?;
            println!("Wrote {} tables to {}", written.len(), out_dir.display());
            builder.build(&config.analysis, &analysis.summary, &bundle, |name| {
                NamedTable::new(name, Vec::new()).file_name()
            })
        }
        ExportFormat::Json => {
            let path = out_dir.join(JSON_TABLES_FILE);
            bundle
                .write_json(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote tables to {}", path.display());
            builder.build(&config.analysis, &analysis.summary, &bundle, |_| {
                JSON_TABLES_FILE.to_string()
            })
        }
    };

    let manifest_path = manifest
        .write_to_dir(out_dir)
        .with_context(|| format!("failed to write manifest to {}", out_dir.display()))?;
    tracing::info!(
        instance_id = %builder.instance_id(),
        path = %manifest_path.display(),
        "Manifest written"
    );

    println!();
    println!("{}", analysis.summary);
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load().context("failed to load config")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("failed to serialize config")?
    );
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = Config::config_path();
    if path.exists() && !force {
        println!("Config file already exists: {path:?}");
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let config = Config::default();
    config.save().context("failed to save config")?;
    config
        .ensure_directories()
        .context("failed to create export directory")?;
    println!("Wrote default configuration to {path:?}");
    Ok(())
}
