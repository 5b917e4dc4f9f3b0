use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartwatch::{
    check_all, discover, BaselineStore, CheckReport, Evaluator, FileSource, Settings,
    TelemetrySource,
};
use smartwatch_sdk::RateState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smartwatch", version)]
#[command(about = "SMART disk health checks against discovery-time baselines")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an agent dump and print the device attribute map as JSON
    Parse {
        /// Agent output containing a `smart` section
        file: PathBuf,
    },

    /// Capture baselines for every device and persist them
    Discover {
        /// Agent output containing a `smart` section
        file: PathBuf,

        /// Baseline store path (overrides `state.baselines`)
        #[arg(long)]
        baselines: Option<PathBuf>,
    },

    /// Evaluate stored items against current telemetry
    Check {
        /// Agent output containing a `smart` section
        file: PathBuf,

        /// Baseline store path (overrides `state.baselines`)
        #[arg(long)]
        baselines: Option<PathBuf>,

        /// Rate state path (overrides `state.rate_state`)
        #[arg(long)]
        rate_state: Option<PathBuf>,

        /// Only check this item
        #[arg(short, long)]
        item: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&settings.log.filter);

    match args.command {
        Command::Parse { file } => {
            let section = FileSource::new(&file).read_section()?;
            println!("{}", serde_json::to_string_pretty(&section)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Discover { file, baselines } => {
            let path = baselines.unwrap_or(settings.state.baselines);
            run_discover(&file, &path)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            file,
            baselines,
            rate_state,
            item,
            json,
        } => {
            let baselines = baselines.unwrap_or(settings.state.baselines);
            let rate_state = rate_state.unwrap_or(settings.state.rate_state);
            let report = run_check(
                &file,
                &baselines,
                &rate_state,
                &settings.check.name,
                item.as_deref(),
            )?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.to_text());
            }
            Ok(ExitCode::from(report.exit_code()))
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` wins over the configured filter.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_discover(file: &Path, path: &Path) -> Result<()> {
    let mut source = FileSource::new(file);
    let section = source
        .read_section()
        .with_context(|| format!("failed to read telemetry from {}", source.description()))?;

    let discovered = discover(&section);
    for item in &discovered {
        println!("{} ({} attributes)", item.item, item.parameters.len());
    }

    let mut store = BaselineStore::load(path)?;
    store.replace(discovered);
    store
        .save(path)
        .with_context(|| format!("failed to save baselines to {}", path.display()))?;

    info!(items = store.len(), path = %path.display(), "baselines saved");
    Ok(())
}

fn run_check(
    file: &Path,
    baselines: &Path,
    rate_state: &Path,
    check_name: &str,
    only: Option<&str>,
) -> Result<CheckReport> {
    let mut source = FileSource::new(file);
    let section = source
        .read_section()
        .with_context(|| format!("failed to read telemetry from {}", source.description()))?;

    let store = BaselineStore::load(baselines)?;
    // Held until commit so overlapping runs sharing the file serialize
    let rates = RateState::open(rate_state)
        .with_context(|| format!("failed to open rate state {}", rate_state.display()))?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?
        .as_secs_f64();

    let evaluator = Evaluator::new(&*rates, now).with_check(check_name);
    let report: CheckReport = check_all(&evaluator, store.iter(), &section, only)
        .into_iter()
        .collect();

    rates
        .commit()
        .with_context(|| format!("failed to save rate state to {}", rate_state.display()))?;

    Ok(report)
}
