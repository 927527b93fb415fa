use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use roompair::{Config, PreferenceDataset, report, survey};

/// Assign people to single and double rooms, maximizing total happiness.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Survey CSV export, or a `.yaml` preference dataset
    input: PathBuf,

    /// YAML configuration (excluded rooms, blank policy, time limit, forced rooms)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the room report as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let is_yaml = args
        .input
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let dataset = if is_yaml {
        PreferenceDataset::load_yaml(&args.input, &config)?
    } else {
        survey::load_path(&args.input, &config)?
    };

    let assignment = dataset
        .solve(&config.solve_options()?)?
        .with_forced(&config.forced)?;

    if let Some(path) = &args.csv {
        report::write_csv_path(&assignment, path)?;
        tracing::info!("Wrote {}", path.display());
    }

    println!("{}", report::to_yaml(&assignment)?);
    Ok(())
}
