use clap::{Parser, Subcommand};
use sf_scenario::{ScenarioResult, run_scenario};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "StepFlow CLI - robot state and transfer-function stepping", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario and export its time series
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Override the number of steps
        #[arg(long)]
        steps: Option<u64>,
        /// Write JSON instead of CSV
        #[arg(long)]
        json: bool,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ScenarioResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            steps,
            json,
            output,
        } => cmd_run(&scenario_path, steps, json, output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> ScenarioResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = sf_scenario::load(scenario_path)?;
    println!(
        "✓ Scenario '{}' is valid ({} steps, {} integrators{})",
        scenario.name,
        scenario.steps,
        scenario.integrators.len(),
        if scenario.device.is_some() { ", device" } else { "" }
    );
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    steps: Option<u64>,
    json: bool,
    output: Option<&Path>,
) -> ScenarioResult<()> {
    let mut scenario = sf_scenario::load(scenario_path)?;
    if let Some(steps) = steps {
        scenario.steps = steps;
    }
    tracing::info!(path = %scenario_path.display(), "running scenario");

    let record = run_scenario(&scenario)?;
    let content = if json {
        serde_json::to_string_pretty(&record)?
    } else {
        record.to_csv()
    };

    if let Some(path) = output {
        std::fs::write(path, content)?;
        eprintln!(
            "✓ Exported {} frames to {}",
            record.frames.len(),
            path.display()
        );
    } else {
        print!("{}", content);
    }

    Ok(())
}
