use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use scrubsheet_core::{PanelConfig, Size};

use crate::error::Result;
use crate::logging::{self, LogSettings};
use crate::script::{Scenario, Script};
use crate::simulate::{OutputFormat, SimulationOptions, simulate, write_frames, write_style};

/// Viewport width used by every run; only the height is configurable.
const VIEWPORT_WIDTH: f64 = 375.0;

#[derive(Debug, Parser)]
#[command(
    name = "scrubsheet-demo",
    about = "Replay pointer gestures through an interactive bottom-sheet panel",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print built-in scenario names.
    #[command(name = "list-scenarios")]
    ListScenarios,

    /// Replay a scenario or script and print one line per frame.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Built-in scenario (default: fling-open).
    #[arg(long, conflicts_with = "script")]
    pub scenario: Option<String>,

    /// JSON pointer script.
    #[arg(long)]
    pub script: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Milliseconds simulated after the last sample.
    #[arg(long = "settle-ms", default_value_t = 1500)]
    pub settle_ms: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long = "viewport-height", default_value_t = 812.0)]
    pub viewport_height: f64,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogSettings::from_env());
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Commands::ListScenarios => list_scenarios(out),
        Commands::Run(args) => run_script(&args, PanelConfig::from_env(), out),
    }
}

fn list_scenarios<W: Write>(out: &mut W) -> Result<()> {
    for scenario in Scenario::ALL {
        writeln!(out, "{:<18} {}", scenario.name(), scenario.description())?;
    }
    Ok(())
}

pub fn run_script<W: Write>(args: &RunArgs, config: PanelConfig, out: &mut W) -> Result<()> {
    config.validate()?;
    let options = SimulationOptions {
        fps: args.fps,
        settle: Duration::from_millis(args.settle_ms),
        viewport: Size::new(VIEWPORT_WIDTH, args.viewport_height),
    };
    options.validate()?;

    let script = match (&args.script, &args.scenario) {
        (Some(path), _) => Script::load(path)?,
        (None, name) => {
            let scenario = Scenario::from_name(name.as_deref().unwrap_or("fling-open"))?;
            scenario.script(&config, options.viewport)
        }
    };

    let simulation = simulate(&script, config, &options)?;
    write_style(out, &simulation.style, args.format)?;
    write_frames(out, &simulation.frames, args.format)?;
    out.flush()?;
    Ok(())
}
