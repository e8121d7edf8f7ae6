use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rcloop::animation::{AnimationLoop, StopCondition};
use rcloop::cli::{ScenarioArgs, order_or_default, scenario_rng};
use rcloop::config::ScenarioConfig;
use rcloop::render::DiagnosticRenderer;
use rcloop::viewport::{BoundingBox, Viewport};
use rcloop::writer::SceneWriter;

/// Canvas edge length of the rendered page, in pixels
const CANVAS_SIZE: f64 = 700.0;

/// Blank border around the wire outlines, in pixels
const CANVAS_PADDING: f64 = 48.0;

/// Animated series RC circuit loop.
#[derive(Parser)]
#[command(name = "rcloop")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the animation headless, printing circuit state once per second
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Frames to run; 0 runs until interrupted
        #[arg(long, default_value = "600")]
        ticks: u64,
    },
    /// Record frames into a self-contained HTML page
    Render {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output directory for index.html and frames.json
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Frames to record
        #[arg(long, default_value = "180")]
        frames: u64,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "rcloop=debug" } else { "rcloop=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build(config: &ScenarioConfig) -> AnimationLoop {
    let circuit = config.circuit();
    let order = order_or_default(config, &circuit);
    let mut rng = scenario_rng(config);
    AnimationLoop::from_config(config, &order, &mut rng)
}

fn run(scenario: &ScenarioArgs, ticks: u64) -> anyhow::Result<()> {
    let config = scenario.scenario().context("invalid scenario")?;
    let mut anim = build(&config);

    let stop = match ticks {
        0 => StopCondition::default(),
        n => StopCondition::after_ticks(n),
    };
    let stdout = io::stdout();
    let mut renderer =
        DiagnosticRenderer::new(stdout.lock(), anim.settings().frames_per_second());

    let summary = anim.run(&mut renderer, &stop)?;
    println!(
        "Stopped after {} ticks: t = {:.4} s, I = {:.6} A",
        summary.ticks, summary.t_phys, summary.final_current
    );
    Ok(())
}

fn render(scenario: &ScenarioArgs, output: &Path, frames: u64) -> anyhow::Result<()> {
    let config = scenario.scenario().context("invalid scenario")?;
    let mut anim = build(&config);
    let mut viewport = Viewport::new(CANVAS_SIZE, CANVAS_SIZE);
    viewport.fit_to_bounds(&BoundingBox::of_paths(anim.outlines()), CANVAS_PADDING);

    let written = SceneWriter::new(viewport)
        .write(&mut anim, frames, output)
        .with_context(|| format!("failed to write scene to {}", output.display()))?;

    println!(
        "Wrote {} frames to {}",
        written.summary.ticks,
        written.index.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { scenario, ticks } => run(&scenario, ticks),
        Commands::Render {
            scenario,
            output,
            frames,
        } => render(&scenario, &output, frames),
    }
}
