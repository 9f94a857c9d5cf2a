use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use parabola_lab::config::CONFIG_ENV_VAR;
use parabola_lab::core::ballistics::{DisplayMetrics, LaunchDefaults, LaunchParameters};
use parabola_lab::engine::{EnginePhase, FrameUpdate};
use parabola_lab::report::{self, DEFAULT_CHART_SIZE};
use parabola_lab::{
    FlightMetrics, FrameQueue, LabConfig, LabError, LaunchOutcome, Result, SimulationHistory,
    SystemClock, TrajectoryEngine,
};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Projectile-motion lab: flight metrics, animated launches and a launch
/// history.
///
/// Run without arguments to be prompted for angle, velocity and gravity.
#[derive(Parser, Debug)]
#[command(name = "parabola-lab", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// History file, overriding the configured one
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print time of flight, range and maximum height
    Metrics {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Play the launch animation in the terminal and save the result
    Animate {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Delay between frames in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Print every n-th frame
        #[arg(long, default_value_t = 10)]
        every: usize,

        /// Do not add the finished flight to the history file
        #[arg(long)]
        no_save: bool,
    },

    /// Render the trajectory to an SVG chart
    Plot {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Output file
        #[arg(long, short = 'o', default_value = "trajectory.svg")]
        output: PathBuf,

        #[arg(long, default_value_t = DEFAULT_CHART_SIZE.0)]
        width: u32,

        #[arg(long, default_value_t = DEFAULT_CHART_SIZE.1)]
        height: u32,
    },

    /// Inspect or edit saved simulations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Show the most recent simulations, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Delete one simulation by id
    Delete { id: u64 },
    /// Delete every simulation
    Clear,
}

/// Launch fields are taken as text; anything that is not a number falls back
/// to the configured default.
#[derive(Args, Debug)]
struct LaunchArgs {
    /// Launch angle in degrees above horizontal
    #[arg(long, short = 'a', allow_hyphen_values = true)]
    angle: Option<String>,

    /// Launch speed in m/s
    #[arg(long, short = 's', allow_hyphen_values = true)]
    velocity: Option<String>,

    /// Gravitational acceleration in m/s^2
    #[arg(long, short = 'g', allow_hyphen_values = true)]
    gravity: Option<String>,
}

impl LaunchArgs {
    fn resolve(&self, defaults: &LaunchDefaults) -> LaunchParameters {
        LaunchParameters::from_text(
            self.angle.as_deref().unwrap_or_default(),
            self.velocity.as_deref().unwrap_or_default(),
            self.gravity.as_deref().unwrap_or_default(),
            defaults,
        )
    }
}

#[derive(Serialize)]
struct MetricsReport {
    launch: LaunchParameters,
    metrics: DisplayMetrics,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_field(prompt: &str, fallback: f64) -> Result<String> {
    print!("{prompt} [{fallback}]: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Err(LabError::InputClosed);
    }
    Ok(line)
}

fn get_launch_from_user(defaults: &LaunchDefaults) -> Result<LaunchParameters> {
    let angle = read_field("Angle (degrees)", defaults.angle_deg)?;
    let velocity = read_field("Velocity (m/s)", defaults.speed_mps)?;
    let gravity = read_field("Gravity (m/s^2)", defaults.gravity_mps2)?;
    Ok(LaunchParameters::from_text(&angle, &velocity, &gravity, defaults))
}

fn print_metrics(launch: LaunchParameters, json: bool) -> Result<()> {
    let shown = FlightMetrics::compute(launch).display();
    if json {
        let report = MetricsReport {
            launch,
            metrics: shown,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\nAngle: {:.2} deg | Velocity: {:.2} m/s | Gravity: {:.2} m/s^2",
        launch.angle_deg, launch.speed_mps, launch.gravity_mps2
    );
    println!("Time of flight: {:.2} s", shown.time_of_flight_s);
    println!("Horizontal distance: {:.2} m", shown.range_m);
    println!("Maximum height: {:.2} m", shown.max_height_m);
    Ok(())
}

fn print_frame(update: &FrameUpdate) {
    println!(
        "progress {:>5.1}% | t = {:>6.3} s | canvas ({:>7.2}, {:>7.2})",
        update.progress * 100.0,
        update.simulated_time_s,
        update.position.x,
        update.position.y
    );
}

fn animate(
    config: &LabConfig,
    launch: LaunchParameters,
    history_path: &std::path::Path,
    frame_ms: u64,
    every: usize,
    save: bool,
) -> Result<()> {
    let history = SimulationHistory::load(history_path)?;
    let mut engine = TrajectoryEngine::new(config, SystemClock, FrameQueue::new(), history);

    if engine.launch(launch) == LaunchOutcome::Ignored {
        warn!("launch was not accepted");
        return Ok(());
    }
    if let Some(sample) = engine.sample() {
        println!("path: {}", sample.to_path_data());
    }

    let every = every.max(1);
    let mut frame = 0usize;
    while engine.scheduler_mut().take_due().is_some() {
        thread::sleep(Duration::from_millis(frame_ms));
        let Some(update) = engine.on_frame() else {
            break;
        };
        if frame % every == 0 || update.finished {
            print_frame(&update);
        }
        frame += 1;
    }
    debug!(frames = frame, "animation loop finished");

    if let Some(shown) = engine.display_metrics() {
        println!(
            "landed: range {:.2} m, max height {:.2} m, flight {:.2} s",
            shown.range_m, shown.max_height_m, shown.time_of_flight_s
        );
    }

    if save && engine.phase() == EnginePhase::Complete {
        engine.recorder().save(history_path)?;
        println!("saved to {}", history_path.display());
    }
    Ok(())
}

fn history_command(config: &LabConfig, path: &std::path::Path, action: HistoryAction) -> Result<()> {
    let mut history = SimulationHistory::load(path)?;
    match action {
        HistoryAction::List { limit, json } => {
            let recent = history.recent(limit.unwrap_or(config.history.recent_limit));
            if json {
                println!("{}", serde_json::to_string_pretty(&recent)?);
            } else if recent.is_empty() {
                println!("No simulations yet.");
            } else {
                for entry in recent {
                    println!(
                        "#{:<4} {} | v = {:.1} m/s, angle = {:.1} deg | distance {:.2} m, height {:.2} m",
                        entry.id,
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        entry.record.velocity,
                        entry.record.angle,
                        entry.record.distance,
                        entry.record.height
                    );
                }
            }
        }
        HistoryAction::Delete { id } => {
            history.delete(id)?;
            history.save(path)?;
            println!("Deleted simulation #{id}.");
        }
        HistoryAction::Clear => {
            let removed = history.clear();
            history.save(path)?;
            println!("Deleted {removed} simulation(s).");
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = LabConfig::load_or_default(cli.config.as_deref())?;
    let history_path = cli.history.unwrap_or_else(|| config.history.path.clone());
    let defaults = config.defaults;

    match cli.command {
        None => {
            let launch = get_launch_from_user(&defaults)?;
            print_metrics(launch, false)
        }
        Some(Command::Metrics { launch, json }) => print_metrics(launch.resolve(&defaults), json),
        Some(Command::Animate {
            launch,
            frame_ms,
            every,
            no_save,
        }) => animate(
            &config,
            launch.resolve(&defaults),
            &history_path,
            frame_ms,
            every,
            !no_save,
        ),
        Some(Command::Plot {
            launch,
            output,
            width,
            height,
        }) => {
            let metrics = FlightMetrics::compute(launch.resolve(&defaults));
            report::render_svg(
                &output,
                &metrics,
                config.animation.sample_count,
                &config.viewport,
                (width, height),
            )?;
            println!("Wrote {}", output.display());
            Ok(())
        }
        Some(Command::History { action }) => history_command(&config, &history_path, action),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
