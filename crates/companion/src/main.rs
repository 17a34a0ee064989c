//! skytrail demo binary
//!
//! Flies a simulated mission end to end: takeoff, search, confirmation,
//! tracking of a scripted target that drifts across the frame, loss,
//! and return. In interactive mode the operator drives the mission from
//! stdin with the q/p/s/n keys.

use std::path::PathBuf;

use clap::Parser;
use skytrail_core::{Detection, Observation, OperatorCommand, Tracker};
use skytrail_companion::{
    CompanionError, KeyboardOperator, MissionFile, MissionRunner, MonotonicClock, OperatorInput,
    QueuedOperator, ScriptedVision, SimVehicle, SimVehicleConfig,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "skytrail", about = "Simulated aerial person-tracking mission")]
struct Cli {
    /// Mission configuration file (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read operator keys from stdin (q quit, p pause, s return, n new search)
    #[arg(long)]
    interactive: bool,

    /// How many ticks the scripted target stays visible
    #[arg(long, default_value_t = 400)]
    track_ticks: u32,

    /// RNG seed for the simulated vehicle
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Scripted perception: empty frames through the climb-out, then a
/// target drifting right across the frame, then loss.
fn demo_script(mission: &MissionFile, track_ticks: u32) -> Vec<Observation> {
    let climb_ticks = 120;
    let mut script = vec![Observation::Clear; climb_ticks];

    let height = mission.target_height_px;
    let top = mission.frame_height / 2.0 - height / 2.0;
    for tick in 0..track_ticks {
        // Drift from frame center toward the right edge and back.
        let sweep = 120.0;
        let progress = tick as f32 / track_ticks.max(1) as f32;
        let offset = sweep * (progress * 2.0 - 1.0).abs() - sweep / 2.0;
        let center = mission.frame_width / 2.0 + offset;

        let det = Detection::try_new(center - 50.0, top, center + 50.0, top + height)
            .expect("demo boxes are valid by construction");
        script.push(Observation::Target(det));
    }
    script
}

/// Scripted operator: wait out takeoff, confirmation, tracking, and the
/// grace window, then force the return home.
fn demo_operator(track_ticks: u32, grace_ticks: u32) -> QueuedOperator {
    let wait = 120 + track_ticks + grace_ticks + 20;
    let mut operator = QueuedOperator::new(std::iter::repeat(OperatorCommand::None).take(wait as usize));
    operator.push(OperatorCommand::ForceReturn);
    operator
}

fn run(cli: Cli) -> Result<(), CompanionError> {
    let mission = match &cli.config {
        Some(path) => MissionFile::load(path)?,
        None => MissionFile::default(),
    };
    info!(config = ?cli.config, "mission configuration loaded");

    let tracker = Tracker::new(mission.tracker(), mission.geometry(), mission.gains());
    let mut vehicle = SimVehicle::new(SimVehicleConfig {
        takeoff_altitude_m: mission.takeoff_altitude_m,
        neutral: mission.neutral,
        tick_dt_s: mission.tick_interval().as_secs_f32(),
        seed: Some(cli.seed),
        ..SimVehicleConfig::default()
    });
    let mut vision = ScriptedVision::new(demo_script(&mission, cli.track_ticks));

    let grace_ticks = (mission.grace_period_s * mission.tick_hz) as u32;
    let mut scripted_operator;
    let mut keyboard_operator;
    let operator: &mut dyn OperatorInput = if cli.interactive {
        keyboard_operator = KeyboardOperator::spawn();
        &mut keyboard_operator
    } else {
        scripted_operator = demo_operator(cli.track_ticks, grace_ticks);
        &mut scripted_operator
    };

    let mut runner = MissionRunner::new(tracker, MonotonicClock::new(), mission.tick_interval());
    let report = runner.run(&mut vision, &mut vehicle, operator)?;
    info!(
        ticks = report.ticks,
        final_phase = report.final_phase,
        "flight finished"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!(%err, "mission aborted");
        std::process::exit(1);
    }
}
