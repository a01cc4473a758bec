use std::path::PathBuf;

use anyhow::Context;
use blockrange_common::Tuning;
use blockrange_input::{FrameInput, InputScript, parse_script};
use blockrange_kernel::{FrameSimulator, SimEvent, SimState};
use blockrange_render::{DebugTextRenderer, RenderView, Renderer};
use blockrange_tools::StateInspector;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockrange-cli", about = "Headless driver for the blockrange simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default tuning summary
    Info,
    /// Print the default tuning as JSON, a starting point for --config
    Tuning,
    /// Run the simulation for a number of ticks
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Input script, e.g. "w*30, w+space, fire, idle*10"
        #[arg(short, long, default_value = "")]
        script: String,
        /// Tuning file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the final state and events as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct TickEvent {
    tick: u64,
    event: SimEvent,
}

#[derive(Debug, Serialize)]
struct RunReport {
    state: SimState,
    view: ViewReport,
    events: Vec<TickEvent>,
}

#[derive(Debug, Serialize)]
struct ViewReport {
    eye: [f32; 3],
    target: [f32; 3],
    fov_degrees: f32,
}

impl From<&RenderView> for ViewReport {
    fn from(view: &RenderView) -> Self {
        Self {
            eye: view.eye.to_array(),
            target: view.target.to_array(),
            fov_degrees: view.fov_degrees,
        }
    }
}

/// Drive `ticks` ticks, taking one scripted frame per tick and idling once the
/// script runs out.
fn run(
    sim: &FrameSimulator,
    script: &InputScript,
    ticks: u64,
) -> (SimState, RenderView, Vec<TickEvent>) {
    let mut state = sim.initial_state();
    let mut view = RenderView::from_rig(&sim.camera_rig(&state));
    let mut events = Vec::new();
    let idle = FrameInput::idle();
    let mut scripted = script.frames();

    for _ in 0..ticks {
        let input = scripted.next().unwrap_or(&idle);
        let out = sim.tick(&mut state, input);
        for event in out.events {
            tracing::debug!(tick = state.tick, ?event, "sim event");
            events.push(TickEvent {
                tick: state.tick,
                event,
            });
        }
        view = RenderView::from_rig(&out.rig);
    }

    (state, view, events)
}

fn load_tuning(config: Option<&PathBuf>) -> anyhow::Result<Tuning> {
    match config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display())),
        None => Ok(Tuning::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let sim = FrameSimulator::default();
            let tuning = sim.tuning();
            println!("blockrange-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "player: spawn={:?} speed={} jump={} gravity={}",
                tuning.spawn_point.to_array(),
                tuning.move_speed,
                tuning.jump_impulse,
                tuning.gravity
            );
            println!(
                "gun: bullet_speed={} range={} pickup_radius={}",
                tuning.bullet_speed, tuning.bullet_range, tuning.pickup_radius
            );
            println!("state: {}", StateInspector::summary(&sim.initial_state()));
        }
        Commands::Tuning => {
            println!("{}", Tuning::default().to_json_pretty()?);
        }
        Commands::Run {
            ticks,
            script,
            config,
            json,
        } => {
            let tuning = load_tuning(config.as_ref())?;
            let script = parse_script(&script).context("parsing input script")?;
            if script.len() as u64 > ticks {
                tracing::warn!(
                    scripted = script.len(),
                    ticks,
                    "script is longer than the run, trailing frames ignored"
                );
            }

            let sim = FrameSimulator::new(tuning)?;
            tracing::info!(ticks, scripted = script.len(), "running simulation");
            let (state, view, events) = run(&sim, &script, ticks);

            if json {
                let report = RunReport {
                    view: ViewReport::from(&view),
                    state,
                    events,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for e in &events {
                    println!("[tick {:>5}] {:?}", e.tick, e.event);
                }
                print!("{}", DebugTextRenderer::new().render(&state, &view));
                println!("Summary: {}", StateInspector::summary(&state));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_idles_after_script_ends() {
        let sim = FrameSimulator::default();
        let script = parse_script("fire").unwrap();
        let (state, _, events) = run(&sim, &script, 5);
        assert_eq!(state.tick, 5);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].age, 5);
        assert!(matches!(events[0], TickEvent { tick: 1, event: SimEvent::Fired { id: 0, .. } }));
    }

    #[test]
    fn run_reports_projectile_expiry() {
        let sim = FrameSimulator::default();
        let script = parse_script("fire").unwrap();
        let (state, _, events) = run(&sim, &script, 300);
        assert!(state.projectiles.is_empty());
        assert!(
            events
                .iter()
                .any(|e| matches!(e.event, SimEvent::ProjectileExpired { id: 0 }))
        );
    }

    #[test]
    fn oversized_script_runs_only_requested_ticks() {
        let sim = FrameSimulator::default();
        let script = parse_script(&format!("w*{}", usize::MAX)).unwrap();
        let (state, _, _) = run(&sim, &script, 3);
        assert_eq!(state.tick, 3);
        assert!((state.player.position.z - 0.3).abs() < 1e-5);
    }

    #[test]
    fn report_serializes_state_and_events() {
        let sim = FrameSimulator::default();
        let script = parse_script("drop").unwrap();
        let (state, view, events) = run(&sim, &script, 1);
        let report = RunReport {
            view: ViewReport::from(&view),
            state,
            events,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["state"]["tick"], 1);
        assert_eq!(value["state"]["gun"]["held"], false);
        assert_eq!(value["events"][0]["tick"], 1);
        assert_eq!(value["view"]["fov_degrees"], 75.0);
    }

    #[test]
    fn missing_config_is_an_error() {
        let path = PathBuf::from("/nonexistent/blockrange/tuning.json");
        assert!(load_tuning(Some(&path)).is_err());
        assert_eq!(load_tuning(None).unwrap(), Tuning::default());
    }

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "blockrange-cli",
            "-v",
            "run",
            "--ticks",
            "10",
            "--script",
            "w*3",
            "--json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                ticks,
                script,
                config,
                json,
            } => {
                assert_eq!(ticks, 10);
                assert_eq!(script, "w*3");
                assert!(config.is_none());
                assert!(json);
            }
            _ => panic!("expected run"),
        }
    }
}
