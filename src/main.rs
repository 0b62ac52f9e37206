use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use stationline::config::ConfigError;
use stationline::content::ContentError;
use stationline::scene::{SignPlacement, TrackRails};
use stationline::track::{BufferStop, LayoutMetrics};
use stationline::{InputEvent, Scene, SceneConfig, StationList, Viewport};

#[derive(Debug, Parser)]
#[command(
    name = "stationline",
    about = "Headless driver for the station-line scene",
    version
)]
struct Cli {
    /// Station list JSON. Defaults to the built-in list.
    #[arg(long, global = true)]
    stations: Option<PathBuf>,

    /// Scene config JSON. Missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "30", global = true)]
    width: f32,

    #[arg(long, default_value = "20", global = true)]
    height: f32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Step the scene and print one JSON frame per line.
    Run {
        #[arg(long, default_value = "600")]
        frames: u64,

        #[arg(long, default_value = "60")]
        fps: f32,

        /// Enter this station's branch on the first frame.
        #[arg(long)]
        enter: Option<usize>,

        /// JSON array of `{ "frame": n, "event": ... }` applied before frame n.
        #[arg(long)]
        events: Option<PathBuf>,

        /// Print only every n-th frame.
        #[arg(long, default_value = "1")]
        every: u64,
    },

    /// Print the static layout: metrics, signs, buffer stops and rails.
    Layout {
        /// Include per-sample rail geometry.
        #[arg(long)]
        rails: bool,
    },
}

#[derive(Debug, Deserialize)]
struct ScheduledEvent {
    frame: u64,
    event: InputEvent,
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    layout: &'a LayoutMetrics,
    main_length: f32,
    stops: &'a [f32],
    signs: Vec<SignPlacement>,
    buffer_stops: Vec<BufferStop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rails: Option<Vec<RailReport>>,
}

#[derive(Serialize)]
struct RailReport {
    track: stationline::ActiveTrack,
    centre: Vec<stationline::Float3>,
    sleepers: usize,
}

#[derive(Debug)]
enum CliError {
    Content(ContentError),
    Config(ConfigError),
    Events(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Content(e) => write!(f, "content: {e}"),
            CliError::Config(e) => write!(f, "config: {e}"),
            CliError::Events(e) => write!(f, "events: {e}"),
            CliError::Io(e) => write!(f, "io: {e}"),
            CliError::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ContentError> for CliError {
    fn from(e: ContentError) -> Self {
        CliError::Content(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("stationline: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let stations = match &cli.stations {
        Some(path) => StationList::from_path(path)?,
        None => StationList::embedded()?,
    };
    let config = match &cli.config {
        Some(path) => SceneConfig::from_path(path)?,
        None => SceneConfig::default(),
    };
    let mut scene = Scene::new(stations, config, Viewport::new(cli.width, cli.height));

    match cli.command {
        Commands::Run {
            frames,
            fps,
            enter,
            events,
            every,
        } => {
            let mut schedule = match events {
                Some(path) => load_events(&path)?,
                None => Vec::new(),
            };
            if let Some(i) = enter {
                schedule.push(ScheduledEvent {
                    frame: 0,
                    event: InputEvent::EnterBranch(i),
                });
            }
            schedule.sort_by_key(|e| e.frame);
            simulate(&mut scene, &schedule, frames, fps, every.max(1))
        }
        Commands::Layout { rails } => print_layout(&scene, rails),
    }
}

fn load_events(path: &PathBuf) -> Result<Vec<ScheduledEvent>, CliError> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| CliError::Events(format!("{}: {e}", path.display())))
}

fn simulate(
    scene: &mut Scene,
    schedule: &[ScheduledEvent],
    frames: u64,
    fps: f32,
    every: u64,
) -> Result<(), CliError> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(CliError::Events(format!("fps must be positive, got {fps}")));
    }
    let dt = 1.0 / fps;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut pending = schedule.iter().peekable();
    for frame in 0..frames {
        while let Some(scheduled) = pending.next_if(|e| e.frame <= frame) {
            if !scene.handle(scheduled.event) {
                log::warn!("frame {frame}: {:?} had no effect", scheduled.event);
            }
        }

        let state = scene.step(dt);
        if frame % every == 0 {
            serde_json::to_writer(&mut out, &state)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn print_layout(scene: &Scene, with_rails: bool) -> Result<(), CliError> {
    let geometry = scene.geometry();
    let rails = with_rails.then(|| {
        scene
            .rails()
            .into_iter()
            .map(|TrackRails { track, rails }| RailReport {
                track,
                sleepers: rails.sleepers.len(),
                centre: rails.centre,
            })
            .collect()
    });

    let report = LayoutReport {
        layout: scene.layout(),
        main_length: geometry.main_length(),
        stops: geometry.stops(),
        signs: scene.signs(),
        buffer_stops: scene.buffer_stops(),
        rails,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::parse_from([
            "stationline",
            "--width",
            "40",
            "run",
            "--frames",
            "10",
            "--enter",
            "1",
        ]);
        assert_eq!(cli.width, 40.0);
        match cli.command {
            Commands::Run { frames, enter, .. } => {
                assert_eq!(frames, 10);
                assert_eq!(enter, Some(1));
            }
            Commands::Layout { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn scheduled_events_deserialize() {
        let json = r#"[
            { "frame": 5, "event": { "EnterBranch": 1 } },
            { "frame": 9, "event": { "Wheel": { "delta_y": 120.0 } } },
            { "frame": 12, "event": "Next" }
        ]"#;
        let events: Vec<ScheduledEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event, InputEvent::EnterBranch(1));
        assert_eq!(events[2].event, InputEvent::Next);
    }
}
