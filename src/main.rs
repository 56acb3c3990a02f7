//! Jet Runner entry point
//!
//! Parses the command line, sets up logging and the terminal, and runs the
//! game loop until it stops.

use std::io::stdout;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use jet_runner::consts::FPS;
use jet_runner::platform::{FramePacer, HeadlessInput, TerminalInput, TerminalSession};
use jet_runner::renderer::TerminalRenderer;
use jet_runner::settings::clamp_alpha;
use jet_runner::sim::GameState;
use jet_runner::{App, Settings};

#[derive(Parser, Debug)]
#[command(name = "jet-runner")]
#[command(about = "Vertical-scrolling arcade shooter in the terminal")]
struct Args {
    /// Run without drawing or reading the keyboard
    #[arg(long)]
    headless: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
    duration: Option<f32>,

    /// Armed enemies hold their fire
    #[arg(long)]
    no_enemy_bullets: bool,

    /// Add nebulae to the background
    #[arg(long)]
    enable_nebulae: bool,

    /// Opacity cap for background scenery, clamped to 0-255
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_scenery_alpha: Option<i64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file; command-line flags take precedence
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the run summary as JSON on exit
    #[arg(long)]
    summary_json: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        settings.headless |= self.headless;
        if self.duration.is_some() {
            settings.duration = self.duration;
        }
        if self.no_enemy_bullets {
            settings.enemy_bullets = false;
        }
        settings.enable_nebulae |= self.enable_nebulae;
        if let Some(alpha) = self.max_scenery_alpha {
            settings.max_scenery_alpha = clamp_alpha(alpha);
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        Ok(settings.sanitized())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = args.settings()?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Jet Runner starting with seed: {seed}");
    log::debug!("settings: {settings:?}");

    let state = GameState::new(seed, settings.rules()).with_time_limit(settings.duration);
    let clock = Box::new(FramePacer::new(FPS));

    let (summary, message) = if settings.headless {
        let mut app = App::new(state, Box::new(HeadlessInput), clock);
        let summary = app.run().context("headless run failed")?;
        (summary, app.stop_message())
    } else {
        let session = TerminalSession::enter().context("failed to set up the terminal")?;
        let mut app = App::new(state, Box::new(TerminalInput::new()), clock)
            .with_renderer(Box::new(TerminalRenderer::new(stdout())));
        let result = app.run();
        // Restore the terminal before anything is printed
        drop(session);
        let summary = result.context("game loop failed")?;
        (summary, app.stop_message())
    };

    if let Some(message) = message {
        println!("{message}");
    }
    if args.summary_json {
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let args = Args::parse_from([
            "jet-runner",
            "--headless",
            "--duration",
            "2",
            "--no-enemy-bullets",
            "--max-scenery-alpha",
            "999",
            "--seed",
            "7",
        ]);
        let s = args.settings().unwrap();
        assert!(s.headless);
        assert_eq!(s.duration, Some(2.0));
        assert!(!s.enemy_bullets);
        assert!(!s.enable_nebulae);
        assert_eq!(s.max_scenery_alpha, 255);
        assert_eq!(s.seed, Some(7));
    }

    #[test]
    fn test_negative_cli_values_are_clamped() {
        let args = Args::parse_from([
            "jet-runner",
            "--duration",
            "-1",
            "--max-scenery-alpha",
            "-20",
        ]);
        let s = args.settings().unwrap();
        assert_eq!(s.duration, Some(0.0));
        assert_eq!(s.max_scenery_alpha, 0);
    }

    #[test]
    fn test_no_flags_keep_defaults() {
        let s = Args::parse_from(["jet-runner"]).settings().unwrap();
        assert_eq!(s, Settings::default());
    }
}
