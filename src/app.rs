//! Real-time game loop
//!
//! `App` owns one run: each frame it waits on the clock, polls input,
//! advances the simulation, and draws when a renderer is attached.

use std::fmt;
use std::io;

use crate::platform::{Clock, InputSource};
use crate::renderer::{Renderer, build_frame};
use crate::sim::{GamePhase, GameState, RunSummary, tick};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    GameOver,
    Duration,
    UserQuit,
}

impl StopReason {
    pub fn from_phase(phase: GamePhase) -> Option<Self> {
        match phase {
            GamePhase::Running => None,
            GamePhase::GameOver => Some(StopReason::GameOver),
            GamePhase::StoppedByDuration => Some(StopReason::Duration),
            GamePhase::UserQuit => Some(StopReason::UserQuit),
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::GameOver => "game over",
            StopReason::Duration => "time limit",
            StopReason::UserQuit => "user quit",
        };
        f.write_str(s)
    }
}

/// Line printed when a run ends; user quits print nothing.
pub fn stop_message(summary: &RunSummary, time_limit: Option<f32>) -> Option<String> {
    match StopReason::from_phase(summary.phase)? {
        StopReason::GameOver => Some(format!("Game Over. Score: {}", summary.score)),
        StopReason::Duration => Some(format!(
            "Stopping after {:.2}s (max_seconds={:?}) - score={} health={}",
            summary.elapsed,
            time_limit.unwrap_or(summary.elapsed),
            summary.score,
            summary.health
        )),
        StopReason::UserQuit => None,
    }
}

pub struct App {
    state: GameState,
    input: Box<dyn InputSource>,
    clock: Box<dyn Clock>,
    renderer: Option<Box<dyn Renderer>>,
}

impl App {
    /// Headless by default; attach a renderer with `with_renderer`
    pub fn new(state: GameState, input: Box<dyn InputSource>, clock: Box<dyn Clock>) -> Self {
        Self {
            state,
            input,
            clock,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run one frame. Returns the stop reason once the run has ended.
    pub fn step(&mut self) -> io::Result<Option<StopReason>> {
        if let Some(reason) = StopReason::from_phase(self.state.phase) {
            return Ok(Some(reason));
        }

        let dt = self.clock.tick();
        let input = self.input.poll()?;
        tick(&mut self.state, &input, dt);

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.present(&build_frame(&self.state))?;
        }

        Ok(StopReason::from_phase(self.state.phase))
    }

    /// Run frames until the game stops
    pub fn run(&mut self) -> io::Result<RunSummary> {
        log::info!(
            "starting run: seed={} time_limit={:?} rendering={}",
            self.state.seed,
            self.state.time_limit,
            self.renderer.is_some()
        );
        let reason = loop {
            if let Some(reason) = self.step()? {
                break reason;
            }
        };
        let summary = self.state.summary();
        log::info!(
            "run ended ({reason}) after {} ticks: score={} health={}",
            summary.ticks,
            summary.score,
            summary.health
        );
        Ok(summary)
    }

    pub fn stop_message(&self) -> Option<String> {
        stop_message(&self.state.summary(), self.state.time_limit)
    }
}
