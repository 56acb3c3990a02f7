//! Platform abstraction layer
//!
//! Everything the real-time loop needs from the outside world:
//! - Input: where each frame's `TickInput` comes from
//! - Time: measuring frame duration and pacing to the target rate
//! - Terminal: raw-mode session and keyboard reading

pub mod terminal;
pub mod time;

pub use terminal::{TerminalInput, TerminalSession};
pub use time::{Clock, FixedStep, FramePacer};

use crate::sim::TickInput;

/// Source of per-frame player input
pub trait InputSource {
    /// Collect input for the next tick; never blocks
    fn poll(&mut self) -> std::io::Result<TickInput>;
}

/// No player at the controls: the craft idles until the run ends
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessInput;

impl InputSource for HeadlessInput {
    fn poll(&mut self) -> std::io::Result<TickInput> {
        Ok(TickInput::default())
    }
}

/// Replays a fixed input script, then idles
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    frames: std::collections::VecDeque<TickInput>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> std::io::Result<TickInput> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
