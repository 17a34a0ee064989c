//! Operator input boundary
//!
//! The core consumes at most one discrete `OperatorCommand` per tick.
//! Where it comes from is this module's concern: a scripted queue for
//! tests and demos, or a background stdin reader for interactive runs.
//! External termination requests arrive as `Quit` here, never as an
//! abrupt kill, so the actuators always pass through the safe shutdown
//! path.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use skytrail_core::OperatorCommand;
use tracing::debug;

/// Non-blocking per-tick poll for operator input.
pub trait OperatorInput {
    /// The command for this tick, `OperatorCommand::None` when idle.
    fn poll(&mut self) -> OperatorCommand;
}

/// Scripted operator for tests and demos: commands are delivered in
/// order, one per poll, then `None` forever.
#[derive(Debug, Default)]
pub struct QueuedOperator {
    queue: VecDeque<OperatorCommand>,
}

impl QueuedOperator {
    pub fn new(commands: impl IntoIterator<Item = OperatorCommand>) -> Self {
        Self {
            queue: commands.into_iter().collect(),
        }
    }

    /// Append a command to the end of the script.
    pub fn push(&mut self, command: OperatorCommand) {
        self.queue.push_back(command);
    }
}

impl OperatorInput for QueuedOperator {
    fn poll(&mut self) -> OperatorCommand {
        self.queue.pop_front().unwrap_or(OperatorCommand::None)
    }
}

/// Map one key to its operator command (q/p/s/n).
fn command_for_key(key: char) -> Option<OperatorCommand> {
    match key.to_ascii_lowercase() {
        'q' => Some(OperatorCommand::Quit),
        'p' => Some(OperatorCommand::PauseToggle),
        's' => Some(OperatorCommand::ForceReturn),
        'n' => Some(OperatorCommand::NewSearch),
        _ => None,
    }
}

/// Interactive operator reading single-letter commands from stdin.
///
/// A background thread blocks on stdin lines and feeds a channel; the
/// control loop polls the channel without blocking, one command per
/// tick. If the operator types ahead, commands queue up and drain one
/// tick at a time.
pub struct KeyboardOperator {
    rx: Receiver<OperatorCommand>,
    disconnected: bool,
}

impl KeyboardOperator {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                for key in line.trim().chars() {
                    if let Some(command) = command_for_key(key) {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                }
            }
        });
        Self {
            rx,
            disconnected: false,
        }
    }
}

impl OperatorInput for KeyboardOperator {
    fn poll(&mut self) -> OperatorCommand {
        match self.rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => OperatorCommand::None,
            Err(TryRecvError::Disconnected) => {
                if !self.disconnected {
                    self.disconnected = true;
                    debug!("stdin closed, no further operator input");
                }
                OperatorCommand::None
            }
        }
    }
}
