//! Tracking state machine
//!
//! One `step()` call per control tick, one `Directive` out per call.
//! Inside each tick an ordered list of override rules runs before the
//! per-phase transition logic:
//!
//! 1. `Landing` is terminal and absorbs everything.
//! 2. Frame acquisition failure forces `Landing`.
//! 3. Battery below the floor forces `ReturningHome` (unless already
//!    returning).
//! 4. Operator intent (quit / pause / force-return / new-search).
//! 5. Per-phase transitions, only when no higher rule fired.
//!
//! Safety must never be masked by mission logic or operator intent;
//! operator intent overrides mission logic but not safety. The directive
//! emitted is that of the phase the tick ends in, so a transition and
//! its new phase's command land on the same tick and no stale command
//! ever carries over.

mod phase;

pub use phase::Phase;

use crate::command::{Directive, OperatorCommand, RateCommand};
use crate::config::{ControlGains, FrameGeometry, TrackerConfig};
use crate::control;
use crate::perception::Observation;
use crate::telemetry::Telemetry;

/// Everything the state machine consumes in one tick.
///
/// Built fresh every tick by the driving loop; the tracker retains none
/// of it besides the counters and timestamps folded into the phase.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Perception result for this tick.
    pub observation: Observation,
    /// Vehicle telemetry read this tick.
    pub telemetry: Telemetry,
    /// Monotonic time in microseconds.
    pub now_us: u64,
    /// Operator input, at most one command per tick.
    pub operator: OperatorCommand,
}

/// The tracking state machine.
///
/// Exclusively owns the mission phase. Configuration is immutable for
/// the tracker's lifetime and injected at construction, so the machine
/// is testable with synthetic thresholds.
pub struct Tracker {
    config: TrackerConfig,
    frame: FrameGeometry,
    gains: ControlGains,
    phase: Phase,
}

impl Tracker {
    /// Create a tracker in `TakingOff`, the phase the vehicle is in once
    /// pre-flight and the takeoff command have been issued.
    pub fn new(config: TrackerConfig, frame: FrameGeometry, gains: ControlGains) -> Self {
        Self {
            config,
            frame,
            gains,
            phase: Phase::TakingOff,
        }
    }

    /// Current phase, for logging and display.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance one tick and emit the directive for it.
    pub fn step(&mut self, input: &TickInput) -> Directive {
        if !self.apply_overrides(input) {
            self.advance_phase(input);
        }
        self.directive(input)
    }

    /// Rules 1-4. Returns true when a rule decided this tick's phase,
    /// which suppresses the per-phase logic.
    fn apply_overrides(&mut self, input: &TickInput) -> bool {
        if self.phase.is_terminal() {
            return true;
        }

        if matches!(input.observation, Observation::FrameLoss) {
            self.phase = Phase::Landing;
            return true;
        }

        if input.telemetry.battery_fraction < self.config.min_battery_fraction
            && !matches!(self.phase, Phase::ReturningHome)
        {
            self.phase = Phase::ReturningHome;
            return true;
        }

        match input.operator {
            OperatorCommand::Quit => {
                self.phase = Phase::Landing;
                true
            }
            OperatorCommand::PauseToggle => {
                self.phase = if matches!(self.phase, Phase::Paused) {
                    // Un-pausing starts a fresh search window.
                    Phase::Searching {
                        started_us: input.now_us,
                    }
                } else {
                    Phase::Paused
                };
                true
            }
            OperatorCommand::ForceReturn => {
                if matches!(self.phase, Phase::ReturningHome) {
                    // Already returning; let the altitude check run.
                    false
                } else {
                    self.phase = Phase::ReturningHome;
                    true
                }
            }
            OperatorCommand::NewSearch => {
                self.phase = Phase::Searching {
                    started_us: input.now_us,
                };
                true
            }
            OperatorCommand::None => false,
        }
    }

    /// Rule 5: per-phase transition logic.
    fn advance_phase(&mut self, input: &TickInput) {
        let detection = input.observation.detection();

        self.phase = match self.phase {
            Phase::TakingOff => {
                if input.telemetry.altitude_m >= 0.95 * self.config.takeoff_altitude_m {
                    Phase::Searching {
                        started_us: input.now_us,
                    }
                } else {
                    Phase::TakingOff
                }
            }

            Phase::Searching { started_us } => {
                if detection.is_some() {
                    Phase::Confirming { hits: 1 }
                } else if input.now_us.saturating_sub(started_us) > self.config.search_timeout_us {
                    Phase::ReturningHome
                } else {
                    Phase::Searching { started_us }
                }
            }

            Phase::Confirming { hits } => {
                if detection.is_some() {
                    let hits = hits + 1;
                    if hits >= self.config.confirmation_frames {
                        Phase::Tracking
                    } else {
                        Phase::Confirming { hits }
                    }
                } else {
                    // A single missed frame discards the whole count.
                    Phase::Searching {
                        started_us: input.now_us,
                    }
                }
            }

            Phase::Tracking => {
                if detection.is_some() {
                    Phase::Tracking
                } else {
                    Phase::Grace {
                        lost_at_us: input.now_us,
                    }
                }
            }

            Phase::Grace { lost_at_us } => {
                if detection.is_some() {
                    // Reacquired: resume control immediately, no
                    // re-confirmation.
                    Phase::Tracking
                } else if input.now_us.saturating_sub(lost_at_us) > self.config.grace_period_us {
                    Phase::Searching {
                        started_us: input.now_us,
                    }
                } else {
                    Phase::Grace { lost_at_us }
                }
            }

            Phase::Paused => Phase::Paused,

            Phase::ReturningHome => {
                if input.telemetry.altitude_m < self.config.near_ground_altitude_m {
                    Phase::Landing
                } else {
                    Phase::ReturningHome
                }
            }

            // Terminal rule fires before phase logic.
            Phase::Landing => Phase::Landing,
        };
    }

    /// The directive of the phase this tick ended in.
    fn directive(&self, input: &TickInput) -> Directive {
        match self.phase {
            Phase::TakingOff => Directive::FreeFlight,
            Phase::Searching { .. } => Directive::Rates(RateCommand {
                pitch: self.gains.neutral,
                yaw: self.config.search_yaw,
                throttle: self.gains.neutral,
            }),
            Phase::Confirming { .. } | Phase::Grace { .. } | Phase::Paused => Directive::Hover,
            Phase::Tracking => match input.observation.detection() {
                Some(det) => Directive::Rates(control::steer(&det, &self.frame, &self.gains)),
                // Tracking is only ever held with a detection in hand;
                // hover is the safe answer if that invariant breaks.
                None => Directive::Hover,
            },
            Phase::ReturningHome => Directive::ReturnHome,
            Phase::Landing => Directive::Land,
        }
    }
}
