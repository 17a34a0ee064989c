//! Mission tick driver
//!
//! Runs the control loop at a fixed, best-effort cadence. One tick is
//! one detection fetch, one telemetry read, one operator poll, one
//! state-machine step, and one directive dispatch, strictly in that
//! order on a single thread. The loop stops only after observing the
//! `Land` directive; whatever happens, the vehicle passes through the
//! safe-shutdown path (overrides cleared, disarmed) before `run`
//! returns or unwinds.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use skytrail_core::{Clock, Directive, TickInput, Tracker};
use tracing::{error, info};

use crate::error::CompanionError;
use crate::operator::OperatorInput;
use crate::vehicle::VehicleLink;
use crate::vision::DetectionSource;

/// Host monotonic clock, microseconds since construction.
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Summary of a completed mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionReport {
    /// Control ticks executed, including the final landing tick.
    pub ticks: u64,
    /// Name of the phase the mission ended in (always "Landing" for a
    /// run that completed normally).
    pub final_phase: &'static str,
}

/// Drives a `Tracker` against the three adapter boundaries.
pub struct MissionRunner<C: Clock> {
    tracker: Tracker,
    clock: C,
    tick_interval: Duration,
}

impl<C: Clock> MissionRunner<C> {
    /// A zero `tick_interval` disables pacing (used by tests).
    pub fn new(tracker: Tracker, clock: C, tick_interval: Duration) -> Self {
        Self {
            tracker,
            clock,
            tick_interval,
        }
    }

    /// Fly the mission to completion.
    ///
    /// Pre-flight failures abort before the loop starts. Once airborne,
    /// the safe shutdown runs unconditionally: after a normal landing,
    /// after an adapter error, and on panic unwind.
    pub fn run(
        &mut self,
        vision: &mut dyn DetectionSource,
        vehicle: &mut dyn VehicleLink,
        operator: &mut dyn OperatorInput,
    ) -> Result<MissionReport, CompanionError> {
        vehicle.prepare_for_flight()?;

        let flight = panic::catch_unwind(AssertUnwindSafe(|| {
            self.fly(vision, vehicle, operator)
        }));

        let shutdown = vehicle.shutdown();

        match flight {
            Err(cause) => {
                error!("control loop panicked; vehicle was shut down");
                panic::resume_unwind(cause);
            }
            Ok(outcome) => {
                let report = outcome?;
                shutdown?;
                info!(
                    ticks = report.ticks,
                    final_phase = report.final_phase,
                    "mission complete"
                );
                Ok(report)
            }
        }
    }

    fn fly(
        &mut self,
        vision: &mut dyn DetectionSource,
        vehicle: &mut dyn VehicleLink,
        operator: &mut dyn OperatorInput,
    ) -> Result<MissionReport, CompanionError> {
        let mut ticks: u64 = 0;

        loop {
            let tick_started = Instant::now();

            let input = TickInput {
                observation: vision.fetch(),
                telemetry: vehicle.telemetry()?,
                now_us: self.clock.now_us(),
                operator: operator.poll(),
            };

            let before = self.tracker.phase();
            let directive = self.tracker.step(&input);
            let after = self.tracker.phase();
            if before.name() != after.name() {
                info!(from = before.name(), to = after.name(), "phase transition");
            }

            vehicle.apply(&directive)?;
            ticks += 1;

            if directive == Directive::Land {
                // Terminal: the land request is dispatched, the vehicle
                // finishes the descent on its own.
                break;
            }

            self.pace(tick_started);
        }

        Ok(MissionReport {
            ticks,
            final_phase: self.tracker.phase().name(),
        })
    }

    /// Sleep out the remainder of the tick budget, if any.
    fn pace(&self, tick_started: Instant) {
        if self.tick_interval.is_zero() {
            return;
        }
        let remaining = self.tick_interval.saturating_sub(tick_started.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}
