//! Mission phase variants
//!
//! Each phase carries the transient data only it needs (search timer,
//! confirmation counter, loss timestamp), so a stale timer from a
//! previous phase cannot exist: leaving the phase discards it with the
//! variant.

/// The mode the tracking state machine is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Externally commanded ascent toward the takeoff altitude.
    TakingOff,
    /// Slow yaw sweep looking for a target.
    Searching {
        /// When this search began; bounds the search via the timeout.
        started_us: u64,
    },
    /// Candidate acquired; counting consecutive detection ticks to
    /// reject single-frame false positives.
    Confirming {
        /// Consecutive detection ticks so far (starts at 1 on entry).
        hits: u32,
    },
    /// Actively steering toward the confirmed target.
    Tracking,
    /// Target dropped out; hovering through a bounded occlusion window.
    Grace {
        /// When the target was lost.
        lost_at_us: u64,
    },
    /// Operator hold; hover until toggled.
    Paused,
    /// Vehicle-managed return to the launch point.
    ReturningHome,
    /// Vehicle-managed landing. Terminal.
    Landing,
}

impl Phase {
    /// Phase name for logging and display.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::TakingOff => "TakingOff",
            Phase::Searching { .. } => "Searching",
            Phase::Confirming { .. } => "Confirming",
            Phase::Tracking => "Tracking",
            Phase::Grace { .. } => "Grace",
            Phase::Paused => "Paused",
            Phase::ReturningHome => "ReturningHome",
            Phase::Landing => "Landing",
        }
    }

    /// Landing never transitions out; the driving loop stops after
    /// observing its directive.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Landing)
    }
}
