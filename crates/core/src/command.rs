//! Actuator directives and operator commands
//!
//! A `Directive` is the single actuator instruction the state machine
//! emits per tick. It fully determines actuator behavior for that tick;
//! nothing carries over implicitly from the previous tick.

/// Rate command triple for direct flight control.
///
/// Values are RC-channel style commands centered on the configured
/// neutral value (pitch = forward/back, yaw = turn rate, throttle =
/// vertical). The vehicle adapter maps them onto its override channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCommand {
    pub pitch: f32,
    pub yaw: f32,
    pub throttle: f32,
}

impl RateCommand {
    /// All three axes at the given neutral value (hover).
    pub fn neutral(neutral: f32) -> Self {
        Self {
            pitch: neutral,
            yaw: neutral,
            throttle: neutral,
        }
    }
}

/// The per-tick actuator instruction.
///
/// Rate variants and mode-request variants are mutually exclusive on real
/// actuation hardware: the vehicle adapter must clear any rate override
/// before honoring `ReturnHome`/`Land`, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// No override; an externally commanded maneuver (takeoff ascent)
    /// is in progress.
    FreeFlight,
    /// Neutral commands on all axes.
    Hover,
    /// Direct rate commands from the control law or the search turn.
    Rates(RateCommand),
    /// Hand control to the vehicle's return-to-launch sequence.
    ReturnHome,
    /// Hand control to the vehicle's landing sequence.
    Land,
}

/// Discrete operator input, delivered at most once per tick.
///
/// Source and encoding (keyboard, network, GPIO) are the operator
/// adapter's concern; the state machine only sees this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorCommand {
    /// No input this tick
    #[default]
    None,
    /// Abort and land
    Quit,
    /// Toggle between paused hover and searching
    PauseToggle,
    /// Force return-to-launch
    ForceReturn,
    /// Drop the current target and search again
    NewSearch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_rate_command() {
        let cmd = RateCommand::neutral(1500.0);
        assert!((cmd.pitch - 1500.0).abs() < 0.001);
        assert!((cmd.yaw - 1500.0).abs() < 0.001);
        assert!((cmd.throttle - 1500.0).abs() < 0.001);
    }

    #[test]
    fn test_operator_command_default_is_none() {
        assert_eq!(OperatorCommand::default(), OperatorCommand::None);
    }
}
