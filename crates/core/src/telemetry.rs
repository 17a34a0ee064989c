//! Vehicle telemetry snapshot
//!
//! Read fresh from the vehicle adapter every tick; never cached by the
//! state machine.

/// Telemetry consumed by the tracking state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    /// Remaining battery as a fraction (0.0 empty, 1.0 full).
    pub battery_fraction: f32,
    /// Altitude above the launch point in meters.
    pub altitude_m: f32,
}

impl Telemetry {
    pub fn new(battery_fraction: f32, altitude_m: f32) -> Self {
        Self {
            battery_fraction,
            altitude_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_fields() {
        let tel = Telemetry::new(0.8, 4.5);
        assert!((tel.battery_fraction - 0.8).abs() < 0.001);
        assert!((tel.altitude_m - 4.5).abs() < 0.001);
    }
}
