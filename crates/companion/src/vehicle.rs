//! Vehicle actuation boundary
//!
//! The real system talks MAVLink to a flight controller behind this
//! trait: RC-style rate overrides for direct control, mode switches for
//! the vehicle-managed return and landing sequences. The repo ships a
//! self-contained simulated vehicle in its place.
//!
//! # Override / mode exclusivity
//!
//! Rate overrides and flight-mode requests are mutually exclusive on
//! real actuation hardware: a standing override would fight the RTL or
//! LAND controller. Implementations must clear the previous one before
//! applying the other, which `SimVehicle` models explicitly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skytrail_core::{Directive, RateCommand, Telemetry};
use tracing::{debug, info};

use crate::error::CompanionError;

/// Synchronous vehicle link consumed by the tick driver.
pub trait VehicleLink {
    /// Pre-flight sequence: arm, enter guided control, command takeoff.
    fn prepare_for_flight(&mut self) -> Result<(), CompanionError>;

    /// Dispatch this tick's directive. Fire-and-forget, non-blocking.
    fn apply(&mut self, directive: &Directive) -> Result<(), CompanionError>;

    /// Read the current telemetry snapshot.
    fn telemetry(&mut self) -> Result<Telemetry, CompanionError>;

    /// Best-effort safe shutdown: clear overrides and disarm.
    fn shutdown(&mut self) -> Result<(), CompanionError>;
}

/// Flight mode of the simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightMode {
    /// Scripted control via rate overrides
    Guided,
    /// Vehicle-managed return to launch
    ReturnToLaunch,
    /// Vehicle-managed landing
    Land,
}

/// Configuration for the simulated vehicle.
#[derive(Debug, Clone)]
pub struct SimVehicleConfig {
    /// Altitude the takeoff command climbs toward (meters)
    pub takeoff_altitude_m: f32,
    /// Climb rate during takeoff (m/s)
    pub climb_rate_ms: f32,
    /// Descent rate in return/land modes (m/s)
    pub descent_rate_ms: f32,
    /// Vertical response to a full-scale throttle override (m/s)
    pub throttle_authority_ms: f32,
    /// Battery drained per simulated second (fraction)
    pub battery_drain_per_s: f32,
    /// Initial battery fraction
    pub battery_start: f32,
    /// Altitude noise amplitude in meters (0.0 = noiseless)
    pub altitude_noise_m: f32,
    /// Neutral value of the override channels
    pub neutral: f32,
    /// Simulated seconds per telemetry read
    pub tick_dt_s: f32,
    /// RNG seed for deterministic runs. None = from entropy.
    pub seed: Option<u64>,
}

impl Default for SimVehicleConfig {
    fn default() -> Self {
        Self {
            takeoff_altitude_m: 5.0,
            climb_rate_ms: 1.0,
            descent_rate_ms: 1.0,
            throttle_authority_ms: 1.0,
            battery_drain_per_s: 0.0005,
            battery_start: 1.0,
            altitude_noise_m: 0.0,
            neutral: 1500.0,
            tick_dt_s: 0.05,
            seed: Some(0),
        }
    }
}

/// Self-contained simulated multirotor.
///
/// First-order altitude dynamics and linear battery drain; just enough
/// physics to exercise every path of the state machine. The simulation
/// advances one `tick_dt_s` step on each telemetry read, which the
/// runner performs exactly once per tick.
pub struct SimVehicle {
    config: SimVehicleConfig,
    altitude_m: f32,
    battery_fraction: f32,
    armed: bool,
    mode: FlightMode,
    rate_override: Option<RateCommand>,
    takeoff_commanded: bool,
    rng: StdRng,
}

impl SimVehicle {
    pub fn new(config: SimVehicleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let battery_fraction = config.battery_start;
        Self {
            config,
            altitude_m: 0.0,
            battery_fraction,
            armed: false,
            mode: FlightMode::Guided,
            rate_override: None,
            takeoff_commanded: false,
            rng,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SimVehicleConfig::default())
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    pub fn rate_override(&self) -> Option<RateCommand> {
        self.rate_override
    }

    pub fn altitude_m(&self) -> f32 {
        self.altitude_m
    }

    fn require_armed(&self) -> Result<(), CompanionError> {
        if self.armed {
            Ok(())
        } else {
            Err(CompanionError::Link("vehicle is not armed".into()))
        }
    }

    /// Switch flight mode, clearing any standing rate override first.
    fn set_mode(&mut self, mode: FlightMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "sim vehicle mode change");
        }
        self.rate_override = None;
        self.mode = mode;
    }

    /// One integration step of the toy dynamics.
    fn integrate(&mut self) {
        let dt = self.config.tick_dt_s;
        self.battery_fraction =
            (self.battery_fraction - self.config.battery_drain_per_s * dt).max(0.0);

        match self.mode {
            FlightMode::Guided => match self.rate_override {
                Some(cmd) => {
                    // Throttle below neutral commands climb (control-law
                    // sign convention), scaled by the half-range span.
                    let span = 500.0;
                    let climb = (self.config.neutral - cmd.throttle) / span
                        * self.config.throttle_authority_ms;
                    self.altitude_m = (self.altitude_m + climb * dt).max(0.0);
                }
                None => {
                    if self.takeoff_commanded && self.altitude_m < self.config.takeoff_altitude_m {
                        self.altitude_m = (self.altitude_m + self.config.climb_rate_ms * dt)
                            .min(self.config.takeoff_altitude_m);
                    }
                }
            },
            FlightMode::ReturnToLaunch | FlightMode::Land => {
                self.altitude_m = (self.altitude_m - self.config.descent_rate_ms * dt).max(0.0);
            }
        }

        if self.config.altitude_noise_m > 0.0 {
            let n = self.config.altitude_noise_m;
            self.altitude_m = (self.altitude_m + self.rng.gen_range(-n..=n)).max(0.0);
        }
    }
}

impl VehicleLink for SimVehicle {
    fn prepare_for_flight(&mut self) -> Result<(), CompanionError> {
        if self.battery_fraction <= 0.0 {
            return Err(CompanionError::Arming("battery is empty"));
        }
        self.set_mode(FlightMode::Guided);
        self.armed = true;
        self.takeoff_commanded = true;
        info!(
            target_altitude_m = self.config.takeoff_altitude_m,
            "sim vehicle armed, takeoff commanded"
        );
        Ok(())
    }

    fn apply(&mut self, directive: &Directive) -> Result<(), CompanionError> {
        self.require_armed()?;
        match directive {
            Directive::FreeFlight => {
                self.rate_override = None;
            }
            Directive::Hover => {
                self.set_mode(FlightMode::Guided);
                self.rate_override = Some(RateCommand::neutral(self.config.neutral));
            }
            Directive::Rates(cmd) => {
                self.set_mode(FlightMode::Guided);
                self.rate_override = Some(*cmd);
            }
            Directive::ReturnHome => {
                self.set_mode(FlightMode::ReturnToLaunch);
            }
            Directive::Land => {
                self.set_mode(FlightMode::Land);
            }
        }
        Ok(())
    }

    fn telemetry(&mut self) -> Result<Telemetry, CompanionError> {
        self.integrate();
        Ok(Telemetry::new(self.battery_fraction, self.altitude_m))
    }

    fn shutdown(&mut self) -> Result<(), CompanionError> {
        if self.armed {
            self.rate_override = None;
            self.armed = false;
            info!("sim vehicle overrides cleared and disarmed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flown_vehicle() -> SimVehicle {
        let mut vehicle = SimVehicle::with_defaults();
        vehicle.prepare_for_flight().unwrap();
        vehicle
    }

    // ========== Arming and Takeoff ==========

    #[test]
    fn test_commands_rejected_before_arming() {
        let mut vehicle = SimVehicle::with_defaults();
        assert!(vehicle.apply(&Directive::Hover).is_err());
    }

    #[test]
    fn test_prepare_arms_and_climbs() {
        let mut vehicle = flown_vehicle();
        assert!(vehicle.is_armed());

        // 1 m/s at 20 Hz: ~5s to reach 5m.
        for _ in 0..110 {
            vehicle.telemetry().unwrap();
        }
        let tel = vehicle.telemetry().unwrap();
        assert!(
            (tel.altitude_m - 5.0).abs() < 0.01,
            "takeoff should settle at the commanded altitude, got {}",
            tel.altitude_m
        );
    }

    #[test]
    fn test_prepare_rejected_on_empty_battery() {
        let mut vehicle = SimVehicle::new(SimVehicleConfig {
            battery_start: 0.0,
            ..SimVehicleConfig::default()
        });
        assert!(matches!(
            vehicle.prepare_for_flight(),
            Err(CompanionError::Arming(_))
        ));
    }

    // ========== Override / Mode Exclusivity ==========

    #[test]
    fn test_mode_request_clears_rate_override() {
        let mut vehicle = flown_vehicle();
        vehicle
            .apply(&Directive::Rates(RateCommand::neutral(1500.0)))
            .unwrap();
        assert!(vehicle.rate_override().is_some());

        vehicle.apply(&Directive::ReturnHome).unwrap();
        assert_eq!(vehicle.mode(), FlightMode::ReturnToLaunch);
        assert!(
            vehicle.rate_override().is_none(),
            "RTL must not fight a standing override"
        );
    }

    #[test]
    fn test_rates_after_mode_request_restore_guided() {
        let mut vehicle = flown_vehicle();
        vehicle.apply(&Directive::ReturnHome).unwrap();

        vehicle
            .apply(&Directive::Rates(RateCommand::neutral(1500.0)))
            .unwrap();
        assert_eq!(vehicle.mode(), FlightMode::Guided);
        assert!(vehicle.rate_override().is_some());
    }

    // ========== Dynamics ==========

    #[test]
    fn test_land_descends_to_ground() {
        let mut vehicle = flown_vehicle();
        for _ in 0..120 {
            vehicle.telemetry().unwrap(); // climb out
        }
        vehicle.apply(&Directive::Land).unwrap();

        for _ in 0..120 {
            vehicle.telemetry().unwrap();
        }
        let tel = vehicle.telemetry().unwrap();
        assert!(
            tel.altitude_m < 0.01,
            "landing should reach the ground, got {}",
            tel.altitude_m
        );
    }

    #[test]
    fn test_throttle_override_moves_altitude() {
        let mut vehicle = flown_vehicle();
        for _ in 0..120 {
            vehicle.telemetry().unwrap();
        }
        let before = vehicle.altitude_m();

        // Throttle below neutral commands climb.
        vehicle
            .apply(&Directive::Rates(RateCommand {
                pitch: 1500.0,
                yaw: 1500.0,
                throttle: 1400.0,
            }))
            .unwrap();
        for _ in 0..20 {
            vehicle.telemetry().unwrap();
        }
        assert!(
            vehicle.altitude_m() > before,
            "below-neutral throttle must climb: {} -> {}",
            before,
            vehicle.altitude_m()
        );
    }

    #[test]
    fn test_battery_drains_over_time() {
        let mut vehicle = flown_vehicle();
        let start = vehicle.telemetry().unwrap().battery_fraction;
        for _ in 0..200 {
            vehicle.telemetry().unwrap();
        }
        let end = vehicle.telemetry().unwrap().battery_fraction;
        assert!(end < start, "battery must drain: {} -> {}", start, end);
        assert!(end >= 0.0);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let run = || {
            let mut vehicle = SimVehicle::new(SimVehicleConfig {
                altitude_noise_m: 0.05,
                seed: Some(42),
                ..SimVehicleConfig::default()
            });
            vehicle.prepare_for_flight().unwrap();
            let mut last = 0.0;
            for _ in 0..50 {
                last = vehicle.telemetry().unwrap().altitude_m;
            }
            last
        };
        assert_eq!(run(), run(), "same seed must reproduce the same run");
    }

    // ========== Shutdown ==========

    #[test]
    fn test_shutdown_clears_and_disarms() {
        let mut vehicle = flown_vehicle();
        vehicle
            .apply(&Directive::Rates(RateCommand::neutral(1500.0)))
            .unwrap();

        vehicle.shutdown().unwrap();
        assert!(!vehicle.is_armed());
        assert!(vehicle.rate_override().is_none());

        // Shutdown is idempotent.
        vehicle.shutdown().unwrap();
        assert!(!vehicle.is_armed());
    }
}
