//! Mission configuration
//!
//! One TOML file, loaded once at startup, converted into the core's
//! immutable configuration values. Every field has an in-code default,
//! so an absent file or a partial file both work. No hot reload.

use std::path::Path;

use serde::Deserialize;
use skytrail_core::{ControlGains, FrameGeometry, TrackerConfig};

use crate::error::CompanionError;

/// Mission configuration file contents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MissionFile {
    /// Commanded takeoff altitude (meters)
    pub takeoff_altitude_m: f32,
    /// Battery percentage that triggers the safety return
    pub min_battery_pct: f32,
    /// Abort search and return home after this many seconds
    pub search_timeout_s: f32,
    /// Target-loss tolerance before searching again (seconds)
    pub grace_period_s: f32,
    /// Consecutive detection frames required to confirm a target
    pub confirmation_frames: u32,
    /// Altitude below which the return hands over to landing (meters)
    pub near_ground_altitude_m: f32,

    /// Camera frame width (pixels)
    pub frame_width: f32,
    /// Camera frame height (pixels)
    pub frame_height: f32,
    /// Desired target bounding-box height (pixels)
    pub target_height_px: f32,

    /// Turn-rate gain
    pub yaw_kp: f32,
    /// Forward/back gain
    pub pitch_kp: f32,
    /// Vertical gain
    pub throttle_kp: f32,
    /// Neutral command value
    pub neutral: f32,
    /// Slow search-turn yaw command
    pub search_yaw: f32,
    /// Lower command saturation bound
    pub output_min: f32,
    /// Upper command saturation bound
    pub output_max: f32,

    /// Control loop rate (Hz)
    pub tick_hz: f32,
}

impl Default for MissionFile {
    fn default() -> Self {
        Self {
            takeoff_altitude_m: 5.0,
            min_battery_pct: 20.0,
            search_timeout_s: 60.0,
            grace_period_s: 3.0,
            confirmation_frames: 5,
            near_ground_altitude_m: 1.0,
            frame_width: 640.0,
            frame_height: 480.0,
            target_height_px: 150.0,
            yaw_kp: 0.005,
            pitch_kp: 0.008,
            throttle_kp: 0.006,
            neutral: 1500.0,
            search_yaw: 1550.0,
            output_min: 1000.0,
            output_max: 2000.0,
            tick_hz: 20.0,
        }
    }
}

impl MissionFile {
    /// Parse from TOML text and validate.
    pub fn parse(text: &str) -> Result<Self, CompanionError> {
        let file: MissionFile = toml::from_str(text)?;
        file.validate()?;
        Ok(file)
    }

    /// Load from a file path.
    pub fn load(path: &Path) -> Result<Self, CompanionError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<(), CompanionError> {
        if self.frame_width <= 0.0 || self.frame_height <= 0.0 {
            return Err(CompanionError::Config(
                "frame dimensions must be positive".into(),
            ));
        }
        if self.target_height_px <= 0.0 {
            return Err(CompanionError::Config(
                "target_height_px must be positive".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_battery_pct) {
            return Err(CompanionError::Config(
                "min_battery_pct must be between 0 and 100".into(),
            ));
        }
        if self.confirmation_frames == 0 {
            return Err(CompanionError::Config(
                "confirmation_frames must be at least 1".into(),
            ));
        }
        if self.output_min >= self.output_max
            || !(self.output_min..=self.output_max).contains(&self.neutral)
        {
            return Err(CompanionError::Config(
                "output range must contain the neutral value".into(),
            ));
        }
        if self.tick_hz <= 0.0 {
            return Err(CompanionError::Config("tick_hz must be positive".into()));
        }
        Ok(())
    }

    /// Frame geometry for the control law. The vertical-center setpoint
    /// is the middle of the frame.
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            width: self.frame_width,
            height: self.frame_height,
            target_height_px: self.target_height_px,
            vertical_center_px: self.frame_height / 2.0,
        }
    }

    /// Proportional gains for the control law.
    pub fn gains(&self) -> ControlGains {
        ControlGains {
            yaw_kp: self.yaw_kp,
            pitch_kp: self.pitch_kp,
            throttle_kp: self.throttle_kp,
            neutral: self.neutral,
            output_min: self.output_min,
            output_max: self.output_max,
        }
    }

    /// Thresholds for the state machine.
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            takeoff_altitude_m: self.takeoff_altitude_m,
            min_battery_fraction: self.min_battery_pct / 100.0,
            search_timeout_us: secs_to_us(self.search_timeout_s),
            grace_period_us: secs_to_us(self.grace_period_s),
            confirmation_frames: self.confirmation_frames,
            search_yaw: self.search_yaw,
            near_ground_altitude_m: self.near_ground_altitude_m,
        }
    }

    /// Tick interval for the driving loop.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f32(1.0 / self.tick_hz)
    }
}

fn secs_to_us(secs: f32) -> u64 {
    (secs as f64 * 1e6) as u64
}
