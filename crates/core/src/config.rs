//! Immutable configuration for the control law and state machine
//!
//! All values are load-once with process lifetime. They are passed
//! explicitly into the tracker constructor, never read from ambient
//! global state, so the state machine stays testable with synthetic
//! configurations.

/// Camera frame geometry and tracking setpoints.
#[derive(Debug, Clone, Copy)]
pub struct FrameGeometry {
    /// Frame width in pixels (> 0)
    pub width: f32,
    /// Frame height in pixels (> 0)
    pub height: f32,
    /// Desired target bounding-box height in pixels (distance setpoint)
    pub target_height_px: f32,
    /// Desired vertical position of the target center in pixels
    pub vertical_center_px: f32,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            target_height_px: 150.0,
            vertical_center_px: 240.0,
        }
    }
}

/// Proportional gains and output range for the control law.
///
/// Every output axis is saturated to `[output_min, output_max]`; the
/// range defaults to the full RC channel span around neutral.
#[derive(Debug, Clone, Copy)]
pub struct ControlGains {
    /// Turn-rate gain per pixel of horizontal error
    pub yaw_kp: f32,
    /// Forward/back gain per pixel of box-height error
    pub pitch_kp: f32,
    /// Vertical gain per pixel of vertical-center error
    pub throttle_kp: f32,
    /// Neutral command value (hover on all axes)
    pub neutral: f32,
    /// Lower saturation bound for each output axis
    pub output_min: f32,
    /// Upper saturation bound for each output axis
    pub output_max: f32,
}

impl Default for ControlGains {
    fn default() -> Self {
        Self {
            yaw_kp: 0.005,
            pitch_kp: 0.008,
            throttle_kp: 0.006,
            neutral: 1500.0,
            output_min: 1000.0,
            output_max: 2000.0,
        }
    }
}

/// Thresholds and timeouts for the tracking state machine.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Commanded takeoff altitude in meters; searching starts at 95%
    pub takeoff_altitude_m: f32,
    /// Battery fraction below which return-to-launch is forced
    pub min_battery_fraction: f32,
    /// Give up searching and return home after this long
    pub search_timeout_us: u64,
    /// Tolerated target-loss window before reverting to search
    pub grace_period_us: u64,
    /// Consecutive detection ticks required to confirm a target
    pub confirmation_frames: u32,
    /// Yaw command for the slow search turn
    pub search_yaw: f32,
    /// Altitude below which return-home hands over to landing
    pub near_ground_altitude_m: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            takeoff_altitude_m: 5.0,
            min_battery_fraction: 0.20,
            search_timeout_us: 60_000_000,
            grace_period_us: 3_000_000,
            confirmation_frames: 5,
            search_yaw: 1550.0,
            near_ground_altitude_m: 1.0,
        }
    }
}
