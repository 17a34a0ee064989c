//! skytrail_companion - Companion-computer runtime for skytrail
//!
//! Hosts everything around the core decision logic: the adapter
//! boundaries for perception, vehicle actuation, and operator input,
//! simulator implementations of all three, mission configuration
//! loading, and the tick driver that runs the control loop.
//!
//! The adapters present synchronous, non-blocking calls to the core.
//! They may thread internally (the keyboard reader does), but one tick
//! is always one detection fetch, one telemetry read, one state-machine
//! step, and one directive dispatch, strictly in that order.

pub mod config;
pub mod error;
pub mod operator;
pub mod runner;
pub mod vehicle;
pub mod vision;

pub use config::MissionFile;
pub use error::CompanionError;
pub use operator::{KeyboardOperator, OperatorInput, QueuedOperator};
pub use runner::{MissionReport, MissionRunner, MonotonicClock};
pub use vehicle::{FlightMode, SimVehicle, SimVehicleConfig, VehicleLink};
pub use vision::{select_largest, DetectionSource, RawBox, ScriptedVision};
