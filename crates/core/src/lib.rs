//! skytrail_core - Pure no_std tracking logic for the skytrail companion
//!
//! This crate contains the platform-agnostic decision logic that turns
//! per-frame detections and vehicle telemetry into actuator directives.
//! It can be tested on host without any runtime dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies outside of tests
//! - **Single owner**: `Tracker` exclusively owns the mission phase;
//!   adapters never touch it
//!
//! # Modules
//!
//! - [`clock`]: Monotonic time abstraction (Clock trait, ManualClock)
//! - [`command`]: Actuator directives and operator commands
//! - [`config`]: Immutable frame geometry, gains, and tracker thresholds
//! - [`control`]: Proportional control law (bounding box -> rate triple)
//! - [`perception`]: Detection bounding boxes and per-tick observations
//! - [`telemetry`]: Vehicle telemetry snapshot
//! - [`tracker`]: The tracking state machine

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod command;
pub mod config;
pub mod control;
pub mod perception;
pub mod telemetry;
pub mod tracker;

pub use clock::{Clock, ManualClock};
pub use command::{Directive, OperatorCommand, RateCommand};
pub use config::{ControlGains, FrameGeometry, TrackerConfig};
pub use perception::{Detection, GeometryError, Observation};
pub use telemetry::Telemetry;
pub use tracker::{Phase, TickInput, Tracker};
