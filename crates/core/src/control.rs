//! Proportional control law
//!
//! Maps one detection plus the frame geometry into a rate command
//! triple. Pure, stateless, deterministic: the three output axes are
//! computed independently with no shared intermediate state.
//!
//! # Sign conventions
//!
//! - `yaw_error = center_x - width/2`: positive when the target is right
//!   of center, so yaw adds on top of neutral.
//! - `pitch_error = target_height - height`: positive when the target
//!   appears small (far away). Forward motion is commanded by values
//!   below neutral on the pitch channel, so the gain term is subtracted.
//! - `throttle_error = vertical_center - center_y`: positive when the
//!   target sits above the setpoint. Climb is commanded below neutral on
//!   the throttle channel, so this term is subtracted as well.

use crate::command::RateCommand;
use crate::config::{ControlGains, FrameGeometry};
use crate::perception::Detection;

/// Compute the rate command for one detection.
///
/// Each axis is independently saturated to the configured output range;
/// a non-finite result falls back to neutral.
pub fn steer(detection: &Detection, frame: &FrameGeometry, gains: &ControlGains) -> RateCommand {
    let (center_x, center_y) = detection.center();
    let height = detection.height();

    let yaw_error = center_x - frame.width / 2.0;
    let pitch_error = frame.target_height_px - height;
    let throttle_error = frame.vertical_center_px - center_y;

    RateCommand {
        pitch: saturate(gains.neutral - gains.pitch_kp * pitch_error, gains),
        yaw: saturate(gains.neutral + gains.yaw_kp * yaw_error, gains),
        throttle: saturate(gains.neutral - gains.throttle_kp * throttle_error, gains),
    }
}

/// Clamp an output to the configured command range, handling NaN and
/// infinity by falling back to neutral.
fn saturate(value: f32, gains: &ControlGains) -> f32 {
    if value.is_nan() || value.is_infinite() {
        gains.neutral
    } else {
        value.clamp(gains.output_min, gains.output_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (FrameGeometry, ControlGains) {
        (FrameGeometry::default(), ControlGains::default())
    }

    // ========== Setpoint Tests ==========

    #[test]
    fn test_centered_target_at_setpoint_is_neutral() {
        // bbox (270,165,370,315): height 150, center (320,240) - all
        // three errors are exactly zero.
        let (frame, gains) = defaults();
        let det = Detection::try_new(270.0, 165.0, 370.0, 315.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        assert!(
            (cmd.yaw - gains.neutral).abs() < 0.001,
            "yaw should be neutral, got {}",
            cmd.yaw
        );
        assert!(
            (cmd.pitch - gains.neutral).abs() < 0.001,
            "pitch should be neutral, got {}",
            cmd.pitch
        );
        assert!(
            (cmd.throttle - gains.neutral).abs() < 0.001,
            "throttle should be neutral, got {}",
            cmd.throttle
        );
    }

    #[test]
    fn test_target_right_of_center_turns_right() {
        // Same geometry shifted 100px right: center_x 420, yaw_error 100.
        let (frame, gains) = defaults();
        let det = Detection::try_new(370.0, 165.0, 470.0, 315.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        let expected = gains.neutral + gains.yaw_kp * 100.0;
        assert!(
            (cmd.yaw - expected).abs() < 0.001,
            "yaw should be neutral + Kyaw*100, got {}",
            cmd.yaw
        );
        assert!(cmd.yaw > gains.neutral, "yaw must exceed neutral");
        // The other axes are untouched by a pure horizontal shift.
        assert!((cmd.pitch - gains.neutral).abs() < 0.001);
        assert!((cmd.throttle - gains.neutral).abs() < 0.001);
    }

    #[test]
    fn test_target_left_of_center_turns_left() {
        let (frame, gains) = defaults();
        let det = Detection::try_new(170.0, 165.0, 270.0, 315.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        assert!(
            cmd.yaw < gains.neutral,
            "yaw should drop below neutral for a target left of center, got {}",
            cmd.yaw
        );
    }

    #[test]
    fn test_small_target_commands_forward() {
        // Box height 50 < setpoint 150: target appears far, pitch output
        // drops below neutral (forward).
        let (frame, gains) = defaults();
        let det = Detection::try_new(295.0, 215.0, 345.0, 265.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        let expected = gains.neutral - gains.pitch_kp * 100.0;
        assert!(
            (cmd.pitch - expected).abs() < 0.001,
            "pitch should be neutral - Kpitch*100, got {}",
            cmd.pitch
        );
    }

    #[test]
    fn test_high_target_commands_climb() {
        // Center_y 140, setpoint 240: throttle_error 100, output below
        // neutral (climb).
        let (frame, gains) = defaults();
        let det = Detection::try_new(270.0, 65.0, 370.0, 215.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        let expected = gains.neutral - gains.throttle_kp * 100.0;
        assert!(
            (cmd.throttle - expected).abs() < 0.001,
            "throttle should be neutral - Kthrottle*100, got {}",
            cmd.throttle
        );
    }

    // ========== Axis Independence ==========

    #[test]
    fn test_axes_are_independent() {
        // A target offset on all three axes produces the same per-axis
        // outputs as three targets offset on one axis each.
        let (frame, gains) = defaults();
        let combined = Detection::try_new(370.0, 65.0, 470.0, 165.0).unwrap();
        let horizontal = Detection::try_new(370.0, 190.0, 470.0, 290.0).unwrap();
        let vertical = Detection::try_new(270.0, 65.0, 370.0, 165.0).unwrap();

        let all = steer(&combined, &frame, &gains);
        assert!(
            (all.yaw - steer(&horizontal, &frame, &gains).yaw).abs() < 0.001,
            "yaw must depend only on horizontal center"
        );
        assert!(
            (all.throttle - steer(&vertical, &frame, &gains).throttle).abs() < 0.001,
            "throttle must depend only on vertical center"
        );
        assert!(
            (all.pitch - steer(&vertical, &frame, &gains).pitch).abs() < 0.001,
            "pitch must depend only on box height"
        );
    }

    #[test]
    fn test_deterministic() {
        let (frame, gains) = defaults();
        let det = Detection::try_new(100.0, 50.0, 400.0, 460.0).unwrap();
        assert_eq!(steer(&det, &frame, &gains), steer(&det, &frame, &gains));
    }

    // ========== Saturation ==========

    #[test]
    fn test_outputs_clamped_to_range() {
        // Absurd gains drive every axis far outside the channel range.
        let frame = FrameGeometry::default();
        let gains = ControlGains {
            yaw_kp: 100.0,
            pitch_kp: 100.0,
            throttle_kp: 100.0,
            ..ControlGains::default()
        };
        let det = Detection::try_new(600.0, 0.0, 640.0, 20.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        for (axis, value) in [("pitch", cmd.pitch), ("yaw", cmd.yaw), ("throttle", cmd.throttle)] {
            assert!(
                (gains.output_min..=gains.output_max).contains(&value),
                "{} out of range: {}",
                axis,
                value
            );
        }
    }

    #[test]
    fn test_non_finite_gain_falls_back_to_neutral() {
        let frame = FrameGeometry::default();
        let gains = ControlGains {
            yaw_kp: f32::NAN,
            ..ControlGains::default()
        };
        let det = Detection::try_new(0.0, 0.0, 100.0, 150.0).unwrap();

        let cmd = steer(&det, &frame, &gains);
        assert!(
            (cmd.yaw - gains.neutral).abs() < 0.001,
            "NaN output must fall back to neutral, got {}",
            cmd.yaw
        );
    }
}
