//! Detection bounding boxes and per-tick observations
//!
//! The perception adapter reports one of three things every tick: a target
//! with a validated bounding box, an empty frame, or a frame acquisition
//! failure. Frame failure is deliberately distinct from "no detection" -
//! it is the highest-priority safety input of the state machine.

use core::fmt;

/// Error returned when a reported bounding box violates the adapter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// `xmax <= xmin`: zero or negative width
    DegenerateWidth,
    /// `ymax <= ymin`: zero or negative height
    DegenerateHeight,
    /// A coordinate is NaN or infinite
    NonFinite,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::DegenerateWidth => write!(f, "bounding box has non-positive width"),
            GeometryError::DegenerateHeight => write!(f, "bounding box has non-positive height"),
            GeometryError::NonFinite => write!(f, "bounding box coordinate is not finite"),
        }
    }
}

/// A single target bounding box in frame pixel coordinates.
///
/// Confidence thresholding happens upstream in the perception adapter;
/// a `Detection` that reaches the core is already above threshold and
/// geometrically valid (`xmax > xmin`, `ymax > ymin`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    xmin: f32,
    ymin: f32,
    xmax: f32,
    ymax: f32,
}

impl Detection {
    /// Validate and build a detection from raw adapter output.
    ///
    /// Degenerate geometry is a contract violation by the perception
    /// adapter and must be rejected here, before the control law ever
    /// sees the box.
    pub fn try_new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Result<Self, GeometryError> {
        if !(xmin.is_finite() && ymin.is_finite() && xmax.is_finite() && ymax.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if xmax <= xmin {
            return Err(GeometryError::DegenerateWidth);
        }
        if ymax <= ymin {
            return Err(GeometryError::DegenerateHeight);
        }
        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    pub fn xmin(&self) -> f32 {
        self.xmin
    }

    pub fn ymin(&self) -> f32 {
        self.ymin
    }

    pub fn xmax(&self) -> f32 {
        self.xmax
    }

    pub fn ymax(&self) -> f32 {
        self.ymax
    }

    /// Box width in pixels (always positive).
    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    /// Box height in pixels (always positive).
    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    /// Box center `(x, y)` in pixels.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Box area in square pixels, used to pick the largest candidate
    /// when the detector reports several.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

/// What the perception adapter produced this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// A valid target bounding box
    Target(Detection),
    /// Frame acquired, no target above threshold
    Clear,
    /// Frame acquisition failed (camera fault, stream lost)
    FrameLoss,
}

impl Observation {
    /// The detection, if this tick produced one.
    pub fn detection(&self) -> Option<Detection> {
        match self {
            Observation::Target(det) => Some(*det),
            Observation::Clear | Observation::FrameLoss => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_box_accepted() {
        let det = Detection::try_new(270.0, 165.0, 370.0, 315.0).unwrap();
        assert!((det.width() - 100.0).abs() < 0.001);
        assert!((det.height() - 150.0).abs() < 0.001);
        assert!((det.area() - 15000.0).abs() < 0.001);

        let (cx, cy) = det.center();
        assert!((cx - 320.0).abs() < 0.001);
        assert!((cy - 240.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_width_rejected() {
        assert_eq!(
            Detection::try_new(100.0, 0.0, 100.0, 50.0),
            Err(GeometryError::DegenerateWidth)
        );
        assert_eq!(
            Detection::try_new(100.0, 0.0, 90.0, 50.0),
            Err(GeometryError::DegenerateWidth)
        );
    }

    #[test]
    fn test_degenerate_height_rejected() {
        assert_eq!(
            Detection::try_new(0.0, 50.0, 100.0, 50.0),
            Err(GeometryError::DegenerateHeight)
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            Detection::try_new(f32::NAN, 0.0, 100.0, 50.0),
            Err(GeometryError::NonFinite)
        );
        assert_eq!(
            Detection::try_new(0.0, 0.0, f32::INFINITY, 50.0),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn test_observation_detection_accessor() {
        let det = Detection::try_new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(Observation::Target(det).detection(), Some(det));
        assert_eq!(Observation::Clear.detection(), None);
        assert_eq!(Observation::FrameLoss.detection(), None);
    }
}
