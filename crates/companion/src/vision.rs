//! Perception adapter boundary
//!
//! The real system runs camera capture plus a person detector behind
//! this trait; the repo ships a scripted stand-in. Either way the
//! contract is the same: one `Observation` per tick, confidence already
//! thresholded, bounding boxes validated here so degenerate geometry
//! never reaches the control law.

use skytrail_core::{Detection, Observation};
use tracing::warn;

/// Per-tick detection fetch.
///
/// Must be non-blocking within the tick budget: return the latest
/// available result, `Observation::Clear` when the frame held no
/// target, and `Observation::FrameLoss` when frame acquisition itself
/// failed. FrameLoss triggers an immediate landing in the core.
pub trait DetectionSource {
    fn fetch(&mut self) -> Observation;
}

/// Raw candidate box as reported by a detector, before validation.
#[derive(Debug, Clone, Copy)]
pub struct RawBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

/// Validate candidates and pick the largest-area box.
///
/// When the detector reports several people the largest box is the
/// closest target and wins. A box that fails validation is a contract
/// violation by the detector: it is logged and skipped rather than
/// forwarded.
pub fn select_largest(candidates: &[RawBox]) -> Option<Detection> {
    let mut best: Option<Detection> = None;
    for raw in candidates {
        let det = match Detection::try_new(raw.xmin, raw.ymin, raw.xmax, raw.ymax) {
            Ok(det) => det,
            Err(err) => {
                warn!(?raw, %err, "detector reported a degenerate box, skipping");
                continue;
            }
        };
        if best.map_or(true, |b| det.area() > b.area()) {
            best = Some(det);
        }
    }
    best
}

/// Scripted detection source for tests and the demo binary.
///
/// Plays back a fixed sequence of observations, one per `fetch()`. Once
/// the script is exhausted it keeps returning the configured tail
/// observation (default `Clear`), so a short script can describe a long
/// mission.
pub struct ScriptedVision {
    script: std::vec::IntoIter<Observation>,
    tail: Observation,
}

impl ScriptedVision {
    pub fn new(script: Vec<Observation>) -> Self {
        Self {
            script: script.into_iter(),
            tail: Observation::Clear,
        }
    }

    /// Observation returned after the script runs out.
    pub fn with_tail(mut self, tail: Observation) -> Self {
        self.tail = tail;
        self
    }
}

impl DetectionSource for ScriptedVision {
    fn fetch(&mut self) -> Observation {
        self.script.next().unwrap_or(self.tail)
    }
}
