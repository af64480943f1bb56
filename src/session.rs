use tracing::warn;

use crate::classifier::NO_CLASS;
use crate::error::Error;
use crate::labels::LabelTable;
use crate::landmarks::{CameraFacing, HandDetection};
use crate::normalize::{normalize, FrameRecord};
use crate::window::SlidingWindow;

/// What the presentation bridge sees: one update per detection event, plus
/// one when a classification resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureUpdate {
    pub label: Option<String>,
    pub hand_detected: bool,
}

/// A full window on its way to the inference worker.
#[derive(Debug)]
pub struct InferenceRequest {
    pub frames: Vec<FrameRecord>,
}

/// Interpreted classifier output. `index == NO_CLASS` (and inference
/// failures, which collapse into it) mean "no result".
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub index: i64,
    pub label: Option<String>,
}

#[derive(Debug)]
pub struct DetectionOutcome {
    pub update: GestureUpdate,
    pub request: Option<InferenceRequest>,
}

#[derive(Debug)]
pub struct InferenceOutcome {
    pub result: ClassificationResult,
    pub update: GestureUpdate,
    pub request: Option<InferenceRequest>,
}

/// The inference trigger: a two-state machine (collecting / classifying)
/// owning the window, the in-flight guard, and the label table. One
/// instance per active camera session; all mutation happens on the single
/// consumption loop that feeds it.
///
/// While an inference is outstanding, new frames keep collecting into a
/// fresh window. A window that fills during that time is parked in a
/// depth-1 slot and dispatched when the outstanding inference resolves, so
/// at most one inference is ever in flight.
pub struct GestureSession {
    window: SlidingWindow,
    pending: Option<Vec<FrameRecord>>,
    in_flight: bool,
    labels: LabelTable,
    facing: CameraFacing,
    last_label: Option<String>,
    hand_visible: bool,
}

impl GestureSession {
    pub fn new(labels: LabelTable, facing: CameraFacing) -> Self {
        Self {
            window: SlidingWindow::new(),
            pending: None,
            in_flight: false,
            labels,
            facing,
            last_label: None,
            hand_visible: false,
        }
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feed one detection event through the state machine.
    pub fn on_detection(&mut self, detection: Option<&HandDetection>) -> DetectionOutcome {
        let Some(hand) = detection else {
            // A detection gap clears the displayed label but keeps the
            // partially filled window; collection resumes where it left off.
            self.hand_visible = false;
            self.last_label = None;
            return DetectionOutcome {
                update: self.update(),
                request: None,
            };
        };

        self.hand_visible = true;
        let record = normalize(hand, self.facing);
        let full = self.window.push(record);
        let request = if full {
            let frames = self.window.take_frames();
            self.dispatch(frames)
        } else {
            None
        };

        DetectionOutcome {
            update: self.update(),
            request,
        }
    }

    /// Feed the worker's reply back in. Failures are absorbed here: logged,
    /// collapsed into "no result", never propagated to the bridge. Whatever
    /// happened, the in-flight slot is freed and a parked window (if any)
    /// is dispatched next.
    pub fn on_inference_result(
        &mut self,
        outcome: Result<i64, Error>,
    ) -> InferenceOutcome {
        self.in_flight = false;

        let result = match outcome {
            Ok(index) => {
                let label = self.labels.resolve(index).map(str::to_owned);
                if index != NO_CLASS {
                    // A confident class always overwrites the displayed
                    // label, even when the table has no entry for it.
                    self.last_label = label.clone();
                }
                ClassificationResult { index, label }
            }
            Err(error) => {
                warn!(%error, "classification failed, treating as no result");
                ClassificationResult {
                    index: NO_CLASS,
                    label: None,
                }
            }
        };

        let request = match self.pending.take() {
            Some(frames) => self.dispatch(frames),
            None => None,
        };

        InferenceOutcome {
            result,
            update: self.update(),
            request,
        }
    }

    fn dispatch(&mut self, frames: Vec<FrameRecord>) -> Option<InferenceRequest> {
        if self.in_flight {
            // Depth-1 queue; newest window wins.
            if self.pending.replace(frames).is_some() {
                warn!("inference backlog, replacing parked window");
            }
            None
        } else {
            self.in_flight = true;
            Some(InferenceRequest { frames })
        }
    }

    fn update(&self) -> GestureUpdate {
        GestureUpdate {
            label: self.last_label.clone(),
            hand_detected: self.hand_visible,
        }
    }
}
