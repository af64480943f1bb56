//! Simulation mode: a synthetic hand source and a stand-in classifier,
//! used by the demo binary when the real model artifact is missing and by
//! the integration tests.

use ndarray::Array3;

use crate::classifier::{SequenceModel, DEFAULT_FEATURE_WIDTH, NO_CLASS};
use crate::error::Result;
use crate::labels::LabelTable;
use crate::landmarks::{Detection, HandDetection, Keypoint, KEYPOINT_COUNT};

/// Deterministic synthetic detections: the palm center orbits slowly while
/// the keypoints fan out around it. Optionally drops every n-th frame to
/// exercise the detection-gap path.
pub struct SimulatedHandSource {
    tick: u64,
    dropout_every: Option<u64>,
}

impl SimulatedHandSource {
    pub fn new() -> Self {
        Self {
            tick: 0,
            dropout_every: None,
        }
    }

    pub fn with_dropout_every(n: u64) -> Self {
        Self {
            tick: 0,
            dropout_every: Some(n.max(1)),
        }
    }

    pub fn next_detection(&mut self) -> Detection {
        self.tick += 1;
        if let Some(n) = self.dropout_every {
            if self.tick % n == 0 {
                return None;
            }
        }

        let t = self.tick as f32 * 0.033;
        let cx = 0.5 + 0.15 * (t * 0.5).cos();
        let cy = 0.5 + 0.1 * t.sin();

        let points = (0..KEYPOINT_COUNT)
            .map(|i| {
                let spread = i as f32 / KEYPOINT_COUNT as f32;
                let angle = spread * std::f32::consts::TAU + t * 0.3;
                Keypoint::new(
                    (cx + 0.08 * spread * angle.cos()).clamp(0.0, 1.0),
                    (cy + 0.08 * spread * angle.sin()).clamp(0.0, 1.0),
                    0.0,
                )
            })
            .collect();

        Some(HandDetection::from_keypoints(points).expect("within the 21-point topology"))
    }
}

impl Default for SimulatedHandSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in classifier: cycles through the class indices one call at a
/// time. Shape-compatible with the real model so the adapter path is
/// identical.
pub struct SimulatedModel {
    classes: i64,
    calls: u64,
}

impl SimulatedModel {
    pub fn new(classes: usize) -> Self {
        Self {
            classes: classes as i64,
            calls: 0,
        }
    }
}

impl SequenceModel for SimulatedModel {
    fn feature_width(&self) -> usize {
        DEFAULT_FEATURE_WIDTH
    }

    fn infer(&mut self, input: Array3<f32>) -> Result<i64> {
        debug_assert_eq!(input.shape()[2], DEFAULT_FEATURE_WIDTH);
        if self.classes == 0 {
            return Ok(NO_CLASS);
        }
        let index = (self.calls as i64) % self.classes;
        self.calls += 1;
        Ok(index)
    }
}

/// Built-in label table for simulation mode, mirroring the bundled asset.
pub fn demo_labels() -> LabelTable {
    LabelTable::from_entries(
        [
            "hello", "thanks", "yes", "no", "please", "sorry", "help", "good", "bad", "love",
        ]
        .into_iter()
        .enumerate()
        .map(|(i, label)| (i as i64, label.to_owned())),
    )
}
