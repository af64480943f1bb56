use std::path::Path;

use ndarray::Array3;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use crate::error::{Error, Result};
use crate::normalize::{FrameRecord, RECORD_WIDTH};
use crate::window::{flatten_records, WINDOW_LEN};

/// Class index the model emits when no gesture is recognized.
pub const NO_CLASS: i64 = -1;

/// Feature width of the shipped gesture model. The model was trained on
/// 84-wide rows; a single hand fills the first 42 slots and the rest stay
/// zero.
pub const DEFAULT_FEATURE_WIDTH: usize = 84;

/// The sequence classifier, behind a trait so the state machine never
/// depends on a concrete runtime. Input is a `[1, WINDOW_LEN, W]` tensor
/// where `W` is `feature_width()`; output is a class index, `NO_CLASS`
/// when the model is not confident.
pub trait SequenceModel: Send {
    fn feature_width(&self) -> usize;

    fn infer(&mut self, input: Array3<f32>) -> Result<i64>;
}

impl SequenceModel for Box<dyn SequenceModel + Send> {
    fn feature_width(&self) -> usize {
        (**self).feature_width()
    }

    fn infer(&mut self, input: Array3<f32>) -> Result<i64> {
        (**self).infer(input)
    }
}

/// ONNX-backed gesture model. The artifact is opaque to this crate; only
/// its tensor shapes matter here.
pub struct OnnxSequenceModel {
    session: Session,
    feature_width: usize,
}

impl OnnxSequenceModel {
    pub fn new<P: AsRef<Path>>(model_path: P, feature_width: usize) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())?;
        Ok(Self {
            session,
            feature_width,
        })
    }
}

impl SequenceModel for OnnxSequenceModel {
    fn feature_width(&self) -> usize {
        self.feature_width
    }

    fn infer(&mut self, input: Array3<f32>) -> Result<i64> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (_shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let first = data.first().copied().ok_or(Error::EmptyModelOutput)?;
        Ok(first.floor() as i64)
    }
}

/// Largest absolute value in the flattened window; the scaling divisor.
pub fn max_abs(values: &[f32]) -> f32 {
    values.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
}

/// Feature scaling and tensor assembly around a [`SequenceModel`].
pub struct ClassifierAdapter<M> {
    model: M,
}

impl<M: SequenceModel> ClassifierAdapter<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn feature_width(&self) -> usize {
        self.model.feature_width()
    }

    /// Scale a full window and run the model over it.
    ///
    /// Every element is divided by the window's maximum absolute value
    /// (1.0 when the window is all zeros), so inputs land in [-1, 1]. Each
    /// 42-float record becomes one tensor row, zero-padded to the model's
    /// feature width.
    pub fn classify(&mut self, frames: &[FrameRecord]) -> Result<i64> {
        debug_assert_eq!(frames.len(), WINDOW_LEN, "classify of a partial window");
        let width = self.model.feature_width();
        if width < RECORD_WIDTH {
            return Err(Error::FeatureWidthTooSmall {
                width,
                record: RECORD_WIDTH,
            });
        }

        let flat = flatten_records(frames);
        let scale = max_abs(&flat);
        let divisor = if scale == 0.0 { 1.0 } else { scale };

        let mut input = Array3::<f32>::zeros((1, frames.len(), width));
        for (t, record) in frames.iter().enumerate() {
            for (i, value) in record.as_slice().iter().enumerate() {
                input[[0, t, i]] = value / divisor;
            }
        }

        let index = self.model.infer(input)?;
        debug!(index, divisor, "window classified");
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Captures the scaled tensor and replies with a fixed index.
    struct CaptureModel {
        width: usize,
        reply: i64,
        last_input: Option<Array3<f32>>,
    }

    impl SequenceModel for CaptureModel {
        fn feature_width(&self) -> usize {
            self.width
        }

        fn infer(&mut self, input: Array3<f32>) -> Result<i64> {
            self.last_input = Some(input);
            Ok(self.reply)
        }
    }

    fn capture(width: usize) -> ClassifierAdapter<CaptureModel> {
        ClassifierAdapter::new(CaptureModel {
            width,
            reply: 3,
            last_input: None,
        })
    }

    fn window_of(fill: f32) -> Vec<FrameRecord> {
        vec![FrameRecord::from([fill; RECORD_WIDTH]); WINDOW_LEN]
    }

    #[test]
    fn max_abs_ignores_sign() {
        assert_eq!(max_abs(&[0.2, -0.9, 0.5]), 0.9);
        assert_eq!(max_abs(&[]), 0.0);
    }

    #[test]
    fn uniform_half_window_scales_to_ones() {
        let mut adapter = capture(84);
        let index = adapter.classify(&window_of(0.5)).unwrap();
        assert_eq!(index, 3);

        let input = adapter.model.last_input.take().unwrap();
        assert_eq!(input.shape(), &[1, WINDOW_LEN, 84]);
        for t in 0..WINDOW_LEN {
            for i in 0..RECORD_WIDTH {
                assert_eq!(input[[0, t, i]], 1.0);
            }
            for i in RECORD_WIDTH..84 {
                assert_eq!(input[[0, t, i]], 0.0);
            }
        }
    }

    #[test]
    fn all_zero_window_divides_by_one() {
        let mut adapter = capture(84);
        adapter.classify(&window_of(0.0)).unwrap();
        let input = adapter.model.last_input.take().unwrap();
        assert!(input.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn scaled_values_stay_within_unit_range() {
        let mut frames = window_of(0.25);
        frames[7] = FrameRecord::from([-0.8; RECORD_WIDTH]);
        let mut adapter = capture(84);
        adapter.classify(&frames).unwrap();
        let input = adapter.model.last_input.take().unwrap();
        assert!(input.iter().all(|&v| (-1.0..=1.0).contains(&v)));
        // The dominant record pins the scale.
        assert_eq!(input[[0, 7, 0]], -1.0);
    }

    #[test]
    fn record_width_tensor_has_no_padding() {
        let mut adapter = capture(RECORD_WIDTH);
        adapter.classify(&window_of(0.5)).unwrap();
        let input = adapter.model.last_input.take().unwrap();
        assert_eq!(input.shape(), &[1, WINDOW_LEN, RECORD_WIDTH]);
    }

    #[test]
    fn narrow_model_is_rejected() {
        let mut adapter = capture(10);
        let err = adapter.classify(&window_of(0.5)).unwrap_err();
        assert!(matches!(err, Error::FeatureWidthTooSmall { width: 10, .. }));
    }
}
