use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("keypoint index {0} out of range (expected 0..21)")]
    KeypointIndexOutOfRange(usize),

    #[error("duplicate keypoint index {0} in detection payload")]
    DuplicateKeypoint(usize),

    #[error("detection carries {0} keypoints, more than the 21-point hand topology")]
    TooManyKeypoints(usize),

    #[error("label table key {key:?} is not an integer class index")]
    InvalidLabelKey { key: String },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("model declares feature width {width}, narrower than a {record} float record")]
    FeatureWidthTooSmall { width: usize, record: usize },

    #[error("model returned an empty output tensor")]
    EmptyModelOutput,

    #[error(transparent)]
    Model(#[from] ort::Error),
}
