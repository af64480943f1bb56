use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::classifier::DEFAULT_FEATURE_WIDTH;
use crate::error::{Error, Result};
use crate::landmarks::CameraFacing;

/// Pipeline configuration. Defaults match the shipped model artifact;
/// a JSON file can override individual fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Which camera feeds the detector; front-facing frames get mirrored.
    pub facing: CameraFacing,
    /// ONNX gesture model artifact.
    pub model_path: PathBuf,
    /// Class-index -> label JSON asset.
    pub label_path: PathBuf,
    /// Feature width the model was trained on.
    pub feature_width: usize,
    /// Capacity of the detection channel feeding the session loop.
    pub detection_capacity: usize,
    /// Capacity of the gesture-update channel to the presentation bridge.
    pub update_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Back,
            model_path: PathBuf::from("assets/gestura.onnx"),
            label_path: PathBuf::from("assets/labels.json"),
            feature_width: DEFAULT_FEATURE_WIDTH,
            detection_capacity: 32,
            update_capacity: 32,
        }
    }
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_shipped_artifact() {
        let config = PipelineConfig::default();
        assert_eq!(config.facing, CameraFacing::Back);
        assert_eq!(config.feature_width, DEFAULT_FEATURE_WIDTH);
    }

    #[test]
    fn partial_json_overrides_keep_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"facing": "front", "feature_width": 42}"#).unwrap();
        assert_eq!(config.facing, CameraFacing::Front);
        assert_eq!(config.feature_width, 42);
        assert_eq!(config.update_capacity, 32);
    }
}
