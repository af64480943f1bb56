use crate::landmarks::{CameraFacing, HandDetection, KEYPOINT_COUNT};

/// Width of one frame's feature record: x,y interleaved per keypoint.
pub const RECORD_WIDTH: usize = 2 * KEYPOINT_COUNT;

/// Fixed-width feature vector derived from one detection. Always exactly
/// 42 floats; missing trailing keypoints are zero-padded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord([f32; RECORD_WIDTH]);

impl FrameRecord {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// The (x, y) pair stored for keypoint `index`.
    pub fn pair(&self, index: usize) -> (f32, f32) {
        (self.0[2 * index], self.0[2 * index + 1])
    }
}

impl From<[f32; RECORD_WIDTH]> for FrameRecord {
    fn from(values: [f32; RECORD_WIDTH]) -> Self {
        Self(values)
    }
}

impl Default for FrameRecord {
    fn default() -> Self {
        Self([0.0; RECORD_WIDTH])
    }
}

/// Encode one detection as a frame record. Front-facing frames have each x
/// mirrored (`x -> 1 - x`) so handedness reads the same from either camera.
///
/// Pure function; callers branch on detection absence before getting here.
pub fn normalize(detection: &HandDetection, facing: CameraFacing) -> FrameRecord {
    let mut values = [0.0f32; RECORD_WIDTH];
    for (i, point) in detection.keypoints().iter().enumerate() {
        let x = match facing {
            CameraFacing::Front => 1.0 - point.x,
            CameraFacing::Back => point.x,
        };
        values[2 * i] = x;
        values[2 * i + 1] = point.y;
    }
    FrameRecord(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Keypoint;

    fn detection_of(points: Vec<Keypoint>) -> HandDetection {
        HandDetection::from_keypoints(points).unwrap()
    }

    fn full_detection(x: f32, y: f32) -> HandDetection {
        detection_of(vec![Keypoint::new(x, y, 0.0); KEYPOINT_COUNT])
    }

    #[test]
    fn record_is_always_42_wide() {
        let record = normalize(&full_detection(0.5, 0.5), CameraFacing::Back);
        assert_eq!(record.as_slice().len(), RECORD_WIDTH);
    }

    #[test]
    fn partial_detection_zero_pads_the_tail() {
        let record = normalize(
            &detection_of(vec![Keypoint::new(0.3, 0.7, 0.0); 5]),
            CameraFacing::Back,
        );
        for i in 0..5 {
            assert_eq!(record.pair(i), (0.3, 0.7));
        }
        for &v in &record.as_slice()[10..] {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn front_facing_mirrors_x_only() {
        let detection = detection_of(
            (0..KEYPOINT_COUNT)
                .map(|i| Keypoint::new(i as f32 / 21.0, 0.4, 0.0))
                .collect(),
        );
        let front = normalize(&detection, CameraFacing::Front);
        let back = normalize(&detection, CameraFacing::Back);
        for i in 0..KEYPOINT_COUNT {
            let (fx, fy) = front.pair(i);
            let (bx, by) = back.pair(i);
            assert!((fx - (1.0 - bx)).abs() < 1e-6);
            assert_eq!(fy, by);
        }
    }

    #[test]
    fn identical_points_produce_uniform_record() {
        let record = normalize(&full_detection(0.5, 0.5), CameraFacing::Back);
        assert!(record.as_slice().iter().all(|&v| v == 0.5));
    }
}
