use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of keypoints in the 21-point hand topology the detector emits.
pub const KEYPOINT_COUNT: usize = 21;

/// Named indices of the 21-point hand topology (wrist first, then four
/// joints per finger from the base outward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandKeypoint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

/// Bone segments between keypoints, for the skeleton overlay drawn by the
/// presentation layer. Not consumed by the classification core itself.
pub const HAND_CONNECTIONS: [(usize, usize); 20] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (0, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (0, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// One landmark, coordinates normalized to frame dimensions by the detector.
/// `z` is carried for overlay consumers but unused by the feature encoding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to pixel coordinates for a given frame size.
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

/// Which camera the frames come from. Front-facing (selfie) frames are
/// horizontally mirrored by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    Back,
}

/// One hand's keypoints, ordered by keypoint index. May be partial: a
/// malformed detection with fewer than 21 points is carried as-is and
/// zero-padded by the normalizer rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    keypoints: Vec<Keypoint>,
}

impl HandDetection {
    /// Build from keypoints already in index order.
    pub fn from_keypoints(keypoints: Vec<Keypoint>) -> Result<Self> {
        if keypoints.len() > KEYPOINT_COUNT {
            return Err(Error::TooManyKeypoints(keypoints.len()));
        }
        Ok(Self { keypoints })
    }

    /// Build from the detector's index-keyed payload. Indices are bounds
    /// checked and the points sorted by index, so delivery order does not
    /// matter (the wire payload is a string-keyed map).
    pub fn from_indexed<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, Keypoint)>,
    {
        let mut slots: [Option<Keypoint>; KEYPOINT_COUNT] = [None; KEYPOINT_COUNT];
        for (index, point) in pairs {
            if index >= KEYPOINT_COUNT {
                return Err(Error::KeypointIndexOutOfRange(index));
            }
            if slots[index].replace(point).is_some() {
                return Err(Error::DuplicateKeypoint(index));
            }
        }
        let keypoints = slots.into_iter().flatten().collect();
        Ok(Self { keypoints })
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn get(&self, index: HandKeypoint) -> Option<&Keypoint> {
        self.keypoints.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// True when all 21 keypoints were reported.
    pub fn is_complete(&self) -> bool {
        self.keypoints.len() == KEYPOINT_COUNT
    }
}

/// Per-frame detector output: absent, or one hand.
pub type Detection = Option<HandDetection>;
