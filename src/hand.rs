use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};

/// Number of keypoints reported per hand by the landmark provider
pub const KEYPOINT_COUNT: usize = 21;

/// Normalized 2D keypoint in `[0,1]x[0,1]`, y increasing downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Check the keypoint is finite and within the normalized range.
    /// A small overshoot tolerance is allowed since providers report
    /// points slightly outside the frame during fast motion.
    pub fn is_valid(&self) -> bool {
        const TOLERANCE: f32 = 0.25;
        self.x.is_finite()
            && self.y.is_finite()
            && self.x >= -TOLERANCE
            && self.x <= 1.0 + TOLERANCE
            && self.y >= -TOLERANCE
            && self.y <= 1.0 + TOLERANCE
    }
}

/// Named hand joint identifiers, fixed by anatomical convention.
///
/// The discriminant is the index into a [`Hand`]'s keypoint array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum HandJoint {
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

impl HandJoint {
    /// Index of this joint in the keypoint array
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Skeleton connections between joints, used for overlay rendering
pub const HAND_SKELETON: [(HandJoint, HandJoint); 20] = [
    (HandJoint::Wrist, HandJoint::ThumbCmc),
    (HandJoint::ThumbCmc, HandJoint::ThumbMcp),
    (HandJoint::ThumbMcp, HandJoint::ThumbIp),
    (HandJoint::ThumbIp, HandJoint::ThumbTip),
    (HandJoint::Wrist, HandJoint::IndexMcp),
    (HandJoint::IndexMcp, HandJoint::IndexPip),
    (HandJoint::IndexPip, HandJoint::IndexDip),
    (HandJoint::IndexDip, HandJoint::IndexTip),
    (HandJoint::Wrist, HandJoint::MiddleMcp),
    (HandJoint::MiddleMcp, HandJoint::MiddlePip),
    (HandJoint::MiddlePip, HandJoint::MiddleDip),
    (HandJoint::MiddleDip, HandJoint::MiddleTip),
    (HandJoint::Wrist, HandJoint::RingMcp),
    (HandJoint::RingMcp, HandJoint::RingPip),
    (HandJoint::RingPip, HandJoint::RingDip),
    (HandJoint::RingDip, HandJoint::RingTip),
    (HandJoint::Wrist, HandJoint::PinkyMcp),
    (HandJoint::PinkyMcp, HandJoint::PinkyPip),
    (HandJoint::PinkyPip, HandJoint::PinkyDip),
    (HandJoint::PinkyDip, HandJoint::PinkyTip),
];

/// One detected hand: an ordered set of exactly 21 normalized keypoints.
///
/// Produced once per frame by the landmark provider, immutable after
/// creation and discarded after classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    keypoints: [Keypoint; KEYPOINT_COUNT],
}

impl Hand {
    /// Build a hand from a keypoint slice, validating count and ranges
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Result<Self, ClassifierError> {
        if keypoints.len() != KEYPOINT_COUNT {
            return Err(ClassifierError::WrongKeypointCount {
                count: keypoints.len(),
            });
        }

        for (index, point) in keypoints.iter().enumerate() {
            if !point.is_valid() {
                return Err(ClassifierError::InvalidKeypoint {
                    joint: index,
                    x: point.x,
                    y: point.y,
                });
            }
        }

        let mut array = [Keypoint::new(0.0, 0.0); KEYPOINT_COUNT];
        array.copy_from_slice(keypoints);
        Ok(Self { keypoints: array })
    }

    /// Get the keypoint for a named joint
    pub fn joint(&self, joint: HandJoint) -> Keypoint {
        self.keypoints[joint.index()]
    }

    /// All keypoints in index order
    pub fn keypoints(&self) -> &[Keypoint; KEYPOINT_COUNT] {
        &self.keypoints
    }

    /// Mirror the hand horizontally (x -> 1 - x); y values are untouched
    pub fn mirrored(&self) -> Self {
        let mut keypoints = self.keypoints;
        for point in keypoints.iter_mut() {
            point.x = 1.0 - point.x;
        }
        Self { keypoints }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand() -> Vec<Keypoint> {
        (0..KEYPOINT_COUNT)
            .map(|i| Keypoint::new(i as f32 / 21.0, 0.5))
            .collect()
    }

    #[test]
    fn test_hand_from_valid_keypoints() {
        let hand = Hand::from_keypoints(&flat_hand()).unwrap();
        assert_eq!(hand.joint(HandJoint::Wrist).y, 0.5);
        assert_eq!(hand.joint(HandJoint::PinkyTip).y, 0.5);
    }

    #[test]
    fn test_hand_rejects_wrong_count() {
        let points = vec![Keypoint::new(0.5, 0.5); 20];
        match Hand::from_keypoints(&points) {
            Err(ClassifierError::WrongKeypointCount { count }) => assert_eq!(count, 20),
            other => panic!("Expected WrongKeypointCount, got {:?}", other),
        }
    }

    #[test]
    fn test_hand_rejects_nan_keypoint() {
        let mut points = flat_hand();
        points[4] = Keypoint::new(f32::NAN, 0.5);
        match Hand::from_keypoints(&points) {
            Err(ClassifierError::InvalidKeypoint { joint, .. }) => assert_eq!(joint, 4),
            other => panic!("Expected InvalidKeypoint, got {:?}", other),
        }
    }

    #[test]
    fn test_hand_rejects_far_out_of_range() {
        let mut points = flat_hand();
        points[10] = Keypoint::new(3.0, 0.5);
        assert!(Hand::from_keypoints(&points).is_err());
    }

    #[test]
    fn test_slight_overshoot_is_tolerated() {
        let mut points = flat_hand();
        points[0] = Keypoint::new(-0.05, 1.1);
        assert!(Hand::from_keypoints(&points).is_ok());
    }

    #[test]
    fn test_joint_indices_match_convention() {
        assert_eq!(HandJoint::Wrist.index(), 0);
        assert_eq!(HandJoint::ThumbTip.index(), 4);
        assert_eq!(HandJoint::IndexTip.index(), 8);
        assert_eq!(HandJoint::MiddleTip.index(), 12);
        assert_eq!(HandJoint::RingTip.index(), 16);
        assert_eq!(HandJoint::PinkyTip.index(), 20);
    }

    #[test]
    fn test_mirror_preserves_y() {
        let hand = Hand::from_keypoints(&flat_hand()).unwrap();
        let mirrored = hand.mirrored();
        for (a, b) in hand.keypoints().iter().zip(mirrored.keypoints().iter()) {
            assert_eq!(a.y, b.y);
            assert!((a.x - (1.0 - b.x)).abs() < 1e-6);
        }
    }
}
