use crate::hand::{Hand, HandJoint};
use serde::{Deserialize, Serialize};

/// Discrete gesture symbol derived from a single hand's keypoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureSymbol {
    ThumbsUp,
    ThumbsDown,
    Peace,
    Fist,
    None,
}

impl GestureSymbol {
    pub fn is_none(&self) -> bool {
        matches!(self, GestureSymbol::None)
    }

    /// Short label for status lines and logs
    pub fn label(&self) -> &'static str {
        match self {
            GestureSymbol::ThumbsUp => "thumbs_up",
            GestureSymbol::ThumbsDown => "thumbs_down",
            GestureSymbol::Peace => "peace",
            GestureSymbol::Fist => "fist",
            GestureSymbol::None => "none",
        }
    }
}

impl std::fmt::Display for GestureSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-variant classifier rule knobs.
///
/// Script variants of this tool disagreed on the fine print of some
/// gestures; those divergences are configuration rather than alternate
/// rulesets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifierRules {
    /// When true, Fist additionally requires the thumb tip below its IP
    /// joint rather than merely not-extended-up
    #[serde(default)]
    pub fist_requires_thumb_down: bool,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            fist_requires_thumb_down: false,
        }
    }
}

/// Maps one hand's 21 keypoints to a gesture symbol using static
/// geometric thresholds on the y axis.
///
/// Stateless and deterministic; only y comparisons are used, so the
/// result is invariant under horizontal mirroring.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    rules: ClassifierRules,
}

impl GestureClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    /// Classify a hand into a gesture symbol. Absent hand is the normal
    /// no-detection case and maps to `GestureSymbol::None`.
    pub fn classify(&self, hand: Option<&Hand>) -> GestureSymbol {
        let hand = match hand {
            Some(hand) => hand,
            None => return GestureSymbol::None,
        };

        let digits = DigitState::from_hand(hand);

        // Rules are evaluated in fixed priority order; first match wins.
        if digits.thumb_up && !digits.any_finger_up() {
            return GestureSymbol::ThumbsUp;
        }

        if digits.thumb_down && !digits.any_finger_up() {
            return GestureSymbol::ThumbsDown;
        }

        if digits.index_up && digits.middle_up && !digits.ring_up && !digits.pinky_up {
            return GestureSymbol::Peace;
        }

        let thumb_closed = if self.rules.fist_requires_thumb_down {
            digits.thumb_down
        } else {
            !digits.thumb_up
        };
        if thumb_closed && !digits.any_finger_up() {
            return GestureSymbol::Fist;
        }

        GestureSymbol::None
    }
}

/// Extended-up / extended-down predicates for the five digits
#[derive(Debug, Clone, Copy)]
struct DigitState {
    thumb_up: bool,
    thumb_down: bool,
    index_up: bool,
    middle_up: bool,
    ring_up: bool,
    pinky_up: bool,
}

impl DigitState {
    fn from_hand(hand: &Hand) -> Self {
        let thumb_tip = hand.joint(HandJoint::ThumbTip).y;
        let thumb_ip = hand.joint(HandJoint::ThumbIp).y;
        // The thumb is compared against both its IP and MCP joints; the
        // extra comparison rejects partially curled thumbs.
        let thumb_mcp = hand.joint(HandJoint::ThumbMcp).y;

        Self {
            thumb_up: thumb_tip < thumb_ip && thumb_tip < thumb_mcp,
            thumb_down: thumb_tip > thumb_ip && thumb_tip > thumb_mcp,
            index_up: Self::finger_up(hand, HandJoint::IndexTip, HandJoint::IndexPip),
            middle_up: Self::finger_up(hand, HandJoint::MiddleTip, HandJoint::MiddlePip),
            ring_up: Self::finger_up(hand, HandJoint::RingTip, HandJoint::RingPip),
            pinky_up: Self::finger_up(hand, HandJoint::PinkyTip, HandJoint::PinkyPip),
        }
    }

    /// A finger is extended-up if its tip is strictly above its PIP joint
    /// (y increases downward)
    fn finger_up(hand: &Hand, tip: HandJoint, pip: HandJoint) -> bool {
        hand.joint(tip).y < hand.joint(pip).y
    }

    fn any_finger_up(&self) -> bool {
        self.index_up || self.middle_up || self.ring_up || self.pinky_up
    }
}
