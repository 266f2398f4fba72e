use crate::frame::FrameData;
use crate::hand::Hand;
use async_trait::async_trait;

/// External hand landmark detector.
///
/// May report any number of hands; the session consumes at most one. An
/// empty result is the normal no-hand case, not an error.
#[async_trait]
pub trait LandmarkProvider: Send {
    async fn detect(&mut self, frame: &FrameData) -> Vec<Hand>;
}

/// Provider that never detects a hand, for running without a detector
pub struct NullLandmarkProvider;

#[async_trait]
impl LandmarkProvider for NullLandmarkProvider {
    async fn detect(&mut self, _frame: &FrameData) -> Vec<Hand> {
        Vec::new()
    }
}

/// Provider replaying a scripted sequence of detections, for tests.
///
/// Each entry is the full detection result for one frame; once the
/// script is exhausted the provider reports no hands.
pub struct ScriptedLandmarkProvider {
    script: std::collections::VecDeque<Vec<Hand>>,
}

impl ScriptedLandmarkProvider {
    pub fn new(script: Vec<Vec<Hand>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[async_trait]
impl LandmarkProvider for ScriptedLandmarkProvider {
    async fn detect(&mut self, _frame: &FrameData) -> Vec<Hand> {
        self.script.pop_front().unwrap_or_default()
    }
}
