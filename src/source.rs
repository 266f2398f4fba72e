use crate::config::CameraConfig;
use crate::error::{Result, SourceError};
use crate::frame::{FrameData, FrameFormat};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// A sequence of raw image frames.
///
/// `next_frame` blocks until the next frame is available (bounded by the
/// device frame rate) and returns `Ok(None)` at end of stream. Device
/// failure is an error; both are terminal for the session.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<FrameData>>;
}

/// Synthetic frame source producing a moving grayscale gradient.
///
/// Stands in for a camera device when none is attached and drives the
/// pipeline in tests and dry runs.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    frame_interval: Duration,
    frame_counter: AtomicU64,
    remaining: Option<u64>,
}

impl TestPatternSource {
    pub fn new(config: &CameraConfig) -> Self {
        info!(
            "Initializing test pattern source ({}x{} @ {}fps)",
            config.resolution.0, config.resolution.1, config.fps
        );
        Self {
            width: config.resolution.0,
            height: config.resolution.1,
            frame_interval: Duration::from_secs_f64(1.0 / config.fps.max(1) as f64),
            frame_counter: AtomicU64::new(0),
            remaining: None,
        }
    }

    /// Limit the source to a fixed number of frames, after which it
    /// reports end of stream
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    fn generate(&self, id: u64) -> FrameData {
        let mut data = Vec::with_capacity((self.width * self.height) as usize);
        let phase = (id % 256) as u32;
        for y in 0..self.height {
            for x in 0..self.width {
                // Diagonal gradient that drifts with the frame counter
                let value = (x + y + phase) * 255 / (self.width + self.height).max(1);
                data.push(value.min(255) as u8);
            }
        }
        FrameData::new(
            id,
            SystemTime::now(),
            data,
            self.width,
            self.height,
            FrameFormat::Gray8,
        )
    }
}

#[async_trait]
impl FrameSource for TestPatternSource {
    async fn next_frame(&mut self) -> Result<Option<FrameData>> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                debug!("Test pattern source reached its frame limit");
                return Ok(None);
            }
            *remaining -= 1;
        }

        tokio::time::sleep(self.frame_interval).await;

        let id = self.frame_counter.fetch_add(1, Ordering::Relaxed);
        Ok(Some(self.generate(id)))
    }
}

/// Frame source backed by a pre-recorded list of frames, for tests
pub struct ReplaySource {
    frames: std::collections::VecDeque<FrameData>,
    fail_after: Option<usize>,
    served: usize,
}

impl ReplaySource {
    pub fn new(frames: Vec<FrameData>) -> Self {
        Self {
            frames: frames.into(),
            fail_after: None,
            served: 0,
        }
    }

    /// Make the source fail with a device error after serving N frames
    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }
}

#[async_trait]
impl FrameSource for ReplaySource {
    async fn next_frame(&mut self) -> Result<Option<FrameData>> {
        if let Some(limit) = self.fail_after {
            if self.served >= limit {
                return Err(SourceError::ReadFailed {
                    details: "replay source injected failure".to_string(),
                }
                .into());
            }
        }
        self.served += 1;
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn fast_config() -> CameraConfig {
        CameraConfig {
            index: 0,
            resolution: (8, 4),
            fps: 1000,
        }
    }

    #[tokio::test]
    async fn test_pattern_source_produces_frames() {
        let mut source = TestPatternSource::new(&fast_config());
        let frame = source.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 4);
        assert!(frame.validate_size());
    }

    #[tokio::test]
    async fn test_pattern_source_frame_ids_increase() {
        let mut source = TestPatternSource::new(&fast_config());
        let first = source.next_frame().await.unwrap().unwrap();
        let second = source.next_frame().await.unwrap().unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_pattern_source_frame_limit() {
        let mut source = TestPatternSource::new(&fast_config()).with_frame_limit(2);
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replay_source_ends() {
        let frame = FrameData::new(
            0,
            SystemTime::now(),
            vec![0u8; 4],
            2,
            2,
            FrameFormat::Gray8,
        );
        let mut source = ReplaySource::new(vec![frame]);
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replay_source_failure_injection() {
        let mut source = ReplaySource::new(vec![]).failing_after(0);
        assert!(source.next_frame().await.is_err());
    }
}
