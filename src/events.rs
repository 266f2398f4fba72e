use crate::classifier::GestureSymbol;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Errors produced by the event bus
#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Failed to publish event: {details}")]
    PublishFailed { details: String },
}

/// Events that can occur during an asciicam session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A gesture survived debouncing and was applied
    GestureConfirmed {
        symbol: GestureSymbol,
        timestamp: SystemTime,
    },
    /// Display parameters were changed (by gesture or keyboard)
    ParametersChanged {
        brightness: f32,
        contrast: f32,
        timestamp: SystemTime,
    },
    /// Hand presence changed in the camera view
    HandPresenceChanged {
        present: bool,
        timestamp: SystemTime,
    },
    /// A screenshot of the glyph grid was written
    ScreenshotSaved { path: String },
    /// Recording of glyph frames started
    RecordingStarted { path: String },
    /// Recording stopped after writing the given number of frames
    RecordingStopped { path: String, frame_count: u64 },
    /// The frame source ended or failed; the session is terminating
    SourceEnded { reason: String },
    /// A component reported an error
    SystemError { component: String, error: String },
    /// Session shutdown requested
    ShutdownRequested {
        timestamp: SystemTime,
        reason: String,
    },
}

impl SessionEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            SessionEvent::GestureConfirmed { symbol, .. } => {
                format!("Gesture confirmed: {}", symbol)
            }
            SessionEvent::ParametersChanged {
                brightness,
                contrast,
                ..
            } => {
                format!(
                    "Parameters changed: brightness {:.1}, contrast {:.1}",
                    brightness, contrast
                )
            }
            SessionEvent::HandPresenceChanged { present, .. } => {
                format!("Hand {}", if *present { "detected" } else { "lost" })
            }
            SessionEvent::ScreenshotSaved { path } => {
                format!("Screenshot saved: {}", path)
            }
            SessionEvent::RecordingStarted { path } => {
                format!("Recording started: {}", path)
            }
            SessionEvent::RecordingStopped { path, frame_count } => {
                format!("Recording stopped: {} ({} frames)", path, frame_count)
            }
            SessionEvent::SourceEnded { reason } => {
                format!("Frame source ended: {}", reason)
            }
            SessionEvent::SystemError { component, error } => {
                format!("Error in {}: {}", component, error)
            }
            SessionEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::GestureConfirmed { .. } => "gesture_confirmed",
            SessionEvent::ParametersChanged { .. } => "parameters_changed",
            SessionEvent::HandPresenceChanged { .. } => "hand_presence_changed",
            SessionEvent::ScreenshotSaved { .. } => "screenshot_saved",
            SessionEvent::RecordingStarted { .. } => "recording_started",
            SessionEvent::RecordingStopped { .. } => "recording_stopped",
            SessionEvent::SourceEnded { .. } => "source_ended",
            SessionEvent::SystemError { .. } => "system_error",
            SessionEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Async event bus for component coordination using broadcast channels
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: SessionEvent) -> Result<usize, EventBusError> {
        match &event {
            SessionEvent::GestureConfirmed { symbol, .. } => {
                info!("Gesture confirmed: {}", symbol);
            }
            SessionEvent::SystemError { component, error } => {
                error!("System error in {}: {}", component, error);
            }
            SessionEvent::ShutdownRequested { reason, .. } => {
                info!("Shutdown requested: {}", reason);
            }
            SessionEvent::SourceEnded { reason } => {
                info!("Frame source ended: {}", reason);
            }
            _ => {
                debug!("Event: {}", event.description());
            }
        }

        self.sender
            .send(event)
            .map_err(|e| EventBusError::PublishFailed {
                details: e.to_string(),
            })
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_and_receive() {
        let bus = EventBus::new(16);
        let mut receiver = bus.subscribe();

        bus.publish(SessionEvent::GestureConfirmed {
            symbol: GestureSymbol::ThumbsUp,
            timestamp: SystemTime::now(),
        })
        .unwrap();

        match receiver.recv().await.unwrap() {
            SessionEvent::GestureConfirmed { symbol, .. } => {
                assert_eq!(symbol, GestureSymbol::ThumbsUp);
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_fails() {
        let bus = EventBus::new(16);
        let result = bus.publish(SessionEvent::SourceEnded {
            reason: "test".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_event_types() {
        let event = SessionEvent::ScreenshotSaved {
            path: "out.txt".to_string(),
        };
        assert_eq!(event.event_type(), "screenshot_saved");
        assert!(event.description().contains("out.txt"));
    }
}
