use crate::ascii::{AsciiFrame, AsciiRenderer, GlyphRamp};
use crate::capture::ArtifactWriter;
use crate::classifier::GestureClassifier;
use crate::config::AsciicamConfig;
use crate::debounce::GestureDebouncer;
use crate::display::RenderSink;
use crate::error::Result;
use crate::events::{EventBus, SessionEvent};
use crate::keyboard::KeyAction;
use crate::landmarks::LandmarkProvider;
use crate::params::DisplayParameters;
use crate::source::FrameSource;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Counters describing one session run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub frames_with_hand: u64,
    pub frames_skipped: u64,
    pub gestures_confirmed: u64,
    pub screenshots_saved: u64,
}

/// Why the session loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Frame source reported end of stream
    SourceEnded,
    /// User requested quit (keyboard or signal)
    QuitRequested,
}

/// The single consolidated main loop: one camera frame in, one rendered
/// frame out, one keyboard poll per iteration.
///
/// Replaces the per-script loop variants with one session parameterized
/// over classifier rules, debounce config, and render sink.
pub struct Session {
    event_bus: Arc<EventBus>,
    params: Arc<Mutex<DisplayParameters>>,
    classifier: GestureClassifier,
    debouncer: GestureDebouncer,
    renderer: AsciiRenderer,
    artifacts: ArtifactWriter,
    cancellation_token: CancellationToken,
    stats: SessionStats,
    hand_present: bool,
    last_ascii: Option<AsciiFrame>,
}

impl Session {
    pub fn new(config: &AsciicamConfig, event_bus: Arc<EventBus>) -> Result<Self> {
        let ramp = GlyphRamp::new(&config.ascii.ramp)?;
        let renderer =
            AsciiRenderer::new(ramp, config.ascii.grid_width, config.ascii.grid_height)?;

        Ok(Self {
            event_bus,
            params: Arc::new(Mutex::new(config.display.initial_parameters())),
            classifier: GestureClassifier::new(config.gesture.rules()),
            debouncer: GestureDebouncer::new(config.gesture.debounce()),
            renderer,
            artifacts: ArtifactWriter::new(&config.capture),
            cancellation_token: CancellationToken::new(),
            stats: SessionStats::default(),
            hand_present: false,
            last_ascii: None,
        })
    }

    /// Shared handle to the display parameters
    pub fn params(&self) -> Arc<Mutex<DisplayParameters>> {
        Arc::clone(&self.params)
    }

    /// Token that cancels the loop cooperatively; checked at the top of
    /// each iteration
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    fn publish(&self, event: SessionEvent) {
        // Nobody listening is fine; the bus is observability, not control
        // flow.
        if let Err(e) = self.event_bus.publish(event) {
            debug!("Event not delivered: {}", e);
        }
    }

    /// Run the session until the source ends or quit is requested
    pub async fn run(
        &mut self,
        mut source: Box<dyn FrameSource>,
        mut provider: Box<dyn LandmarkProvider>,
        sink: &mut dyn RenderSink,
        mut key_actions: mpsc::UnboundedReceiver<KeyAction>,
    ) -> Result<SessionEnd> {
        info!(
            "Session started ({}x{} glyph grid)",
            self.renderer.grid_size().0,
            self.renderer.grid_size().1
        );

        let end = loop {
            if self.cancellation_token.is_cancelled() {
                info!("Session cancelled");
                break SessionEnd::QuitRequested;
            }

            if self.drain_key_actions(&mut key_actions)? {
                break SessionEnd::QuitRequested;
            }

            // End of stream or device failure is terminal; the session
            // is not retried.
            let frame = match source.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    self.publish(SessionEvent::SourceEnded {
                        reason: "end of stream".to_string(),
                    });
                    break SessionEnd::SourceEnded;
                }
                Err(e) => {
                    self.publish(SessionEvent::SourceEnded {
                        reason: e.to_string(),
                    });
                    return Err(e);
                }
            };

            self.stats.frames_processed += 1;

            let hands = provider.detect(&frame).await;
            // Multi-hand reasoning is out of scope; only the first hand
            // is consumed.
            let hand = hands.first();
            self.update_hand_presence(hand.is_some());

            let symbol = self.classifier.classify(hand);
            if let Some(confirmed) = self.debouncer.observe(symbol, Instant::now()) {
                self.stats.gestures_confirmed += 1;
                self.publish(SessionEvent::GestureConfirmed {
                    symbol: confirmed.symbol,
                    timestamp: SystemTime::now(),
                });

                let mut params = self.params.lock();
                if params.apply_gesture(confirmed.symbol) {
                    self.publish(SessionEvent::ParametersChanged {
                        brightness: params.brightness,
                        contrast: params.contrast,
                        timestamp: SystemTime::now(),
                    });
                }
            }

            let params_snapshot = self.params.lock().clone();
            if !params_snapshot.show_ascii {
                continue;
            }

            let mut ascii = match self.renderer.render(&frame, &params_snapshot) {
                Ok(ascii) => ascii,
                Err(e) => {
                    // A malformed frame is skipped, not fatal
                    warn!("Skipping frame {}: {}", frame.id, e);
                    self.stats.frames_skipped += 1;
                    continue;
                }
            };

            if params_snapshot.show_hands {
                if let Some(hand) = hand {
                    // The rendered frame is mirrored, so the overlay
                    // mirrors the landmarks to match.
                    ascii.overlay_hand(&hand.mirrored(), 'o');
                }
            }

            self.artifacts.record_frame(&ascii)?;

            let status =
                params_snapshot.status_line(self.debouncer.last_confirmed());
            sink.present(&ascii, &status)?;
            self.last_ascii = Some(ascii);
        };

        if let Some((path, frame_count)) = self.artifacts.stop_recording()? {
            self.publish(SessionEvent::RecordingStopped {
                path: path.display().to_string(),
                frame_count,
            });
        }

        info!(
            "Session ended: {:?} ({} frames, {} gestures)",
            end, self.stats.frames_processed, self.stats.gestures_confirmed
        );
        Ok(end)
    }

    /// Apply all pending keyboard actions; returns true when quit was
    /// requested
    fn drain_key_actions(
        &mut self,
        key_actions: &mut mpsc::UnboundedReceiver<KeyAction>,
    ) -> Result<bool> {
        loop {
            let action = match key_actions.try_recv() {
                Ok(action) => action,
                Err(mpsc::error::TryRecvError::Empty)
                | Err(mpsc::error::TryRecvError::Disconnected) => return Ok(false),
            };

            debug!("Applying key action: {:?}", action);
            match action {
                KeyAction::BrightnessUp => self.params.lock().brightness_up(),
                KeyAction::BrightnessDown => self.params.lock().brightness_down(),
                KeyAction::CharSizeUp => self.params.lock().char_size_up(),
                KeyAction::CharSizeDown => self.params.lock().char_size_down(),
                KeyAction::ToggleTheme => self.params.lock().toggle_dark_mode(),
                KeyAction::ToggleAscii => self.params.lock().toggle_ascii(),
                KeyAction::Reset => {
                    self.params.lock().reset();
                    self.debouncer.reset();
                }
                KeyAction::Screenshot => self.save_screenshot()?,
                KeyAction::ToggleRecording => self.toggle_recording()?,
                KeyAction::Quit => {
                    self.publish(SessionEvent::ShutdownRequested {
                        timestamp: SystemTime::now(),
                        reason: "User requested via keyboard".to_string(),
                    });
                    return Ok(true);
                }
            }

            let params = self.params.lock();
            self.publish(SessionEvent::ParametersChanged {
                brightness: params.brightness,
                contrast: params.contrast,
                timestamp: SystemTime::now(),
            });
        }
    }

    fn save_screenshot(&mut self) -> Result<()> {
        match self.last_ascii.as_ref() {
            Some(frame) => {
                let path = self.artifacts.save_screenshot(frame)?;
                self.stats.screenshots_saved += 1;
                self.publish(SessionEvent::ScreenshotSaved {
                    path: path.display().to_string(),
                });
            }
            None => warn!("Screenshot requested before any frame was rendered"),
        }
        Ok(())
    }

    fn toggle_recording(&mut self) -> Result<()> {
        if self.artifacts.is_recording() {
            if let Some((path, frame_count)) = self.artifacts.stop_recording()? {
                self.params.lock().recording = false;
                self.publish(SessionEvent::RecordingStopped {
                    path: path.display().to_string(),
                    frame_count,
                });
            }
        } else {
            let path = self.artifacts.start_recording()?;
            self.params.lock().recording = true;
            self.publish(SessionEvent::RecordingStarted {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    fn update_hand_presence(&mut self, present: bool) {
        if present {
            self.stats.frames_with_hand += 1;
        }
        if present != self.hand_present {
            self.hand_present = present;
            self.publish(SessionEvent::HandPresenceChanged {
                present,
                timestamp: SystemTime::now(),
            });
        }
    }
}
