use crate::error::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Discrete keyboard commands consumed by the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    BrightnessUp,
    BrightnessDown,
    CharSizeUp,
    CharSizeDown,
    ToggleTheme,
    ToggleAscii,
    Reset,
    Screenshot,
    ToggleRecording,
    Quit,
}

/// Keyboard input handler polling crossterm key events in raw mode.
///
/// Runs on a blocking task; discrete key-down events are forwarded to the
/// session loop over a channel.
pub struct KeyboardInputHandler {
    sender: mpsc::UnboundedSender<KeyAction>,
    cancellation_token: CancellationToken,
}

impl KeyboardInputHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<KeyAction>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender,
                cancellation_token: CancellationToken::new(),
            },
            receiver,
        )
    }

    fn map_key(code: KeyCode) -> Option<KeyAction> {
        match code {
            KeyCode::Char('+') | KeyCode::Char('=') => Some(KeyAction::BrightnessUp),
            KeyCode::Char('-') => Some(KeyAction::BrightnessDown),
            KeyCode::Up => Some(KeyAction::CharSizeUp),
            KeyCode::Down => Some(KeyAction::CharSizeDown),
            KeyCode::Char('t') => Some(KeyAction::ToggleTheme),
            KeyCode::Char('a') => Some(KeyAction::ToggleAscii),
            KeyCode::Char('r') => Some(KeyAction::Reset),
            KeyCode::Char('s') => Some(KeyAction::Screenshot),
            KeyCode::Char(' ') => Some(KeyAction::ToggleRecording),
            KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
            _ => None,
        }
    }

    /// Start listening for keyboard input
    pub fn start(&self) -> Result<()> {
        info!("Starting keyboard input handler - press 'q' or ESC to quit");

        let sender = self.sender.clone();
        let cancellation_token = self.cancellation_token.clone();

        task::spawn_blocking(move || {
            // Raw mode captures individual key presses without waiting
            // for a newline
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            debug!("Raw mode enabled - keyboard handler active");

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            // Only handle key press events (not release)
                            if key_event.kind != KeyEventKind::Press {
                                continue;
                            }

                            if let Some(action) = Self::map_key(key_event.code) {
                                debug!("Key action: {:?}", action);
                                let is_quit = action == KeyAction::Quit;
                                if sender.send(action).is_err() {
                                    debug!("Session loop gone, keyboard handler exiting");
                                    break;
                                }
                                if is_quit {
                                    break;
                                }
                            }
                        }
                    }
                    Ok(false) => {
                        // No event available, continue polling
                    }
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            } else {
                debug!("Raw mode disabled");
            }
        });

        Ok(())
    }

    /// Stop the keyboard input handler
    pub async fn stop(&self) {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        // Give the task a moment to clean up and disable raw mode
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = disable_raw_mode();
    }
}
