use crate::classifier::GestureSymbol;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Debounce tuning for the gesture stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Trailing buffer capacity K
    #[serde(default = "default_window")]
    pub window: usize,

    /// Consecutive identical frames C required to confirm (C <= K)
    #[serde(default = "default_consecutive")]
    pub consecutive: usize,

    /// Minimum seconds between confirmed events
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: f64,
}

impl DebounceConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.cooldown_seconds)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            consecutive: default_consecutive(),
            cooldown_seconds: default_cooldown_seconds(),
        }
    }
}

fn default_window() -> usize {
    3
}
fn default_consecutive() -> usize {
    2
}
fn default_cooldown_seconds() -> f64 {
    0.5
}

/// A gesture that survived debouncing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmedGesture {
    pub symbol: GestureSymbol,
    pub at: Instant,
}

/// Consumes the per-frame gesture stream and emits a confirmed event only
/// when the same non-none symbol holds across the trailing window, with a
/// cooldown so a held gesture does not re-fire every frame.
///
/// Raw per-frame classification is noisy: hand jitter and digit
/// transitions produce single-frame flicker that the consecutive-frame
/// requirement rejects.
pub struct GestureDebouncer {
    window: usize,
    consecutive: usize,
    cooldown: Duration,
    buffer: VecDeque<GestureSymbol>,
    last_fired_at: Option<Instant>,
    last_fired_symbol: Option<GestureSymbol>,
}

impl GestureDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        let window = config.window.max(1);
        // C is clamped into [1, K] so a misconfigured pair cannot make
        // confirmation impossible.
        let consecutive = config.consecutive.clamp(1, window);

        debug!(
            window,
            consecutive,
            cooldown_ms = config.cooldown().as_millis() as u64,
            "Created gesture debouncer"
        );

        Self {
            window,
            consecutive,
            cooldown: config.cooldown(),
            buffer: VecDeque::with_capacity(window),
            last_fired_at: None,
            last_fired_symbol: None,
        }
    }

    /// Feed one per-frame symbol; returns a confirmed gesture when the
    /// stream has stabilized and the cooldown has elapsed.
    pub fn observe(&mut self, symbol: GestureSymbol, now: Instant) -> Option<ConfirmedGesture> {
        self.buffer.push_back(symbol);
        while self.buffer.len() > self.window {
            self.buffer.pop_front();
        }

        let candidate = self.stable_symbol()?;

        if let Some(last) = self.last_fired_at {
            if now.duration_since(last) < self.cooldown {
                trace!(symbol = %candidate, "Stable gesture suppressed by cooldown");
                return None;
            }
        }

        self.last_fired_at = Some(now);
        self.last_fired_symbol = Some(candidate);
        debug!(symbol = %candidate, "Gesture confirmed");

        Some(ConfirmedGesture {
            symbol: candidate,
            at: now,
        })
    }

    /// The symbol held by the most recent C entries, if they are all
    /// equal and non-none
    fn stable_symbol(&self) -> Option<GestureSymbol> {
        if self.buffer.len() < self.consecutive {
            return None;
        }

        let mut recent = self.buffer.iter().rev().take(self.consecutive);
        let first = *recent.next()?;
        if first.is_none() {
            return None;
        }
        if recent.all(|&s| s == first) {
            Some(first)
        } else {
            None
        }
    }

    /// Last confirmed symbol, for status display
    pub fn last_confirmed(&self) -> Option<GestureSymbol> {
        self.last_fired_symbol
    }

    /// Number of symbols currently buffered (never exceeds K)
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop buffered symbols and cooldown state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_fired_at = None;
        self.last_fired_symbol = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debouncer(window: usize, consecutive: usize, cooldown_seconds: f64) -> GestureDebouncer {
        GestureDebouncer::new(DebounceConfig {
            window,
            consecutive,
            cooldown_seconds,
        })
    }

    #[test]
    fn test_single_frame_flicker_is_rejected() {
        let mut d = debouncer(3, 2, 0.5);
        let t0 = Instant::now();
        assert!(d.observe(GestureSymbol::ThumbsUp, t0).is_none());
        assert!(d
            .observe(GestureSymbol::None, t0 + Duration::from_millis(33))
            .is_none());
        assert!(d
            .observe(GestureSymbol::Peace, t0 + Duration::from_millis(66))
            .is_none());
    }

    #[test]
    fn test_consecutive_frames_fire_exactly_once() {
        let mut d = debouncer(3, 2, 1.0);
        let t0 = Instant::now();

        assert!(d.observe(GestureSymbol::ThumbsUp, t0).is_none());
        let confirmed = d
            .observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(100))
            .expect("second consecutive frame should confirm");
        assert_eq!(confirmed.symbol, GestureSymbol::ThumbsUp);

        // Held gesture keeps the buffer stable but stays inside the
        // cooldown window.
        assert!(d
            .observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(200))
            .is_none());
        assert!(d
            .observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn test_refires_after_cooldown() {
        let mut d = debouncer(3, 2, 1.0);
        let t0 = Instant::now();

        d.observe(GestureSymbol::ThumbsUp, t0);
        assert!(d
            .observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(100))
            .is_some());

        // Within cooldown at t=0.5s
        assert!(d
            .observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(500))
            .is_none());

        // Past cooldown at t=1.2s, stability still holds
        let again = d.observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(1200));
        assert_eq!(again.map(|c| c.symbol), Some(GestureSymbol::ThumbsUp));
    }

    #[test]
    fn test_no_two_events_closer_than_cooldown() {
        let mut d = debouncer(4, 2, 0.7);
        let t0 = Instant::now();
        let mut fired_at: Vec<Instant> = Vec::new();

        // Alternate between two gestures every few frames at ~30fps
        for i in 0..120u64 {
            let symbol = if (i / 10) % 2 == 0 {
                GestureSymbol::ThumbsUp
            } else {
                GestureSymbol::Fist
            };
            let now = t0 + Duration::from_millis(i * 33);
            if let Some(confirmed) = d.observe(symbol, now) {
                fired_at.push(confirmed.at);
            }
        }

        assert!(!fired_at.is_empty());
        for pair in fired_at.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(700));
        }
    }

    #[test]
    fn test_none_never_confirms() {
        let mut d = debouncer(3, 2, 0.0);
        let t0 = Instant::now();
        for i in 0..10u64 {
            assert!(d
                .observe(GestureSymbol::None, t0 + Duration::from_millis(i * 33))
                .is_none());
        }
    }

    #[test]
    fn test_buffer_never_exceeds_window() {
        let mut d = debouncer(3, 3, 0.0);
        let t0 = Instant::now();
        for i in 0..50u64 {
            d.observe(GestureSymbol::Peace, t0 + Duration::from_millis(i * 33));
            assert!(d.buffered() <= 3);
        }
    }

    #[test]
    fn test_scenario_from_stream() {
        // K=3, C=2, D=1.0s; [ThumbsUp, ThumbsUp, None] at t=0, 0.1, 0.2
        let mut d = debouncer(3, 2, 1.0);
        let t0 = Instant::now();

        assert!(d.observe(GestureSymbol::ThumbsUp, t0).is_none());
        let confirmed = d.observe(GestureSymbol::ThumbsUp, t0 + Duration::from_millis(100));
        assert_eq!(confirmed.map(|c| c.symbol), Some(GestureSymbol::ThumbsUp));
        assert!(d
            .observe(GestureSymbol::None, t0 + Duration::from_millis(200))
            .is_none());
    }

    #[test]
    fn test_reset_clears_cooldown() {
        let mut d = debouncer(3, 2, 10.0);
        let t0 = Instant::now();
        d.observe(GestureSymbol::Fist, t0);
        assert!(d
            .observe(GestureSymbol::Fist, t0 + Duration::from_millis(50))
            .is_some());

        d.reset();
        assert_eq!(d.buffered(), 0);
        assert!(d.last_confirmed().is_none());

        d.observe(GestureSymbol::Fist, t0 + Duration::from_millis(100));
        assert!(d
            .observe(GestureSymbol::Fist, t0 + Duration::from_millis(150))
            .is_some());
    }

    #[test]
    fn test_consecutive_clamped_to_window() {
        // C > K would make confirmation impossible without the clamp
        let mut d = debouncer(2, 5, 0.0);
        let t0 = Instant::now();
        d.observe(GestureSymbol::Peace, t0);
        assert!(d
            .observe(GestureSymbol::Peace, t0 + Duration::from_millis(33))
            .is_some());
    }
}
