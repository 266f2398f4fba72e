use crate::classifier::GestureSymbol;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Clamp range for the brightness multiplier
pub const BRIGHTNESS_MIN: f32 = 0.2;
pub const BRIGHTNESS_MAX: f32 = 2.0;

/// Clamp range for the contrast multiplier
pub const CONTRAST_MIN: f32 = 0.2;
pub const CONTRAST_MAX: f32 = 3.0;

/// Clamp range for the rendered character cell size
pub const CHAR_SIZE_MIN: u32 = 2;
pub const CHAR_SIZE_MAX: u32 = 15;

/// Character cell size at which the configured grid dimensions apply
/// verbatim; other sizes rescale the grid inversely (smaller cells fit
/// more of them in the same canvas)
pub const CHAR_SIZE_DEFAULT: u32 = 5;

const BRIGHTNESS_STEP: f32 = 0.2;

/// Mutable display settings owned by the session loop.
///
/// Mutated only by confirmed gesture events, keyboard actions, or an
/// explicit reset; read by the rendering step every frame. All numeric
/// setters clamp silently, so no sequence of events can push a field out
/// of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayParameters {
    pub brightness: f32,
    pub contrast: f32,
    pub show_hands: bool,
    pub show_ascii: bool,
    pub char_size: u32,
    pub dark_mode: bool,
    pub recording: bool,
}

impl Default for DisplayParameters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            show_hands: true,
            show_ascii: true,
            char_size: CHAR_SIZE_DEFAULT,
            dark_mode: false,
            recording: false,
        }
    }
}

impl DisplayParameters {
    pub fn set_brightness(&mut self, value: f32) {
        self.brightness = value.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
    }

    pub fn set_contrast(&mut self, value: f32) {
        self.contrast = value.clamp(CONTRAST_MIN, CONTRAST_MAX);
    }

    pub fn set_char_size(&mut self, value: u32) {
        self.char_size = value.clamp(CHAR_SIZE_MIN, CHAR_SIZE_MAX);
    }

    pub fn brightness_up(&mut self) {
        self.set_brightness(self.brightness + BRIGHTNESS_STEP);
    }

    pub fn brightness_down(&mut self) {
        self.set_brightness(self.brightness - BRIGHTNESS_STEP);
    }

    pub fn char_size_up(&mut self) {
        self.set_char_size(self.char_size + 1);
    }

    pub fn char_size_down(&mut self) {
        self.set_char_size(self.char_size.saturating_sub(1));
    }

    pub fn toggle_hands(&mut self) {
        self.show_hands = !self.show_hands;
    }

    pub fn toggle_ascii(&mut self) {
        self.show_ascii = !self.show_ascii;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Reset tunable values to defaults; recording state is untouched
    pub fn reset(&mut self) {
        let recording = self.recording;
        *self = Self::default();
        self.recording = recording;
        info!("Display parameters reset to defaults");
    }

    /// Apply a confirmed gesture to the parameters. Returns true when
    /// anything changed.
    pub fn apply_gesture(&mut self, symbol: GestureSymbol) -> bool {
        let before = self.clone();
        match symbol {
            GestureSymbol::ThumbsUp => self.brightness_up(),
            GestureSymbol::ThumbsDown => self.brightness_down(),
            GestureSymbol::Peace => self.toggle_hands(),
            GestureSymbol::Fist => self.reset(),
            GestureSymbol::None => return false,
        }

        let changed = *self != before;
        debug!(
            gesture = %symbol,
            brightness = self.brightness,
            show_hands = self.show_hands,
            changed,
            "Applied gesture to display parameters"
        );
        changed
    }

    /// One-line status string for the UI overlay
    pub fn status_line(&self, last_gesture: Option<GestureSymbol>) -> String {
        format!(
            "Brightness: {:.1} | Contrast: {:.1} | Hands: {} | Last: {}",
            self.brightness,
            self.contrast,
            if self.show_hands { "ON" } else { "OFF" },
            last_gesture.map(|g| g.label()).unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_clamps_at_bounds() {
        let mut params = DisplayParameters::default();
        for _ in 0..100 {
            params.brightness_up();
        }
        assert_eq!(params.brightness, BRIGHTNESS_MAX);

        for _ in 0..100 {
            params.brightness_down();
        }
        assert_eq!(params.brightness, BRIGHTNESS_MIN);
    }

    #[test]
    fn test_char_size_clamps() {
        let mut params = DisplayParameters::default();
        for _ in 0..50 {
            params.char_size_up();
        }
        assert_eq!(params.char_size, CHAR_SIZE_MAX);

        for _ in 0..50 {
            params.char_size_down();
        }
        assert_eq!(params.char_size, CHAR_SIZE_MIN);
    }

    #[test]
    fn test_gesture_mapping() {
        let mut params = DisplayParameters::default();

        assert!(params.apply_gesture(GestureSymbol::ThumbsUp));
        assert!((params.brightness - 1.2).abs() < 1e-6);

        assert!(params.apply_gesture(GestureSymbol::ThumbsDown));
        assert!((params.brightness - 1.0).abs() < 1e-6);

        assert!(params.apply_gesture(GestureSymbol::Peace));
        assert!(!params.show_hands);

        params.set_brightness(1.8);
        assert!(params.apply_gesture(GestureSymbol::Fist));
        assert_eq!(params, DisplayParameters::default());
    }

    #[test]
    fn test_toggle_ascii() {
        let mut params = DisplayParameters::default();
        assert!(params.show_ascii);
        params.toggle_ascii();
        assert!(!params.show_ascii);
        params.toggle_ascii();
        assert!(params.show_ascii);
    }

    #[test]
    fn test_none_gesture_is_a_no_op() {
        let mut params = DisplayParameters::default();
        assert!(!params.apply_gesture(GestureSymbol::None));
        assert_eq!(params, DisplayParameters::default());
    }

    #[test]
    fn test_gesture_at_clamp_reports_no_change() {
        let mut params = DisplayParameters::default();
        params.set_brightness(BRIGHTNESS_MAX);
        assert!(!params.apply_gesture(GestureSymbol::ThumbsUp));
    }

    #[test]
    fn test_reset_preserves_recording_flag() {
        let mut params = DisplayParameters::default();
        params.recording = true;
        params.set_brightness(0.4);
        params.reset();
        assert!(params.recording);
        assert_eq!(params.brightness, 1.0);
    }

    #[test]
    fn test_status_line() {
        let params = DisplayParameters::default();
        let line = params.status_line(Some(GestureSymbol::Peace));
        assert!(line.contains("Brightness: 1.0"));
        assert!(line.contains("peace"));
    }
}
