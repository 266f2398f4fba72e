use crate::classifier::ClassifierRules;
use crate::debounce::DebounceConfig;
use crate::params::{DisplayParameters, BRIGHTNESS_MAX, BRIGHTNESS_MIN};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AsciicamConfig {
    pub camera: CameraConfig,
    pub gesture: GestureConfig,
    pub ascii: AsciiConfig,
    pub display: DisplayConfig,
    pub capture: CaptureConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Camera device index (e.g., 0 for /dev/video0)
    #[serde(default = "default_camera_index")]
    pub index: u32,

    /// Camera resolution (width, height)
    #[serde(default = "default_camera_resolution")]
    pub resolution: (u32, u32),

    /// Frames per second
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GestureConfig {
    /// Trailing window size K for debouncing
    #[serde(default = "default_gesture_window")]
    pub window: usize,

    /// Consecutive identical frames C required to confirm
    #[serde(default = "default_gesture_consecutive")]
    pub consecutive: usize,

    /// Cooldown between confirmed gestures in seconds
    #[serde(default = "default_gesture_cooldown")]
    pub cooldown_seconds: f64,

    /// Whether Fist requires the thumb strictly pointing down
    #[serde(default)]
    pub fist_requires_thumb_down: bool,
}

impl GestureConfig {
    pub fn debounce(&self) -> DebounceConfig {
        DebounceConfig {
            window: self.window,
            consecutive: self.consecutive,
            cooldown_seconds: self.cooldown_seconds,
        }
    }

    pub fn rules(&self) -> ClassifierRules {
        ClassifierRules {
            fist_requires_thumb_down: self.fist_requires_thumb_down,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AsciiConfig {
    /// Glyph grid width in characters
    #[serde(default = "default_grid_width")]
    pub grid_width: u32,

    /// Glyph grid height in characters
    #[serde(default = "default_grid_height")]
    pub grid_height: u32,

    /// Character ramp from darkest to lightest
    #[serde(default = "default_ramp")]
    pub ramp: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    /// Initial brightness multiplier
    #[serde(default = "default_brightness")]
    pub brightness: f32,

    /// Initial contrast multiplier
    #[serde(default = "default_contrast")]
    pub contrast: f32,

    /// Draw the hand landmark overlay
    #[serde(default = "default_show_hands")]
    pub show_hands: bool,

    /// Rendered character cell size
    #[serde(default = "default_char_size")]
    pub char_size: u32,

    /// Start with the ramp polarity flipped
    #[serde(default)]
    pub dark_mode: bool,
}

impl DisplayConfig {
    /// Initial display parameters; values outside the clamped ranges are
    /// silently pulled back in
    pub fn initial_parameters(&self) -> DisplayParameters {
        let mut params = DisplayParameters::default();
        params.set_brightness(self.brightness);
        params.set_contrast(self.contrast);
        params.set_char_size(self.char_size);
        params.show_hands = self.show_hands;
        params.dark_mode = self.dark_mode;
        params
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CaptureConfig {
    /// Base path for screenshots and recordings
    #[serde(default = "default_capture_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

impl AsciicamConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("asciicam.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Start with default values
            .set_default("camera.index", default_camera_index())?
            .set_default(
                "camera.resolution",
                vec![default_camera_resolution().0, default_camera_resolution().1],
            )?
            .set_default("camera.fps", default_camera_fps())?
            .set_default("gesture.window", default_gesture_window() as i64)?
            .set_default("gesture.consecutive", default_gesture_consecutive() as i64)?
            .set_default("gesture.cooldown_seconds", default_gesture_cooldown())?
            .set_default("gesture.fist_requires_thumb_down", false)?
            .set_default("ascii.grid_width", default_grid_width())?
            .set_default("ascii.grid_height", default_grid_height())?
            .set_default("ascii.ramp", default_ramp())?
            .set_default("display.brightness", default_brightness() as f64)?
            .set_default("display.contrast", default_contrast() as f64)?
            .set_default("display.show_hands", default_show_hands())?
            .set_default("display.char_size", default_char_size())?
            .set_default("display.dark_mode", false)?
            .set_default("capture.path", default_capture_path())?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with ASCIICAM_ prefix
            .add_source(Environment::with_prefix("ASCIICAM").separator("_"))
            .build()?;

        let config: AsciicamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.resolution.0 == 0 || self.camera.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.fps == 0 {
            return Err(ConfigError::Message(
                "Camera fps must be greater than 0".to_string(),
            ));
        }

        if self.gesture.window == 0 {
            return Err(ConfigError::Message(
                "Gesture window must be greater than 0".to_string(),
            ));
        }

        if self.gesture.consecutive == 0 {
            return Err(ConfigError::Message(
                "Gesture consecutive count must be greater than 0".to_string(),
            ));
        }

        if self.gesture.cooldown_seconds < 0.0 {
            return Err(ConfigError::Message(
                "Gesture cooldown must not be negative".to_string(),
            ));
        }

        if self.ascii.grid_width == 0 || self.ascii.grid_height == 0 {
            return Err(ConfigError::Message(
                "ASCII grid dimensions must be greater than 0".to_string(),
            ));
        }

        if self.ascii.ramp.is_empty() {
            return Err(ConfigError::Message(
                "ASCII ramp must not be empty".to_string(),
            ));
        }

        if self.display.brightness < BRIGHTNESS_MIN || self.display.brightness > BRIGHTNESS_MAX {
            return Err(ConfigError::Message(format!(
                "Display brightness must be within [{}, {}]",
                BRIGHTNESS_MIN, BRIGHTNESS_MAX
            )));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for AsciicamConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                index: default_camera_index(),
                resolution: default_camera_resolution(),
                fps: default_camera_fps(),
            },
            gesture: GestureConfig {
                window: default_gesture_window(),
                consecutive: default_gesture_consecutive(),
                cooldown_seconds: default_gesture_cooldown(),
                fist_requires_thumb_down: false,
            },
            ascii: AsciiConfig {
                grid_width: default_grid_width(),
                grid_height: default_grid_height(),
                ramp: default_ramp(),
            },
            display: DisplayConfig {
                brightness: default_brightness(),
                contrast: default_contrast(),
                show_hands: default_show_hands(),
                char_size: default_char_size(),
                dark_mode: false,
            },
            capture: CaptureConfig {
                path: default_capture_path(),
            },
            system: SystemConfig {
                event_bus_capacity: default_event_bus_capacity(),
            },
        }
    }
}

// Default value functions
fn default_camera_index() -> u32 {
    0
}
fn default_camera_resolution() -> (u32, u32) {
    (640, 480)
}
fn default_camera_fps() -> u32 {
    30
}

fn default_gesture_window() -> usize {
    3
}
fn default_gesture_consecutive() -> usize {
    2
}
fn default_gesture_cooldown() -> f64 {
    0.5
}

fn default_grid_width() -> u32 {
    120
}
fn default_grid_height() -> u32 {
    40
}
fn default_ramp() -> String {
    crate::ascii::DEFAULT_RAMP.to_string()
}

fn default_brightness() -> f32 {
    1.0
}
fn default_contrast() -> f32 {
    1.0
}
fn default_show_hands() -> bool {
    true
}
fn default_char_size() -> u32 {
    5
}

fn default_capture_path() -> String {
    "./captures".to_string()
}

fn default_event_bus_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AsciicamConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_zero_grid() {
        let mut config = AsciicamConfig::default();
        config.ascii.grid_width = 0;
        assert!(config.validate().is_err());

        config.ascii.grid_width = 120;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_empty_ramp() {
        let mut config = AsciicamConfig::default();
        config.ascii.ramp = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_bad_brightness() {
        let mut config = AsciicamConfig::default();
        config.display.brightness = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_parameters_clamp() {
        let mut display = AsciicamConfig::default().display;
        display.char_size = 100;
        let params = display.initial_parameters();
        assert_eq!(params.char_size, crate::params::CHAR_SIZE_MAX);
    }

    #[test]
    fn test_gesture_config_conversions() {
        let config = AsciicamConfig::default();
        let debounce = config.gesture.debounce();
        assert_eq!(debounce.window, 3);
        assert_eq!(debounce.consecutive, 2);
        assert!(!config.gesture.rules().fist_requires_thumb_down);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config =
            AsciicamConfig::load_from_file("definitely-not-a-real-file.toml").unwrap();
        assert_eq!(config.camera.resolution, (640, 480));
        assert_eq!(config.ascii.ramp, crate::ascii::DEFAULT_RAMP);
    }
}
