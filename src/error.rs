use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsciicamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Frame source error: {0}")]
    Source(#[from] SourceError),

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl AsciicamError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Errors produced while validating or classifying hand landmarks
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Invalid keypoint at joint index {joint}: ({x}, {y})")]
    InvalidKeypoint { joint: usize, x: f32, y: f32 },

    #[error("Expected 21 keypoints, got {count}")]
    WrongKeypointCount { count: usize },
}

/// Errors produced by the ASCII rendering pipeline
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Format conversion failed: {details}")]
    FormatConversion { details: String },

    #[error("Glyph ramp must not be empty")]
    EmptyRamp,

    #[error("Invalid glyph grid dimensions: {width}x{height}")]
    InvalidGridSize { width: u32, height: u32 },
}

/// Errors produced by frame sources
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Frame source device unavailable: {details}")]
    DeviceUnavailable { details: String },

    #[error("Frame read failed: {details}")]
    ReadFailed { details: String },
}

pub type Result<T> = std::result::Result<T, AsciicamError>;
