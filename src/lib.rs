pub mod ascii;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod events;
pub mod frame;
pub mod hand;
pub mod keyboard;
pub mod landmarks;
pub mod params;
pub mod session;
pub mod source;

pub use ascii::{AsciiFrame, AsciiRenderer, GlyphRamp, DEFAULT_RAMP};
pub use capture::ArtifactWriter;
pub use classifier::{ClassifierRules, GestureClassifier, GestureSymbol};
pub use config::AsciicamConfig;
pub use debounce::{ConfirmedGesture, DebounceConfig, GestureDebouncer};
pub use display::{MemorySink, RenderSink, TerminalSink};
pub use error::{AsciicamError, ClassifierError, RenderError, Result, SourceError};
pub use events::{EventBus, SessionEvent};
pub use frame::{FrameData, FrameFormat, FrameProcessor};
pub use hand::{Hand, HandJoint, Keypoint, KEYPOINT_COUNT};
pub use keyboard::{KeyAction, KeyboardInputHandler};
pub use landmarks::{LandmarkProvider, NullLandmarkProvider, ScriptedLandmarkProvider};
pub use params::DisplayParameters;
pub use session::{Session, SessionEnd, SessionStats};
pub use source::{FrameSource, ReplaySource, TestPatternSource};
