pub mod batch;
pub mod config;
pub mod error;
pub mod motion;

pub use batch::{FrameBatcher, FrameSource, TickSource};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use motion::{CapabilityTier, DurationClass};
