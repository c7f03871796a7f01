pub mod event;
pub mod scroll;
pub mod visibility;

pub use event::{AppEvent, EventHandler};
pub use scroll::ScrollHook;
pub use visibility::{visible_fraction, VisibilityOptions, VisibilityTracker};
