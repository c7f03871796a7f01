//! Frame batching for deferred reads and writes
//!
//! Coalesces arbitrarily many deferred "read" and "write" callbacks queued
//! within one frame window into a single execution pass at the next tick,
//! reads before writes. Interleaving layout reads with buffer mutations
//! forces redundant recomputation; grouping all reads first bounds mutation
//! work to once per frame.
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use cadenza_core::batch::{FrameBatcher, TickSource};
//!
//! let source = Rc::new(TickSource::default());
//! let batcher = FrameBatcher::new(source.clone());
//!
//! batcher.read(|| {
//!     // measure something
//!     Ok(())
//! });
//! batcher.write(|| {
//!     // mutate something
//!     Ok(())
//! });
//!
//! // In the event loop, once per tick:
//! source.fire();
//! ```

pub mod frame;
pub mod source;

pub use frame::{FrameBatcher, FrameTask};
pub use source::{FrameCallback, FrameSource, TickSource};
