//! Frame batcher combining the pending queues with a frame source
//!
//! This is the main interface for deferred read/write scheduling. Clone the
//! handle freely; clones share the same pending frame.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use tracing::{debug, error};

use super::source::FrameSource;
use crate::error::Result;

/// A deferred unit of work queued on a [`FrameBatcher`].
pub type FrameTask = Box<dyn FnOnce() -> Result<()>>;

/// Work accumulated between two frame ticks.
#[derive(Default)]
struct PendingFrame {
    reads: Vec<FrameTask>,
    writes: Vec<FrameTask>,
    /// True iff a flush has been requested from the source and not yet run.
    scheduled: bool,
}

/// Batches deferred reads and writes into one pass per frame tick.
///
/// Any number of tasks queued within one frame window drain in a single
/// flush: every read first, in queue order, then every write, in queue
/// order. Tasks queued from inside a running flush land in a fresh batch
/// and run at the next tick.
///
/// A failing task does not stop its flush; the failure is logged and the
/// remaining tasks in the phase still run. Nothing is retried. There is no
/// way to remove a task once queued.
///
/// Handles are `Clone` but not `Send`; all queueing and flushing happens on
/// the thread that owns the event loop.
#[derive(Clone)]
pub struct FrameBatcher {
    frame: Rc<RefCell<PendingFrame>>,
    source: Rc<dyn FrameSource>,
}

impl FrameBatcher {
    /// Create a batcher flushing through the given frame source.
    pub fn new(source: Rc<dyn FrameSource>) -> Self {
        Self {
            frame: Rc::new(RefCell::new(PendingFrame::default())),
            source,
        }
    }

    /// Queue a read task for the next flush.
    ///
    /// Reads run before any write queued for the same frame. Use reads for
    /// measuring state that writes of the same frame would invalidate.
    pub fn read(&self, task: impl FnOnce() -> Result<()> + 'static) {
        self.frame.borrow_mut().reads.push(Box::new(task));
        self.request_flush();
    }

    /// Queue a write task for the next flush.
    pub fn write(&self, task: impl FnOnce() -> Result<()> + 'static) {
        self.frame.borrow_mut().writes.push(Box::new(task));
        self.request_flush();
    }

    /// True while a flush has been requested and has not yet run.
    pub fn is_scheduled(&self) -> bool {
        self.frame.borrow().scheduled
    }

    /// Number of tasks waiting for the next flush.
    pub fn pending(&self) -> usize {
        let frame = self.frame.borrow();
        frame.reads.len() + frame.writes.len()
    }

    fn request_flush(&self) {
        {
            let mut frame = self.frame.borrow_mut();
            if frame.scheduled {
                return;
            }
            frame.scheduled = true;
        }
        let frame = Rc::clone(&self.frame);
        self.source.request_frame(Box::new(move || Self::flush(&frame)));
    }

    /// Drain and run the pending frame: all reads, then all writes.
    ///
    /// `scheduled` is cleared before any task runs, so a task queueing new
    /// work schedules a fresh flush for the next tick instead of extending
    /// the current one.
    fn flush(frame: &Rc<RefCell<PendingFrame>>) {
        let (reads, writes) = {
            let mut pending = frame.borrow_mut();
            pending.scheduled = false;
            (
                mem::take(&mut pending.reads),
                mem::take(&mut pending.writes),
            )
        };

        debug!("flush: {} reads, {} writes", reads.len(), writes.len());
        run_phase(reads, "read");
        run_phase(writes, "write");
    }
}

fn run_phase(tasks: Vec<FrameTask>, phase: &str) {
    for task in tasks {
        if let Err(e) = task() {
            error!("{} task failed: {}", phase, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::source::TickSource;
    use crate::error::Error;

    fn setup() -> (FrameBatcher, Rc<TickSource>, Rc<RefCell<Vec<&'static str>>>) {
        let source = Rc::new(TickSource::new());
        let batcher = FrameBatcher::new(source.clone() as Rc<dyn FrameSource>);
        (batcher, source, Rc::new(RefCell::new(Vec::new())))
    }

    fn record(
        log: &Rc<RefCell<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl FnOnce() -> Result<()> {
        let log = log.clone();
        move || {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }

    #[test]
    fn test_reads_run_before_writes() {
        let (batcher, source, log) = setup();

        batcher.write(record(&log, "a"));
        batcher.read(record(&log, "b"));
        batcher.write(record(&log, "c"));

        assert!(source.fire());
        assert_eq!(*log.borrow(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_single_flush_per_window() {
        let (batcher, source, log) = setup();

        for tag in ["a", "b", "c"] {
            batcher.write(record(&log, tag));
        }

        assert!(source.fire());
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        // No second flush was requested for the same window
        assert!(!source.fire());
    }

    #[test]
    fn test_flush_drains_and_resets() {
        let (batcher, source, log) = setup();

        batcher.read(record(&log, "a"));
        assert!(batcher.is_scheduled());
        assert_eq!(batcher.pending(), 1);

        source.fire();
        assert!(!batcher.is_scheduled());
        assert_eq!(batcher.pending(), 0);

        // A new task schedules exactly one new flush
        batcher.write(record(&log, "b"));
        assert!(batcher.is_scheduled());
        assert!(source.fire());
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_task_queued_during_flush_runs_next_tick() {
        let (batcher, source, log) = setup();

        let inner_batcher = batcher.clone();
        let inner_log = log.clone();
        batcher.write(move || {
            inner_batcher.write(record(&inner_log, "inner"));
            inner_log.borrow_mut().push("outer");
            Ok(())
        });

        source.fire();
        assert_eq!(*log.borrow(), vec!["outer"]);
        assert!(batcher.is_scheduled());

        source.fire();
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn test_failing_task_does_not_stop_phase() {
        let (batcher, source, log) = setup();

        batcher.write(record(&log, "first"));
        batcher.write(|| Err(Error::Callback("boom".to_string())));
        batcher.write(record(&log, "third"));

        source.fire();
        assert_eq!(*log.borrow(), vec!["first", "third"]);

        // Subsequent frames are unaffected
        batcher.write(record(&log, "later"));
        source.fire();
        assert_eq!(*log.borrow(), vec!["first", "third", "later"]);
    }

    #[test]
    fn test_duplicate_read_runs_each_time() {
        let (batcher, source, log) = setup();

        batcher.read(record(&log, "x"));
        batcher.read(record(&log, "x"));

        source.fire();
        assert_eq!(*log.borrow(), vec!["x", "x"]);
    }

    #[test]
    fn test_no_tasks_no_schedule() {
        let (batcher, source, _log) = setup();

        assert!(!batcher.is_scheduled());
        assert!(!source.has_pending());
        assert!(!source.fire());
    }
}
