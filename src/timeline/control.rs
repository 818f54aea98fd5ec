use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop flag for a running timeline.
///
/// Clones share the flag, so a host can keep one while `Timeline::run` is
/// borrowed. The run loop only looks at it before dispatching a command; an
/// in-flight settle delay always completes.
pub struct StopControl {
    flag: Arc<AtomicBool>,
}

impl StopControl {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

impl Clone for StopControl {
    fn clone(&self) -> Self {
        Self {
            flag: Arc::clone(&self.flag),
        }
    }
}

impl Default for StopControl {
    fn default() -> Self {
        Self::new()
    }
}
