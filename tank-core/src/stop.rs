use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, one-way stop signal for a frame loop.
///
/// Clones observe the same flag. Once stopped it stays stopped.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    stopped: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
