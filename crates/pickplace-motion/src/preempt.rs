use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared preemption request handle.
///
/// The protocol front end holds one clone and raises it; the executor
/// consults another between blocking steps. A request raised during a
/// blocking step takes effect when that step returns.
#[derive(Clone, Debug, Default)]
pub struct PreemptFlag {
    inner: Arc<AtomicBool>,
}

impl PreemptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the request. A flag belongs to one goal and is never lowered;
    /// the next goal gets a fresh one.
    pub fn request(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
