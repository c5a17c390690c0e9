//! Stop signal shared by a running search and the loop that hosts it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set once, observed between search iterations and app-loop turns.
///
/// Clones observe the same signal, so the side that owns the input can keep
/// one and hand another to the search or driver.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Later calls are no-ops.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
