use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// Trailing-edge debounce
///
/// Every call to [`Debouncer::settle`] supersedes the previous ones; after
/// the quiet window only the most recent caller gets `true`.
#[derive(Debug)]
pub struct Debouncer {
    generation: AtomicU64,
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            window,
        }
    }

    pub async fn settle(&self) -> bool {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        sleep(self.window).await;
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Supersede any pending caller without starting a new window
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
