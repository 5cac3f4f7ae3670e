//! Cancellable wait between output polls.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::application::ports::{Pacer, Pause};

/// Longest stretch slept before the token is checked again.
const CHECK_SLICE: Duration = Duration::from_millis(50);

/// Blocking [`Pacer`] that sleeps for the requested interval unless the
/// shared token is cancelled first.
#[derive(Clone, Default)]
pub struct TokenPacer {
    cancel: CancellationToken,
}

impl TokenPacer {
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

impl Pacer for TokenPacer {
    fn pause(&self, interval: Duration) -> Pause {
        let deadline = Instant::now() + interval;
        loop {
            if self.cancel.is_cancelled() {
                return Pause::Cancelled;
            }
            let now = Instant::now();
            if now >= deadline {
                return Pause::Elapsed;
            }
            std::thread::sleep((deadline - now).min(CHECK_SLICE));
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
