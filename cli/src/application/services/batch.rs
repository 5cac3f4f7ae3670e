//! Application service: run the test command on many instances at once.
//!
//! Every target gets its own blocking task, its own session, and its own
//! sinks. Nothing mutable is shared between tasks.

use std::sync::Arc;

use bootstrap_common::{ExecutionResult, ExitOutcome};
use serde::Serialize;
use tracing::{debug, error};

use crate::application::ports::{Pacer, SessionProvider};
use crate::application::services::remote_test::{ExecSinks, RemoteCommandRunner};
use crate::domain::Target;

/// Counts of how a batch went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Exited with status 0.
    pub passed: usize,
    /// Exited with a nonzero status.
    pub failed: usize,
    /// No exit status: no session, transport failure, or cancelled.
    pub incomplete: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut acc, r| {
                match r.outcome {
                    ExitOutcome::Exited { code: 0 } => acc.passed += 1,
                    ExitOutcome::Exited { .. } => acc.failed += 1,
                    _ => acc.incomplete += 1,
                }
                acc
            })
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.incomplete == 0
    }
}

/// Open a session to each target and run the command on it, concurrently.
///
/// `make_sinks` is called once per target, on the calling task, before the
/// target's work starts. Results come back in target order. A task that
/// panics is reported as a transport failure for its instance, and a task
/// that starts after cancellation is reported cancelled without connecting.
pub async fn run_batch<S, P, F>(
    targets: Vec<Target>,
    provider: Arc<S>,
    runner: Arc<RemoteCommandRunner<P>>,
    make_sinks: F,
) -> Vec<ExecutionResult>
where
    S: SessionProvider + Send + Sync + 'static,
    P: Pacer + Send + Sync + 'static,
    F: Fn(&Target) -> ExecSinks,
{
    let handles: Vec<_> = targets
        .into_iter()
        .map(|target| {
            let sinks = make_sinks(&target);
            let provider = Arc::clone(&provider);
            let runner = Arc::clone(&runner);
            let instance = target.instance.clone();
            debug!(instance = %instance.id, "scheduling remote test");
            let handle = tokio::task::spawn_blocking(move || {
                if runner.is_cancelled() {
                    debug!(instance = %target.instance.id, "cancelled before connecting");
                    return ExecutionResult::new(target.instance, ExitOutcome::Cancelled);
                }
                let session = provider.open(&target);
                runner.run(session, sinks)
            });
            (instance, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (instance, handle) in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                error!(instance = %instance.id, error = %e, "remote test task failed");
                results.push(ExecutionResult::new(instance, ExitOutcome::TransportFailed));
            }
        }
    }
    results
}
