/// Supervisor - Timeout & Lifecycle Control
///
/// **Core Responsibility:**
/// Own the sandbox's lifecycle: spawn it, send one batch at a time, arm a
/// deadline, and on expiry forcibly destroy and respawn the sandbox instead
/// of waiting for cooperative cancellation (arbitrary user code may never
/// yield).
///
/// **Guarantees:**
/// - The caller receives either a complete, ordered outcome sequence or a
///   single batch-level fault - never a partial mix
/// - At most one in-flight deadline per sandbox lifetime segment, canceled
///   exactly once (on success) or fired exactly once (on timeout)
/// - A fresh Idle sandbox is ready before the next batch is accepted:
///   respawn happens eagerly inside the failure path, not reactively on the
///   next call
/// - Batches never interleave: `run` takes `&mut self`
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::GraderConfig;
use crate::error::BatchError;
use crate::sandbox::{IsolatedExecutor, ThreadSandbox};
use crate::types::{Batch, CaseOutcome, SandboxReply, TestCase};

pub struct Supervisor<E: IsolatedExecutor = ThreadSandbox> {
    config: GraderConfig,
    sandbox: E,
}

impl Supervisor<ThreadSandbox> {
    pub fn new(config: GraderConfig) -> Self {
        Self::with_executor(config)
    }
}

impl<E: IsolatedExecutor> Supervisor<E> {
    pub fn with_executor(config: GraderConfig) -> Self {
        let sandbox = E::spawn(&config);
        Self { config, sandbox }
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Grade `source_code` against `test_cases`. Convenience wrapper over
    /// [`run`](Self::run).
    pub async fn submit_batch(
        &mut self,
        source_code: impl Into<String>,
        test_cases: Vec<TestCase>,
    ) -> Result<Vec<CaseOutcome>, BatchError> {
        self.run(Batch::new(source_code, test_cases)).await
    }

    /// Run one batch to completion or to its deadline.
    ///
    /// On success the outcome sequence is length-matched to the request and
    /// preserves input order. On deadline expiry or sandbox crash the
    /// sandbox is destroyed, a fresh one is spawned, and a single
    /// batch-level fault is returned with no partial results.
    pub async fn run(&mut self, batch: Batch) -> Result<Vec<CaseOutcome>, BatchError> {
        let batch_id = batch.id;
        let case_count = batch.test_cases.len();
        let budget = Duration::from_millis(self.config.timeout_ms);

        info!(
            batch_id = %batch_id,
            test_cases = case_count,
            source_size = batch.source_code.len(),
            timeout_ms = self.config.timeout_ms,
            "Running batch"
        );

        let pending = match self.sandbox.submit(batch) {
            Ok(pending) => pending,
            Err(err) => {
                self.recycle("submit failed");
                return Err(err);
            }
        };

        let started = Instant::now();
        match tokio::time::timeout(budget, pending).await {
            Ok(Ok(SandboxReply::Done { results })) => {
                if results.len() != case_count {
                    self.recycle("result count mismatch");
                    return Err(BatchError::Crashed(format!(
                        "expected {case_count} outcomes, sandbox produced {}",
                        results.len()
                    )));
                }
                info!(
                    batch_id = %batch_id,
                    passed = results.iter().filter(|outcome| outcome.passed).count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Batch complete"
                );
                Ok(results)
            }
            Ok(Err(_)) => {
                warn!(batch_id = %batch_id, "Sandbox died before replying");
                self.recycle("sandbox crash");
                Err(BatchError::Crashed(
                    "sandbox terminated before replying".to_string(),
                ))
            }
            Err(_) => {
                warn!(
                    batch_id = %batch_id,
                    timeout_ms = self.config.timeout_ms,
                    "Batch deadline expired"
                );
                self.recycle("deadline expired");
                Err(BatchError::Timeout {
                    budget_ms: self.config.timeout_ms,
                })
            }
        }
    }

    /// Destroy the current sandbox and eagerly stand up a fresh Idle one so
    /// the next batch does not pay the spawn cost mid-failure.
    fn recycle(&mut self, reason: &str) {
        warn!(reason, "Destroying sandbox and spawning a fresh one");
        let stale = std::mem::replace(&mut self.sandbox, E::spawn(&self.config));
        stale.kill();
    }
}
