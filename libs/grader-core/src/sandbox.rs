/// Execution Sandbox - Isolated, Restartable Execution Context
///
/// **Core Responsibility:**
/// Run one batch at a time in a private interpreter with no ambient access
/// to host state. The host shares nothing with the sandbox beyond the
/// request channel and the per-batch reply channel.
///
/// **Lifecycle:**
/// Idle (blocked on the request channel) -> Running -> Idle on completion,
/// or destroyed by the supervisor. There is no cooperative pause: once user
/// code is running, the only way out short of natural completion is
/// destruction. `kill` drops the channels and detaches the thread; the
/// interpreter's iteration budget bounds how long a detached runaway
/// evaluation can keep spinning.
use std::sync::mpsc;
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::config::GraderConfig;
use crate::error::BatchError;
use crate::harness;
use crate::types::{Batch, SandboxReply};

/// An isolated execution context the supervisor can spawn, feed one batch at
/// a time, and destroy. Implementations swap per target platform (OS thread
/// here; a separate process would also fit).
pub trait IsolatedExecutor: Send {
    fn spawn(config: &GraderConfig) -> Self
    where
        Self: Sized;

    /// Hand a batch to the executor. The receiver resolves with the single
    /// `DONE` reply, or errors if the executor died before replying.
    fn submit(&self, batch: Batch) -> Result<oneshot::Receiver<SandboxReply>, BatchError>;

    /// Destroy the executor regardless of its internal state. No partial
    /// results are salvaged.
    fn kill(self);
}

struct SandboxJob {
    batch: Batch,
    reply: oneshot::Sender<SandboxReply>,
}

/// Sandbox backed by a dedicated OS thread owning a private interpreter.
pub struct ThreadSandbox {
    id: Uuid,
    requests: mpsc::Sender<SandboxJob>,
}

impl IsolatedExecutor for ThreadSandbox {
    fn spawn(config: &GraderConfig) -> Self {
        let (requests, inbox) = mpsc::channel::<SandboxJob>();
        let id = Uuid::new_v4();
        let config = config.clone();
        thread::spawn(move || sandbox_loop(id, inbox, config));
        debug!(sandbox_id = %id, "Sandbox spawned");
        Self { id, requests }
    }

    fn submit(&self, batch: Batch) -> Result<oneshot::Receiver<SandboxReply>, BatchError> {
        let (reply, pending) = oneshot::channel();
        self.requests
            .send(SandboxJob { batch, reply })
            .map_err(|_| BatchError::Crashed("sandbox request channel is closed".to_string()))?;
        Ok(pending)
    }

    fn kill(self) {
        debug!(sandbox_id = %self.id, "Sandbox destroyed");
        // Dropping `requests` ends the loop of an idle thread. A thread
        // stuck in user code is detached; the interpreter budget reaps it.
    }
}

fn sandbox_loop(id: Uuid, inbox: mpsc::Receiver<SandboxJob>, config: GraderConfig) {
    while let Ok(SandboxJob { batch, reply }) = inbox.recv() {
        trace!(sandbox_id = %id, batch_id = %batch.id, "Batch received");
        let results = harness::run_batch(&batch, &config);
        if reply.send(SandboxReply::Done { results }).is_err() {
            // The supervisor stopped waiting and discarded this sandbox.
            break;
        }
    }
    trace!(sandbox_id = %id, "Sandbox loop ended");
}
