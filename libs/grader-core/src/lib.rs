//! Sandboxed code-grading engine.
//!
//! Accepts a learner's free-form JavaScript snippet plus an ordered battery
//! of test cases, runs the snippet's target function against each input
//! inside an isolated, time-bounded interpreter, and reports one outcome per
//! case. The host never hangs or crashes, even when the submitted code is
//! malformed, throws, or loops forever: a runaway batch is cut off by the
//! [`Supervisor`], which destroys the sandbox and spawns a fresh one.
//!
//! Entry point: build a [`GraderConfig`], create a [`Supervisor`], and call
//! [`Supervisor::submit_batch`].

pub mod canonical;
pub mod config;
pub mod error;
mod harness;
pub mod sandbox;
pub mod supervisor;
pub mod types;

pub use config::GraderConfig;
pub use error::BatchError;
pub use sandbox::{IsolatedExecutor, ThreadSandbox};
pub use supervisor::Supervisor;
pub use types::{Batch, CaseOutcome, SandboxReply, TestCase};
