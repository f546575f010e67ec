use thiserror::Error;

/// Batch-level terminal faults.
///
/// Per-test-case faults (syntax errors, thrown exceptions, mismatches) never
/// surface here - the harness folds them into that case's [`CaseOutcome`].
/// A `BatchError` means the whole batch produced no results and the sandbox
/// was destroyed and respawned before the error was returned.
///
/// [`CaseOutcome`]: crate::types::CaseOutcome
#[derive(Debug, Error)]
pub enum BatchError {
    /// The batch exceeded its deadline budget. The running code may contain
    /// an infinite loop; no partial results are salvaged.
    #[error("batch exceeded the {budget_ms} ms deadline; the sandbox was destroyed")]
    Timeout { budget_ms: u64 },

    /// The sandbox terminated outside the normal reply path.
    #[error("sandbox failed outside the normal reply path: {0}")]
    Crashed(String),
}
