use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One test case supplied by the task author.
///
/// `input` and `expected` are arbitrary structured values (nested
/// mappings/sequences/scalars). Ordering within a batch is significant and
/// preserved in the results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Value,
    pub expected: Value,
    /// Overrides the function under test; falls back to the configured
    /// default (`solution`) when absent, empty, or whitespace-only.
    #[serde(
        default,
        rename = "functionName",
        skip_serializing_if = "Option::is_none"
    )]
    pub function_name: Option<String>,
}

impl TestCase {
    /// Name of the function to invoke for this case.
    pub fn target_function<'a>(&'a self, default_name: &'a str) -> &'a str {
        match self.function_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => default_name,
        }
    }
}

/// One "run tests" request: source code plus an ordered test-case list.
///
/// Immutable once submitted. Produces exactly one ordered outcome sequence
/// (same length and order as `test_cases`) or a single batch-level fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub source_code: String,
    pub test_cases: Vec<TestCase>,
}

impl Batch {
    pub fn new(source_code: impl Into<String>, test_cases: Vec<TestCase>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_code: source_code.into(),
            test_cases,
        }
    }
}

/// Per-test-case result record.
///
/// `input`, `expected` and `received` are canonical string serializations
/// suitable for direct display. On a fault, `received` holds the fault
/// description instead and `error` is set; such outcomes never pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub input: String,
    pub expected: String,
    pub received: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    /// `console.log` lines captured during the invocation, as a diagnostic.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
}

/// The sandbox's one-shot reply to a batch: the full ordered result list.
///
/// There is no partial streaming - a batch yields exactly one `DONE` reply,
/// or no reply at all (the supervisor turns a dropped reply channel or an
/// expired deadline into a [`BatchError`](crate::error::BatchError)).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SandboxReply {
    #[serde(rename = "DONE")]
    Done { results: Vec<CaseOutcome> },
}
