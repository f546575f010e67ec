// Grading engine configuration
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_FUNCTION_NAME: &str = "solution";

/// Safety limits to keep pathological inputs out of the interpreter
const MAX_SOURCE_CODE_BYTES: usize = 1024 * 1024; // 1MB
const LOOP_ITERATION_LIMIT: u64 = 2_000_000_000;
const RECURSION_LIMIT: usize = 512;

/// Runtime configuration for the grading engine.
///
/// The interpreter budgets (`loop_iteration_limit`, `recursion_limit`) are a
/// backstop, not the timeout mechanism: the supervisor's deadline is what
/// bounds a batch. The budgets only guarantee that a detached sandbox thread
/// spinning in user code eventually dies instead of leaking a core forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Deadline budget per batch, in milliseconds.
    pub timeout_ms: u64,
    /// Function invoked when a test case names none.
    pub default_function_name: String,
    /// Submitted source larger than this faults every case.
    pub max_source_code_bytes: usize,
    pub loop_iteration_limit: u64,
    pub recursion_limit: usize,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_function_name: DEFAULT_FUNCTION_NAME.to_string(),
            max_source_code_bytes: MAX_SOURCE_CODE_BYTES,
            loop_iteration_limit: LOOP_ITERATION_LIMIT,
            recursion_limit: RECURSION_LIMIT,
        }
    }
}

impl GraderConfig {
    /// Build a configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            timeout_ms: env_parse("GRADER_TIMEOUT_MS", base.timeout_ms),
            default_function_name: std::env::var("GRADER_FUNCTION_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(base.default_function_name),
            max_source_code_bytes: env_parse(
                "GRADER_MAX_SOURCE_BYTES",
                base.max_source_code_bytes,
            ),
            loop_iteration_limit: env_parse(
                "GRADER_LOOP_ITERATION_LIMIT",
                base.loop_iteration_limit,
            ),
            recursion_limit: env_parse("GRADER_RECURSION_LIMIT", base.recursion_limit),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}
