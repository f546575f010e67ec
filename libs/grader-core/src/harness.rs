/// Test Harness - Per-Case Execution Inside the Sandbox
///
/// **Core Responsibility:**
/// Given source code and an ordered test-case list, invoke the target
/// function once per case inside a private interpreter scope and produce one
/// structured outcome per case, preserving input order.
///
/// **Critical Properties:**
/// - Knows nothing about threads, channels, or deadlines (sandbox's job)
/// - A fault in one case never aborts the remaining cases
/// - Each case runs in a fresh interpreter context: source is recompiled per
///   case and no cross-case state can leak
/// - An unparseable source simply faults every case the same way
///
/// The wrapper evaluates the user source inside an IIFE, replaces `console`
/// with an in-memory capture buffer, invokes `<function>(<input>)`, and
/// returns `JSON.stringify({ value, logs })` for the Rust side to parse.
use boa_engine::{Context, Source};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::canonical::canonicalize;
use crate::config::GraderConfig;
use crate::types::{Batch, CaseOutcome, TestCase};

/// Distinct prefix marking fault descriptions in `received`.
pub(crate) const FAULT_PREFIX: &str = "Error:";

/// Run every test case of a batch, in order. Always returns exactly one
/// outcome per case.
pub(crate) fn run_batch(batch: &Batch, config: &GraderConfig) -> Vec<CaseOutcome> {
    batch
        .test_cases
        .iter()
        .map(|case| run_case(&batch.source_code, case, config))
        .collect()
}

fn run_case(source_code: &str, case: &TestCase, config: &GraderConfig) -> CaseOutcome {
    let input = canonicalize(&case.input);
    let expected = canonicalize(&case.expected);

    match invoke(source_code, case, config) {
        Ok(invocation) => {
            let received = canonicalize(&invocation.value);
            let passed = received == expected;
            CaseOutcome {
                input,
                expected,
                received,
                passed,
                error: false,
                output: invocation.logs,
            }
        }
        Err(fault) => {
            debug!(fault = %fault, "Test case faulted");
            CaseOutcome {
                input,
                expected,
                received: format!("{FAULT_PREFIX} {fault}"),
                passed: false,
                error: true,
                output: vec![],
            }
        }
    }
}

struct Invocation {
    value: Value,
    logs: Vec<String>,
}

/// Shape returned by the wrapper's `JSON.stringify` call.
#[derive(Deserialize)]
struct WrapperReply {
    value: Value,
    #[serde(default)]
    logs: Vec<String>,
}

fn invoke(
    source_code: &str,
    case: &TestCase,
    config: &GraderConfig,
) -> Result<Invocation, String> {
    if source_code.len() > config.max_source_code_bytes {
        return Err(format!(
            "source code exceeds the {} byte limit",
            config.max_source_code_bytes
        ));
    }

    let function_name = case.target_function(&config.default_function_name);
    if !is_valid_identifier(function_name) {
        return Err(format!("'{function_name}' is not a valid function name"));
    }

    let wrapper = build_wrapper(source_code, function_name, &case.input)?;

    let mut context = Context::default();
    let limits = context.runtime_limits_mut();
    limits.set_loop_iteration_limit(config.loop_iteration_limit);
    limits.set_recursion_limit(config.recursion_limit);

    let result = context
        .eval(Source::from_bytes(&wrapper))
        .map_err(|err| err.to_string())?;

    let reply_json = result
        .as_string()
        .map(|reply| reply.to_std_string_escaped())
        .ok_or_else(|| "wrapper returned a non-string reply".to_string())?;

    let reply: WrapperReply = serde_json::from_str(&reply_json)
        .map_err(|err| format!("unreadable wrapper reply: {err}"))?;

    Ok(Invocation {
        value: reply.value,
        logs: reply.logs,
    })
}

/// Wrapper evaluated for each test case. The user source is spliced into a
/// private function scope with `console` rebound to a capture buffer;
/// `undefined` return values fold to `null` so the reply always serializes.
fn build_wrapper(
    source_code: &str,
    function_name: &str,
    input: &Value,
) -> Result<String, String> {
    let input_json = serde_json::to_string(input)
        .map_err(|err| format!("unserializable test input: {err}"))?;
    // The input rides inside a single-quoted JS string literal.
    let input_escaped = input_json.replace('\\', "\\\\").replace('\'', "\\'");

    Ok(format!(
        r#"(function() {{
    var __logs = [];
    var console = {{
        log: function() {{
            var parts = [];
            for (var i = 0; i < arguments.length; i++) {{
                var arg = arguments[i];
                if (typeof arg === 'object') {{
                    parts.push(JSON.stringify(arg));
                }} else {{
                    parts.push(String(arg));
                }}
            }}
            __logs.push(parts.join(' '));
        }},
        warn: function() {{ console.log.apply(null, arguments); }},
        error: function() {{ console.log.apply(null, arguments); }},
        info: function() {{ console.log.apply(null, arguments); }}
    }};

    {source_code}
    ;
    var __input = JSON.parse('{input_escaped}');
    var __result = {function_name}(__input);
    return JSON.stringify({{
        value: __result === undefined ? null : __result,
        logs: __logs
    }});
}})()"#
    ))
}

/// The function name is spliced into the wrapper, so only plain identifiers
/// are accepted.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
