// CLI commands for running grading batches
use anyhow::{bail, Context, Result};
use grader_core::{Batch, BatchError, CaseOutcome, GraderConfig, Supervisor};
use std::fs;
use std::time::Instant;

/// Load a batch from a JSON file and run it to completion.
pub async fn run_batch_file(file: &str, timeout_ms: Option<u64>) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read batch file: {}", file))?;
    let batch: Batch = serde_json::from_str(&content)
        .context("Failed to parse batch file")?;

    let mut config = GraderConfig::from_env();
    if let Some(budget) = timeout_ms {
        config.timeout_ms = budget;
    }

    println!("→ Running {} test case(s)", batch.test_cases.len());
    println!("  Timeout budget: {}ms", config.timeout_ms);
    println!();

    let mut supervisor = Supervisor::new(config);
    let started = Instant::now();
    let results = match supervisor.run(batch).await {
        Ok(results) => results,
        Err(BatchError::Timeout { budget_ms }) => {
            bail!("Batch timed out after {}ms - the code may contain an infinite loop", budget_ms)
        }
        Err(err) => bail!("Batch failed: {}", err),
    };
    let elapsed = started.elapsed();

    print_results(&results);

    let passed = results.iter().filter(|outcome| outcome.passed).count();
    println!();
    println!("→ {} / {} passed in {}ms", passed, results.len(), elapsed.as_millis());

    if passed != results.len() {
        bail!("{} test case(s) failed", results.len() - passed);
    }
    Ok(())
}

fn print_results(results: &[CaseOutcome]) {
    for (idx, outcome) in results.iter().enumerate() {
        if outcome.passed {
            println!("  ✅ Test {}: passed", idx + 1);
        } else {
            let kind = if outcome.error { "error" } else { "failed" };
            println!("  ❌ Test {}: {}", idx + 1, kind);
            println!("     Input:    {}", outcome.input);
            println!("     Expected: {}", outcome.expected);
            println!("     Received: {}", outcome.received);
        }
        for line in &outcome.output {
            println!("     log: {}", line);
        }
    }
}

/// Write an example batch file the `run` command accepts.
pub fn write_sample(path: &str) -> Result<()> {
    let sample = serde_json::json!({
        "sourceCode": "function solution(x) {\n    return x + 1;\n}",
        "testCases": [
            { "input": 1, "expected": 2 },
            { "input": 41, "expected": 42 },
            { "input": -1, "expected": 0 }
        ]
    });

    let json_content = serde_json::to_string_pretty(&sample)
        .context("Failed to serialize sample batch")?;
    fs::write(path, json_content)
        .with_context(|| format!("Failed to write {}", path))?;

    println!("✅ Sample batch written to {}", path);
    println!("\n📋 Next steps:");
    println!("  1. Edit the source code and test cases");
    println!("  2. Run it: grader-cli run --file {}", path);

    Ok(())
}
