//! End-to-end batch flow through the public API: caller -> supervisor ->
//! sandbox -> harness and back.

use grader_core::{BatchError, GraderConfig, Supervisor, TestCase};
use serde_json::{json, Value};

fn case(input: Value, expected: Value) -> TestCase {
    TestCase {
        input,
        expected,
        function_name: None,
    }
}

#[tokio::test]
async fn add_one_snippet_passes() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let results = supervisor
        .submit_batch(
            "function solution(x) { return x + 1; }",
            vec![case(json!(1), json!(2))],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].passed);
    assert_eq!(results[0].received, "2");
    assert_eq!(results[0].expected, "2");
}

#[tokio::test]
async fn integral_float_expected_matches_integer_result() {
    // Task authors write `2.0` where the function computes `2`; the grading
    // value domain has one number type, so both canonicalize to "2".
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let results = supervisor
        .submit_batch(
            "function solution(x) { return x + 1; }",
            vec![case(json!(1), json!(2.0)), case(json!(1.0), json!(2))],
        )
        .await
        .unwrap();

    assert!(results[0].passed);
    assert_eq!(results[0].expected, "2");
    assert_eq!(results[0].received, "2");
    assert!(results[1].passed);
    assert_eq!(results[1].input, "1");
}

#[tokio::test]
async fn results_are_length_matched_and_ordered() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let inputs: Vec<TestCase> = (0..10).map(|n| case(json!(n), json!(n * n))).collect();
    let results = supervisor
        .submit_batch("function solution(x) { return x * x; }", inputs)
        .await
        .unwrap();

    assert_eq!(results.len(), 10);
    for (n, outcome) in results.iter().enumerate() {
        assert_eq!(outcome.input, n.to_string());
        assert!(outcome.passed);
    }
}

#[tokio::test]
async fn syntax_error_completes_with_error_outcomes() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let results = supervisor
        .submit_batch(
            "function solution(x { return x; }",
            vec![case(json!(1), json!(1)), case(json!(2), json!(2))],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for outcome in &results {
        assert!(outcome.error);
        assert!(!outcome.passed);
    }
}

#[tokio::test]
async fn infinite_loop_times_out_and_next_batch_succeeds() {
    // Small deadline so the test stays fast; the interpreter budget is left
    // at its default, far beyond what the deadline window can execute, so
    // the spin loop resolves as a batch-level timeout rather than a
    // per-case fault.
    let config = GraderConfig {
        timeout_ms: 200,
        ..GraderConfig::default()
    };
    let mut supervisor = Supervisor::new(config);

    let err = supervisor
        .submit_batch(
            "function solution(x) { while (true) {} }",
            vec![case(json!(1), json!(1)), case(json!(2), json!(2))],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::Timeout { budget_ms: 200 }));

    // Respawn correctness: the next batch runs on a fresh sandbox.
    let results = supervisor
        .submit_batch(
            "function solution(x) { return x + 1; }",
            vec![case(json!(41), json!(42))],
        )
        .await
        .unwrap();
    assert!(results[0].passed);
}

#[tokio::test]
async fn empty_test_case_list_is_a_normal_completion() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let results = supervisor
        .submit_batch("function solution(x) { return x; }", vec![])
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn missing_function_name_invokes_solution() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let source = r#"
        function helper(x) { return x - 1; }
        function solution(x) { return helper(x) + 2; }
    "#;
    let results = supervisor
        .submit_batch(source, vec![case(json!(1), json!(2))])
        .await
        .unwrap();
    assert!(results[0].passed);
}

#[tokio::test]
async fn per_case_function_name_override() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let source = r#"
        function solution(x) { return 0; }
        function double(x) { return x * 2; }
    "#;
    let results = supervisor
        .submit_batch(
            source,
            vec![
                case(json!(3), json!(0)),
                TestCase {
                    input: json!(3),
                    expected: json!(6),
                    function_name: Some("double".to_string()),
                },
            ],
        )
        .await
        .unwrap();
    assert!(results[0].passed);
    assert!(results[1].passed);
}

#[tokio::test]
async fn faulting_case_does_not_abort_the_batch() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    let source = r#"
        function solution(x) {
            if (x.fail) { throw new Error("requested failure"); }
            return x.value;
        }
    "#;
    let results = supervisor
        .submit_batch(
            source,
            vec![
                case(json!({ "fail": true, "value": 0 }), json!(0)),
                case(json!({ "fail": false, "value": 9 }), json!(9)),
            ],
        )
        .await
        .unwrap();

    assert!(results[0].error);
    assert!(results[0].received.contains("requested failure"));
    assert!(results[1].passed);
}

#[tokio::test]
async fn sequential_batches_share_one_supervisor() {
    let mut supervisor = Supervisor::new(GraderConfig::default());
    for round in 0..3 {
        let results = supervisor
            .submit_batch(
                "function solution(x) { return x + 1; }",
                vec![case(json!(round), json!(round + 1))],
            )
            .await
            .unwrap();
        assert!(results[0].passed);
    }
}
