//! Integration tests for EnumerationService: input validation, enumeration and
//! single-path traces.

use rstest::rstest;

use dtgen::application::services::EnumerationService;
use dtgen::application::{AlgorithmKind, ApplicationError};
use dtgen::config::Settings;
use dtgen::domain::Branch;
use dtgen::util::testing;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn service(max_elements: usize) -> EnumerationService {
    testing::init_test_setup();
    EnumerationService::new(Settings {
        max_elements,
        ..Settings::default()
    })
}

#[test]
fn given_valid_input_when_enumerating_then_returns_tree_and_runs() {
    let enumeration = service(6)
        .enumerate(AlgorithmKind::Bubble, &strings(&["c", "b", "a"]))
        .unwrap();

    assert_eq!(enumeration.algorithm, AlgorithmKind::Bubble);
    assert_eq!(enumeration.tree.leaf_count(), 6);
    assert_eq!(enumeration.runs, 8);
}

#[test]
fn given_too_many_elements_when_enumerating_then_dataset_too_large() {
    let err = service(3)
        .enumerate(AlgorithmKind::Bubble, &strings(&["d", "c", "b", "a"]))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::DatasetTooLarge { len: 4, max: 3 }));
}

#[rstest]
#[case(&["a", "b", "a"], "a")]
#[case(&["x", "y", "y"], "y")]
fn given_duplicate_elements_when_enumerating_then_rejected(#[case] items: &[&str], #[case] dup: &str) {
    let err = service(6)
        .enumerate(AlgorithmKind::Insertion, &strings(items))
        .unwrap_err();

    match err {
        ApplicationError::DuplicateElement(element) => assert_eq!(element, dup),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_full_path_when_tracing_then_reports_steps_and_result() {
    let trace = service(6)
        .trace(
            AlgorithmKind::Bubble,
            &strings(&["c", "b", "a"]),
            &[Branch::Yes, Branch::Yes, Branch::No],
        )
        .unwrap();

    let steps: Vec<String> = trace
        .steps
        .iter()
        .map(|(comparison, branch)| format!("{comparison} [{branch}]"))
        .collect();
    assert_eq!(steps, vec!["c > b [Yes]", "c > a [Yes]", "b > a [No]"]);
    assert_eq!(trace.data, strings(&["b", "a", "c"]));
    assert_eq!(trace.unscripted, 0);
    assert_eq!(trace.unused, 0);
    assert_eq!(trace.contradicted, None);
}

#[rstest]
#[case(&[Branch::Yes, Branch::No, Branch::Yes], "b > c")]
#[case(&[Branch::No, Branch::No, Branch::Yes], "c > b")]
fn given_contradicting_path_when_tracing_then_reports_contradicted_step(
    #[case] path: &[Branch],
    #[case] pruned_question: &str,
) {
    let trace = service(6)
        .trace(AlgorithmKind::Bubble, &strings(&["c", "b", "a"]), path)
        .unwrap();

    assert_eq!(trace.contradicted, Some(2));
    assert_eq!(trace.steps[2].0.to_string(), pruned_question);
    assert_eq!(trace.steps.len(), 3);
}

#[test]
fn given_short_path_when_tracing_then_counts_unscripted() {
    let trace = service(6)
        .trace(AlgorithmKind::Bubble, &strings(&["c", "b", "a"]), &[Branch::Yes])
        .unwrap();

    assert_eq!(trace.steps.len(), 1);
    assert_eq!(trace.unscripted, 2);
    assert_eq!(trace.data, strings(&["b", "c", "a"]));
}

#[test]
fn given_long_path_when_tracing_then_counts_unused() {
    let trace = service(6)
        .trace(
            AlgorithmKind::Insertion,
            &strings(&["b", "a"]),
            &[Branch::No, Branch::Yes, Branch::Yes],
        )
        .unwrap();

    assert_eq!(trace.steps.len(), 1);
    assert_eq!(trace.unused, 2);
    assert_eq!(trace.data, strings(&["b", "a"]));
}
