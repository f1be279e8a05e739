use tearcheck::showcase::{self, WORKERS};

#[test]
fn showcase_collects_typed_results_in_spawn_order() {
    let report = showcase::run().expect("no worker should panic");

    assert_eq!(report.summaries.len(), WORKERS);
    for (k, summary) in report.summaries.iter().enumerate() {
        assert_eq!(summary.thread_id, k + 1);
        assert_eq!(summary.token, summary.thread_id * 100 + summary.operations);
        assert!(summary.finished_after.as_nanos() > 0);
    }
}

#[test]
fn showcase_total_is_deterministic() {
    let report = showcase::run().expect("no worker should panic");
    assert_eq!(report.total, showcase::expected_total());
}
