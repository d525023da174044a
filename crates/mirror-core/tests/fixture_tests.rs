//! Golden-tree scenarios from `test-fixtures/trees`

use mirror_core::{MemoryObserver, ReconcileOptions, Reconciler};
use mirror_test_utils::TestTree;
use pretty_assertions::assert_eq;

const BASIC_MESSAGES: [&str; 6] = [
    "docs/guide/intro.md updated.",
    "docs/readme.md copied to backup directory as a new file.",
    "src has been purged.",
    "src/main.rs copied to backup directory as a new file.",
    "obsolete has been purged.",
    "stray.tmp has been purged.",
];

#[test]
fn basic_tree_is_mirrored_in_deterministic_order() {
    let tree = TestTree::from_fixture("basic");
    let observer = MemoryObserver::new();

    let report = Reconciler::new(tree.source(), tree.replica())
        .reconcile(&observer)
        .unwrap();

    assert_eq!(observer.messages(), BASIC_MESSAGES);
    assert!(report.is_clean());
    tree.assert_replica_file("docs/guide/intro.md", "intro v2\n");
    tree.assert_replica_file("notes.txt", "keep me\n");
    tree.assert_replica_absent("obsolete");
    tree.assert_replica_absent("stray.tmp");
    tree.assert_mirrors();
}

#[test]
fn basic_tree_dry_run_matches_real_run() {
    let tree = TestTree::from_fixture("basic");

    let report = Reconciler::new(tree.source(), tree.replica())
        .with_options(ReconcileOptions { dry_run: true })
        .reconcile(&MemoryObserver::new())
        .unwrap();

    assert_eq!(report.messages(), BASIC_MESSAGES);
    tree.assert_replica_file("src", "not a dir\n");
    tree.assert_replica_file("obsolete/deeper/older.log", "stale\n");
}

#[test]
fn basic_tree_summary_counts() {
    let tree = TestTree::from_fixture("basic");

    let report = Reconciler::new(tree.source(), tree.replica())
        .reconcile(&MemoryObserver::new())
        .unwrap();
    let summary = report.summary();

    assert_eq!(summary.created, 2);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.purged, 3);
    assert_eq!(summary.failed, 0);
}
