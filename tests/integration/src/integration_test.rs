//! End-to-end integration tests
//!
//! These tests exercise the complete flow across passes: the source changes
//! between ticks and each pass brings the replica back in line.

use std::fs;
use std::time::Duration;

use mirror_core::{ActionKind, MemoryObserver, Reconciler, Scheduler};
use mirror_fs::{TraversalOrder, TreeSnapshot};
use mirror_test_utils::TestTree;
use pretty_assertions::assert_eq;

fn scheduler(tree: &TestTree) -> Scheduler {
    Scheduler::new(Reconciler::new(tree.source(), tree.replica()), Duration::ZERO)
}

#[test]
fn replica_follows_source_through_edits() {
    let tree = TestTree::new();
    let scheduler = scheduler(&tree);
    let observer = MemoryObserver::new();

    tree.write_source("notes/today.md", "draft");
    tree.write_source("photos/cat.jpg", [0u8, 1, 2, 3]);
    let first = scheduler.tick(&observer).unwrap();
    assert_eq!(first.count(ActionKind::Create), 2);
    tree.assert_mirrors();

    tree.write_source("notes/today.md", "final");
    fs::remove_dir_all(tree.source().join("photos")).unwrap();
    tree.write_source("photos", "now a file");
    let second = scheduler.tick(&observer).unwrap();
    assert_eq!(
        second.messages(),
        vec![
            "notes/today.md updated.",
            "photos has been purged.",
            "photos copied to backup directory as a new file.",
        ]
    );
    tree.assert_mirrors();

    fs::remove_dir_all(tree.source().join("notes")).unwrap();
    let third = scheduler.tick(&observer).unwrap();
    assert_eq!(third.messages(), vec!["notes has been purged."]);
    tree.assert_mirrors();

    assert!(scheduler.tick(&observer).unwrap().is_noop());
    assert_eq!(observer.messages().len(), 6);
}

#[test]
fn pass_recovers_after_source_disappears_and_returns() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "A");
    let scheduler = scheduler(&tree);
    let observer = MemoryObserver::new();

    scheduler.tick(&observer).unwrap();
    let moved = tree.root().join("moved");
    fs::rename(tree.source(), &moved).unwrap();

    assert!(scheduler.tick(&observer).is_err());
    tree.assert_replica_file("a.txt", "A");

    fs::rename(&moved, tree.source()).unwrap();
    tree.write_source("b.txt", "B");
    let report = scheduler.tick(&observer).unwrap();
    assert_eq!(
        report.messages(),
        vec!["b.txt copied to backup directory as a new file."]
    );
}

#[test]
fn run_ticks_applies_every_pass() {
    let tree = TestTree::new();
    tree.write_source("x/y.txt", "y");
    tree.write_replica("junk.txt", "j");

    let outcomes = scheduler(&tree).run_ticks(3, &MemoryObserver::new());

    let action_counts: Vec<usize> = outcomes
        .iter()
        .map(|outcome| outcome.as_ref().unwrap().actions.len())
        .collect();
    assert_eq!(action_counts, vec![2, 0, 0]);
    tree.assert_mirrors();
}

#[test]
fn snapshots_agree_after_a_pass() {
    let tree = TestTree::new();
    tree.write_source("b/c/d.txt", "d");
    tree.mkdir_source("b/empty");
    tree.write_source("a.txt", "a");
    tree.write_replica("b/stale.txt", "s");

    Reconciler::new(tree.source(), tree.replica())
        .reconcile(&MemoryObserver::new())
        .unwrap();

    let source = TreeSnapshot::scan(&tree.source(), TraversalOrder::ParentsFirst).unwrap();
    let replica = TreeSnapshot::scan(&tree.replica(), TraversalOrder::ParentsFirst).unwrap();
    assert_eq!(source.entries(), replica.entries());
}
