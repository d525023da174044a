//! Property tests: one pass over arbitrary trees yields an exact mirror.

use std::fs;
use std::path::Path;

use mirror_core::{MemoryObserver, Reconciler};
use mirror_test_utils::TestTree;
use proptest::prelude::*;

/// A file or directory at a path of one to three short components.
#[derive(Debug, Clone)]
enum Node {
    File(Vec<&'static str>, Vec<u8>),
    Dir(Vec<&'static str>),
}

fn node() -> impl Strategy<Value = Node> {
    let path = prop::collection::vec(prop::sample::select(vec!["a", "b", "c.txt"]), 1..=3);
    prop_oneof![
        (path.clone(), prop::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(p, content)| Node::File(p, content)),
        path.prop_map(Node::Dir),
    ]
}

/// Materialise nodes under `root`, skipping any that collide with an
/// entry of the other kind.
fn build(root: &Path, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::File(parts, content) => {
                let path = root.join(parts.join("/"));
                if let Some(parent) = path.parent() {
                    if fs::create_dir_all(parent).is_err() {
                        continue;
                    }
                }
                if !path.is_dir() {
                    let _ = fs::write(&path, content);
                }
            }
            Node::Dir(parts) => {
                let _ = fs::create_dir_all(root.join(parts.join("/")));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn one_pass_mirrors_and_second_is_noop(
        source in prop::collection::vec(node(), 0..12),
        replica in prop::collection::vec(node(), 0..12),
    ) {
        let tree = TestTree::new();
        build(&tree.source(), &source);
        build(&tree.replica(), &replica);
        let reconciler = Reconciler::new(tree.source(), tree.replica());

        let first = reconciler.reconcile(&MemoryObserver::new()).unwrap();
        prop_assert!(first.is_clean(), "failures: {:?}", first.failures);
        tree.assert_mirrors();

        let second = reconciler.reconcile(&MemoryObserver::new()).unwrap();
        prop_assert!(second.is_noop(), "second pass: {:?}", second.messages());
    }

    #[test]
    fn each_path_is_acted_on_at_most_twice(
        source in prop::collection::vec(node(), 0..12),
        replica in prop::collection::vec(node(), 0..12),
    ) {
        let tree = TestTree::new();
        build(&tree.source(), &source);
        build(&tree.replica(), &replica);

        let report = Reconciler::new(tree.source(), tree.replica())
            .reconcile(&MemoryObserver::new())
            .unwrap();

        let mut paths: Vec<String> = report.actions.iter().map(|a| a.path.to_string()).collect();
        paths.sort();
        for window in paths.windows(3) {
            prop_assert!(
                !(window[0] == window[1] && window[1] == window[2]),
                "{} acted on three times",
                window[0]
            );
        }
    }
}
