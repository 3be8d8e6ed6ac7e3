use nodetree::util::testing;
use nodetree::{TreeArena, TreeDisplay, TreeOptions};
use rstest::rstest;
use serde_json::json;

#[rstest]
fn given_tree_when_rendering_then_labels_by_key() {
    testing::init_test_setup();
    let (tree, root) = TreeArena::from_data(
        &json!({"name": "root", "children": [
            {"name": "child1", "children": [{"name": "grandchild1"}]},
            {"name": "child2"}
        ]}),
        TreeOptions::default(),
    );

    let rendered = tree.to_tree_string(root, "name");

    assert_eq!(rendered.root, "root");
    assert_eq!(rendered.leaves.len(), 2);
    assert_eq!(rendered.leaves[0].leaves[0].root, "grandchild1");
    let text = rendered.to_string();
    assert!(text.starts_with("root\n"));
    assert!(text.contains("child2"));
}

#[rstest]
fn given_missing_label_key_when_rendering_then_falls_back_to_data() {
    testing::init_test_setup();
    let (tree, root) = TreeArena::from_data(
        &json!({"id": 7, "children": [{"name": 3}]}),
        TreeOptions::default(),
    );

    let rendered = tree.to_tree_string(root, "name");

    assert_eq!(rendered.root, r#"{"id":7}"#);
    assert_eq!(rendered.leaves[0].root, "3");
}

#[rstest]
fn given_pruned_node_when_rendering_then_shows_empty_tree() {
    testing::init_test_setup();
    let (mut tree, root) = TreeArena::from_data(&json!({}), TreeOptions::default());
    tree.prune(root).unwrap();

    assert_eq!(tree.to_tree_string(root, "name").root, "Empty tree");
}

#[rstest]
fn given_deep_chain_when_rendering_then_every_level_is_nested() {
    testing::init_test_setup();
    let (mut tree, root) = TreeArena::from_data(&json!({"name": "0"}), TreeOptions::default());
    let mut tip = root;
    for level in 1..300 {
        tip = tree
            .add_child_data(tip, &json!({"name": level.to_string()}), None)
            .unwrap();
    }

    let rendered = tree.to_tree_string(root, "name");

    let mut current = &rendered;
    let mut levels = 1;
    while let Some(next) = current.leaves.first() {
        assert_eq!(current.leaves.len(), 1);
        current = next;
        levels += 1;
    }
    assert_eq!(levels, 300);
    assert_eq!(current.root, "299");
}
