//! Tests for plain-object and JSON conversion, and cloning.

use nodetree::util::testing;
use nodetree::{NodeId, TreeArena, TreeError, TreeOptions};
use rstest::{fixture, rstest};
use serde_json::{json, Value};

#[fixture]
fn sample() -> (TreeArena, NodeId) {
    testing::init_test_setup();
    TreeArena::from_data(
        &json!({
            "id": 1,
            "name": "root",
            "meta": {"tags": ["a", "b"], "weight": 1.5, "on": true, "none": null},
            "children": [{"id": 2}, {"id": 3, "children": [{"id": 4}, {"id": 5}]}]
        }),
        TreeOptions::default(),
    )
}

#[rstest]
fn given_tree_when_converting_to_object_then_nests_children_without_parents(
    sample: (TreeArena, NodeId),
) {
    let (tree, root) = sample;
    let three = tree.find_by_id(root, &json!(3), "id", false).unwrap();

    assert_eq!(
        tree.to_object(three).unwrap(),
        json!({"id": 3, "children": [{"id": 4, "children": []}, {"id": 5, "children": []}]})
    );
    let object = tree.to_object(root).unwrap();
    assert_eq!(object["meta"]["tags"], json!(["a", "b"]));
    assert!(object.get("parent").is_none());
}

#[rstest]
fn given_tree_when_round_tripping_json_then_object_is_unchanged(sample: (TreeArena, NodeId)) {
    let (tree, root) = sample;

    let text = tree.to_json(root).unwrap();
    let (parsed, parsed_root) = TreeArena::from_json(&text, TreeOptions::default()).unwrap();

    assert_eq!(
        parsed.to_object(parsed_root).unwrap(),
        tree.to_object(root).unwrap()
    );
    assert_eq!(parsed.len(), tree.len());
}

#[rstest]
fn given_tree_when_pretty_printing_then_parses_back(sample: (TreeArena, NodeId)) {
    let (tree, root) = sample;

    let pretty = tree.to_json_pretty(root).unwrap();

    assert!(pretty.contains('\n'));
    let value: Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(value, tree.to_object(root).unwrap());
}

#[rstest]
#[case::truncated("{\"id\": 1,")]
#[case::garbage("not json")]
#[case::empty("")]
fn given_invalid_text_when_parsing_then_errors(#[case] text: &str) {
    let result = TreeArena::from_json(text, TreeOptions::default());
    assert!(matches!(result, Err(TreeError::Parse(_))));
}

#[rstest]
#[case::number("42", "number")]
#[case::array("[{\"id\": 1}]", "array")]
#[case::string("\"tree\"", "string")]
fn given_non_object_text_when_parsing_then_errors(#[case] text: &str, #[case] found: &str) {
    let result = TreeArena::from_json(text, TreeOptions::default());
    match result {
        Err(TreeError::NotAnObject(kind)) => assert_eq!(kind, found),
        other => panic!("expected NotAnObject, got {other:?}"),
    }
}

#[rstest]
fn given_clone_when_mutating_clone_then_original_is_unchanged(sample: (TreeArena, NodeId)) {
    let (mut tree, root) = sample;
    let before = tree.to_object(root).unwrap();

    let copy = tree.clone_subtree(root).unwrap();
    tree.add_child_data(copy, &json!({"id": 6}), None).unwrap();
    tree.data_mut(copy).unwrap().insert("name".into(), json!("copy"));

    assert_eq!(tree.to_object(root).unwrap(), before);
    assert_ne!(tree.to_object(copy).unwrap(), before);
}

#[rstest]
fn given_clone_when_mutating_original_then_clone_is_unchanged(sample: (TreeArena, NodeId)) {
    let (mut tree, root) = sample;
    let copy = tree.clone_subtree(root).unwrap();
    let snapshot = tree.to_object(copy).unwrap();

    let two = tree.first_child(root).unwrap();
    tree.prune(two).unwrap();
    tree.data_mut(root).unwrap().remove("meta");

    assert_eq!(tree.to_object(copy).unwrap(), snapshot);
}

#[rstest]
fn given_child_when_cloning_then_copy_is_detached(sample: (TreeArena, NodeId)) {
    let (mut tree, root) = sample;
    let three = tree.find_by_id(root, &json!(3), "id", false).unwrap();

    let copy = tree.clone_subtree(three).unwrap();

    assert!(tree.is_root(copy));
    assert_ne!(copy, three);
    assert_eq!(tree.to_object(copy).unwrap(), tree.to_object(three).unwrap());
    assert_eq!(tree.children(root).len(), 2);
}

#[rstest]
fn given_custom_children_key_when_round_tripping_then_key_is_preserved() {
    testing::init_test_setup();
    let options = TreeOptions::default().with_children_key("nodes");
    let (tree, root) =
        TreeArena::from_data(&json!({"id": 1, "nodes": [{"id": 2}]}), options.clone());

    let text = tree.to_json(root).unwrap();
    let (parsed, parsed_root) = TreeArena::from_json(&text, options).unwrap();

    assert!(text.contains("\"nodes\""));
    assert!(!text.contains("\"children\""));
    assert_eq!(parsed.children(parsed_root).len(), 1);
}

#[rstest]
fn given_stale_handle_when_serializing_then_errors(sample: (TreeArena, NodeId)) {
    let (mut tree, root) = sample;
    let two = tree.first_child(root).unwrap();
    tree.prune(two).unwrap();

    assert!(matches!(tree.to_object(two), Err(TreeError::NodeNotFound(_))));
    assert!(matches!(tree.to_json(two), Err(TreeError::NodeNotFound(_))));
    assert!(matches!(tree.clone_subtree(two), Err(TreeError::NodeNotFound(_))));
}

// ============================================================
// Deep and wide trees
// ============================================================

const CHAIN_LEVELS: usize = 500;

/// Single path of `levels` nodes with ids 0..levels, root first.
fn chain(levels: usize) -> (TreeArena, NodeId) {
    testing::init_test_setup();
    let (mut tree, root) = TreeArena::from_data(&json!({"id": 0}), TreeOptions::default());
    let mut tip = root;
    for id in 1..levels {
        tip = tree.add_child_data(tip, &json!({"id": id}), None).unwrap();
    }
    (tree, root)
}

#[rstest]
fn given_deep_chain_when_round_tripping_json_then_structure_survives() {
    let (tree, root) = chain(CHAIN_LEVELS);

    let text = tree.to_json(root).unwrap();
    let (parsed, parsed_root) = TreeArena::from_json(&text, TreeOptions::default()).unwrap();

    assert_eq!(parsed.len(), CHAIN_LEVELS);
    assert_eq!(parsed.depth(parsed_root), CHAIN_LEVELS);
    assert_eq!(
        parsed.to_object(parsed_root).unwrap(),
        tree.to_object(root).unwrap()
    );
    let leaf = parsed.leaf_nodes(parsed_root);
    assert_eq!(leaf.len(), 1);
    assert_eq!(parsed.get(leaf[0], "id"), Some(&json!(CHAIN_LEVELS - 1)));
}

#[rstest]
fn given_deep_chain_when_cloning_then_copy_is_complete_and_independent() {
    let (mut tree, root) = chain(CHAIN_LEVELS);

    let copy = tree.clone_subtree(root).unwrap();

    assert_eq!(tree.len(), 2 * CHAIN_LEVELS);
    assert_eq!(tree.depth(copy), CHAIN_LEVELS);
    assert_eq!(tree.to_object(copy).unwrap(), tree.to_object(root).unwrap());

    let copy_leaf = tree.leaf_nodes(copy)[0];
    tree.prune(copy_leaf).unwrap();
    assert_eq!(tree.depth(root), CHAIN_LEVELS);
    assert_eq!(tree.depth(copy), CHAIN_LEVELS - 1);
}

#[rstest]
fn given_deep_json_text_when_inserting_then_builds_every_level() {
    testing::init_test_setup();
    let mut text = String::new();
    for id in 0..CHAIN_LEVELS {
        text.push_str(&format!("{{\"id\":{id},\"children\":["));
    }
    for _ in 0..CHAIN_LEVELS {
        text.push_str("]}");
    }
    let mut tree = TreeArena::default();

    let root = tree.insert_json(&text).unwrap();

    assert_eq!(tree.depth(root), CHAIN_LEVELS);
    // Same text up to key order
    assert_eq!(tree.to_json(root).unwrap().len(), text.len());
}

#[rstest]
fn given_wide_tree_when_round_tripping_and_cloning_then_order_is_kept() {
    testing::init_test_setup();
    let children: Vec<Value> = (0..2000).map(|id| json!({"id": id})).collect();
    let (mut tree, root) = TreeArena::from_data(
        &json!({"id": "root", "children": children}),
        TreeOptions::default(),
    );

    let text = tree.to_json(root).unwrap();
    let (parsed, parsed_root) = TreeArena::from_json(&text, TreeOptions::default()).unwrap();
    let copy = tree.clone_subtree(root).unwrap();

    for (arena, id) in [(&parsed, parsed_root), (&tree, copy)] {
        assert_eq!(arena.children(id).len(), 2000);
        assert_eq!(arena.depth(id), 2);
        let last = arena.last_child(id).unwrap();
        assert_eq!(arena.get(last, "id"), Some(&json!(1999)));
        assert_eq!(arena.index_of_child(id, last), Some(1999));
    }
    assert_eq!(tree.to_object(copy).unwrap(), tree.to_object(root).unwrap());
}
