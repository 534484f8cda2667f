//! Integration tests for graph loading and traversal.

use dedupq::Error;
use dedupq::graph::{Graph, walk};

fn temp_graph(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("dedupq-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn cyclic_graph_visits_each_node_once() {
    let graph = Graph::from_toml_str(
        r#"
        [nodes]
        a = ["b"]
        b = ["c"]
        c = ["a", "b"]
        "#,
    )
    .unwrap();

    let walk = walk(&graph, ["b"]);
    assert_eq!(walk.visited, ["b", "c", "a"]);
    assert!(walk.missing.is_empty());
}

#[test]
fn unknown_root_is_visited_and_reported() {
    let graph = Graph::from_toml_str("[nodes]\na = []\n").unwrap();
    let walk = walk(&graph, ["a", "nowhere"]);
    assert_eq!(walk.visited, ["a", "nowhere"]);
    assert_eq!(walk.missing, ["nowhere"]);
}

#[test]
fn unreachable_nodes_are_not_visited() {
    let graph = Graph::from_toml_str(
        r#"
        [nodes]
        root = ["leaf"]
        leaf = []
        island = ["root"]
        "#,
    )
    .unwrap();

    let walk = walk(&graph, ["root"]);
    assert_eq!(walk.visited, ["root", "leaf"]);
}

#[test]
fn walk_serializes_to_json() {
    let graph = Graph::from_toml_str(r#"nodes = { a = ["b"] }"#).unwrap();
    let walk = walk(&graph, ["a"]);
    let json = serde_json::to_value(&walk).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "visited": ["a", "b"], "missing": ["b"] })
    );
}

#[test]
fn load_reads_graph_from_file() {
    let path = temp_graph("load", "[nodes]\nx = [\"y\"]\ny = []\n");
    let graph = Graph::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.successors("x"), Some(&["y".to_string()][..]));
}

#[test]
fn load_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("dedupq-does-not-exist.toml");
    assert!(matches!(Graph::load(&path), Err(Error::Io(_))));
}

#[test]
fn load_malformed_file_names_the_path() {
    let path = temp_graph("malformed", "nodes = 3\n");
    let err = Graph::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    match err {
        Error::Graph(msg) => assert!(msg.contains("malformed")),
        other => panic!("expected Graph error, got {other:?}"),
    }
}
