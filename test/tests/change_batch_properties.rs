use serde_json::{json, Value};

use treesync_shared::{
    features::{element_data, ELEMENT_CHILDREN, ELEMENT_DATA, ELEMENT_PROPERTIES},
    FeatureKind, NodeId, PropertyValue,
};
use treesync_test::{ChangeBatchBuilder, TestClient};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn list_values(client: &TestClient, node: NodeId, feature: u8) -> Vec<Value> {
    client
        .tree()
        .get_node(&node)
        .and_then(|node| node.list(feature))
        .map(|list| list.iter().filter_map(|item| item.as_value().cloned()).collect())
        .unwrap_or_default()
}

#[test]
fn attach_applies_before_records_that_precede_it() {
    init_logger();
    let mut client = TestClient::new();
    let batch = ChangeBatchBuilder::new()
        .put(5, ELEMENT_PROPERTIES, "value", json!("x"))
        .attach(5)
        .to_json();

    let touched = client.receive(&batch);

    assert!(touched.contains(&NodeId::new(5)));
    assert_eq!(
        client.property(NodeId::new(5), ELEMENT_PROPERTIES, "value"),
        Some(&PropertyValue::Json(json!("x")))
    );
}

#[test]
fn node_reference_sets_parent_and_detach_drops_node() {
    init_logger();
    let mut client = TestClient::new();
    client.receive(
        &ChangeBatchBuilder::new()
            .attach(2)
            .attach(3)
            .put_node(2, ELEMENT_PROPERTIES, "item", 3)
            .splice_nodes(1, ELEMENT_CHILDREN, 0, 0, &[2])
            .to_json(),
    );

    let tree = client.tree();
    assert_eq!(tree.get_node(&NodeId::new(2)).unwrap().parent(), Some(NodeId::ROOT));
    assert_eq!(tree.get_node(&NodeId::new(3)).unwrap().parent(), Some(NodeId::new(2)));
    assert!(tree.is_attached(&NodeId::new(3)));

    let touched = client.receive(&ChangeBatchBuilder::new().detach(3).to_json());

    assert!(!touched.contains(&NodeId::new(3)));
    assert!(client.tree().get_node(&NodeId::new(3)).is_none());
}

#[test]
fn splice_sequence_matches_array_semantics() {
    init_logger();
    let mut client = TestClient::new();

    client.receive(
        &ChangeBatchBuilder::new()
            .splice_values(1, 9, 0, 0, vec![json!("foo"), json!("bar")])
            .splice_values(1, 9, 1, 0, vec![json!("baz")])
            .to_json(),
    );
    assert_eq!(
        list_values(&client, NodeId::ROOT, 9),
        vec![json!("foo"), json!("baz"), json!("bar")]
    );

    client.receive(&ChangeBatchBuilder::new().splice_remove(1, 9, 1, 1).to_json());
    assert_eq!(
        list_values(&client, NodeId::ROOT, 9),
        vec![json!("foo"), json!("bar")]
    );
}

#[test]
fn remove_clears_value_and_touches_node() {
    init_logger();
    let mut client = TestClient::new();
    client.receive(
        &ChangeBatchBuilder::new()
            .attach(4)
            .put(4, ELEMENT_PROPERTIES, "title", json!("Hello"))
            .to_json(),
    );

    let touched = client.receive(
        &ChangeBatchBuilder::new()
            .remove(4, ELEMENT_PROPERTIES, "title")
            .to_json(),
    );

    assert!(touched.contains(&NodeId::new(4)));
    assert_eq!(client.property(NodeId::new(4), ELEMENT_PROPERTIES, "title"), None);
}

#[test]
fn empty_record_creates_observable_features() {
    init_logger();
    let mut client = TestClient::new();

    client.receive(
        &ChangeBatchBuilder::new()
            .attach(2)
            .empty(2, 12, FeatureKind::List)
            .empty(2, 13, FeatureKind::Map)
            .to_json(),
    );

    let node = client.tree().get_node(&NodeId::new(2)).unwrap();
    assert!(node.list(12).unwrap().is_empty());
    assert!(node.map(13).unwrap().is_empty());
}

#[test]
fn clear_empties_list() {
    init_logger();
    let mut client = TestClient::new();
    client.receive(
        &ChangeBatchBuilder::new()
            .splice_values(1, 9, 0, 0, vec![json!(1), json!(2)])
            .to_json(),
    );

    client.receive(&ChangeBatchBuilder::new().clear(1, 9).to_json());

    assert!(list_values(&client, NodeId::ROOT, 9).is_empty());
}

#[test]
fn hidden_parent_makes_subtree_inactive() {
    init_logger();
    let mut client = TestClient::new();
    client.receive(
        &ChangeBatchBuilder::new()
            .attach(2)
            .attach(3)
            .splice_nodes(1, ELEMENT_CHILDREN, 0, 0, &[2])
            .splice_nodes(2, ELEMENT_CHILDREN, 0, 0, &[3])
            .to_json(),
    );
    assert!(client.tree().is_active(&NodeId::new(3)));

    client.receive(
        &ChangeBatchBuilder::new()
            .put(2, ELEMENT_DATA, element_data::VISIBLE, json!(false))
            .to_json(),
    );

    let tree = client.tree();
    assert!(tree.is_active(&NodeId::ROOT));
    assert!(!tree.is_visible(&NodeId::new(2)));
    assert!(!tree.is_active(&NodeId::new(2)));
    assert!(tree.is_visible(&NodeId::new(3)));
    assert!(!tree.is_active(&NodeId::new(3)));
}

#[test]
#[should_panic]
fn unknown_node_is_a_protocol_violation() {
    let mut client = TestClient::new();
    client.receive(
        &ChangeBatchBuilder::new()
            .put(7, ELEMENT_PROPERTIES, "value", json!(1))
            .to_json(),
    );
}

#[test]
fn resync_skips_records_for_unknown_nodes() {
    init_logger();
    let mut client = TestClient::new();
    client.tree_mut().set_resync(true);

    let touched = client.receive(
        &ChangeBatchBuilder::new()
            .put(7, ELEMENT_PROPERTIES, "value", json!(1))
            .put(1, ELEMENT_PROPERTIES, "value", json!(2))
            .to_json(),
    );

    assert!(!touched.contains(&NodeId::new(7)));
    assert!(touched.contains(&NodeId::ROOT));
    assert!(!client.tree().is_resync());
}
