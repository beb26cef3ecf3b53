use std::{cell::RefCell, rc::Rc, time::Duration};

use serde_json::{json, Value};

use treesync_server::{
    element::{self, DisabledUpdateMode, DomListenerOptions},
    published::{ParamType, PublishedComponent, PublishedMethod},
    ServerConfig,
};
use treesync_shared::{
    features::{ELEMENT_CHILDREN, ELEMENT_LISTENERS, ELEMENT_PROPERTIES},
    ListItem, NavigationTrigger, NodeId, PropertyValue,
};
use treesync_test::{
    assert_all_handled, assert_ignored, assert_property_synced, exchange, exchange_n_times,
    TestClient, TestServer,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A server with one text field below the root, mirrored on a fresh client
fn text_field() -> (TestServer, TestClient, NodeId) {
    let mut server = TestServer::new();
    let field = server.add_child(NodeId::ROOT);
    {
        let tree = server.ui_mut().tree_mut();
        tree.root_mut()
            .list_mut(ELEMENT_CHILDREN)
            .push(ListItem::Node(field));
        tree.get_node_mut(&field)
            .unwrap()
            .map_mut(ELEMENT_PROPERTIES)
            .property_mut("value")
            .set_value(PropertyValue::Json(json!("initial")));
    }

    let mut client = TestClient::new();
    client.receive(&server.mirror_batch());
    (server, client, field)
}

#[test]
fn mirrored_tree_matches_server() {
    init_logger();
    let (server, client, field) = text_field();

    assert_property_synced!(client, server, field, ELEMENT_PROPERTIES, "value");
    assert!(client.tree().is_attached(&field));
    assert_eq!(client.tree().node_ids(), server.ui().tree().node_ids());
}

#[test]
fn values_from_the_server_are_not_echoed() {
    init_logger();
    let (mut server, mut client, field) = text_field();

    assert!(!client.input(field, "value", json!("initial")));
    assert!(exchange(&mut client, &mut server).is_empty());

    client.render();
    assert!(client.input(field, "value", json!("typed")));
    let results = exchange(&mut client, &mut server);

    assert_all_handled!(results);
    assert_property_synced!(client, server, field, ELEMENT_PROPERTIES, "value");
}

#[test]
fn disabled_field_drops_sync_unless_always() {
    init_logger();
    let (mut server, mut client, field) = text_field();
    client.render();
    element::set_enabled(server.ui_mut().tree_mut(), &field, false);
    element::set_property_update_mode(
        server.ui_mut().tree_mut(),
        &field,
        "scrollTop",
        DisabledUpdateMode::Always,
    );

    client.input(field, "value", json!("typed"));
    client.input(field, "scrollTop", json!(40));
    let results = exchange(&mut client, &mut server);

    assert_ignored!(results[0].clone(), Disabled);
    assert_eq!(results[1], Ok(treesync_server::DispatchOutcome::Handled));
    let value = server
        .ui()
        .tree()
        .get_node(&field)
        .and_then(|node| node.map(ELEMENT_PROPERTIES))
        .and_then(|map| map.get_value("value"))
        .cloned();
    assert_eq!(value, Some(PropertyValue::Json(json!("initial"))));
    assert_property_synced!(client, server, field, ELEMENT_PROPERTIES, "scrollTop");
}

#[test]
fn event_listener_is_announced_and_fired() {
    init_logger();
    let mut server = TestServer::new();
    let button = server.add_child(NodeId::ROOT);
    let clicks = Rc::new(RefCell::new(0));
    let counter = clicks.clone();
    element::add_event_listener(
        server.ui_mut().tree_mut(),
        &button,
        "click",
        DomListenerOptions::default(),
        Box::new(move |_| *counter.borrow_mut() += 1),
    );
    let mut client = TestClient::new();
    client.receive(&server.mirror_batch());

    assert_eq!(
        client.property(button, ELEMENT_LISTENERS, "click"),
        Some(&PropertyValue::Json(json!(true)))
    );

    client.connector_mut().send_event(button, "click", None);
    client.connector_mut().send_event(button, "click", None);
    let results = exchange_n_times(&mut client, &mut server, 2);

    assert_eq!(results.len(), 2);
    assert_all_handled!(results);
    assert_eq!(*clicks.borrow(), 2);
}

#[test]
fn poll_passes_inert_root_only_in_its_plain_form() {
    init_logger();
    let mut server = TestServer::with_config(ServerConfig {
        poll_interval: Some(Duration::from_secs(5)),
        ..Default::default()
    });
    let polls = Rc::new(RefCell::new(0));
    let counter = polls.clone();
    element::add_event_listener(
        server.ui_mut().tree_mut(),
        &NodeId::ROOT,
        "ui-poll",
        DomListenerOptions::default(),
        Box::new(move |_| *counter.borrow_mut() += 1),
    );
    element::set_inert(server.ui_mut().tree_mut(), &NodeId::ROOT, true);
    let mut client = TestClient::new();

    client.connector_mut().send_event(NodeId::ROOT, "ui-poll", None);
    let plain = exchange(&mut client, &mut server);
    let mut data = serde_json::Map::new();
    data.insert("extra".into(), json!(1));
    client.connector_mut().send_event(NodeId::ROOT, "ui-poll", Some(data));
    let with_data = exchange(&mut client, &mut server);

    assert_all_handled!(plain);
    assert_ignored!(with_data[0].clone(), Inert);
    assert_eq!(*polls.borrow(), 1);
}

#[test]
fn navigation_from_client_reaches_server() {
    init_logger();
    let mut server = TestServer::new();
    let locations = Rc::new(RefCell::new(Vec::new()));
    let sink = locations.clone();
    server
        .ui_mut()
        .set_history_change_handler(Box::new(move |change: treesync_server::HistoryStateChange| {
            sink.borrow_mut().push((change.location, change.trigger))
        }));
    let mut client = TestClient::new();

    client
        .connector_mut()
        .send_navigation("products", None, NavigationTrigger::Link);
    client
        .connector_mut()
        .send_navigation("", Some(json!({ "y": 10 })), NavigationTrigger::History);
    let results = exchange(&mut client, &mut server);

    assert_all_handled!(results);
    assert_eq!(
        *locations.borrow(),
        vec![
            ("products".to_string(), NavigationTrigger::Link),
            ("".to_string(), NavigationTrigger::History),
        ]
    );
}

#[test]
fn published_call_round_trip_resolves_promise() {
    init_logger();
    let mut server = TestServer::new();
    server.ui_mut().components_mut().register(
        NodeId::ROOT,
        PublishedComponent::new("Greeter").method(
            PublishedMethod::new("greet", |args: &[Value]| {
                let names: Vec<&str> = args[0]
                    .as_array()
                    .map(|names| names.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                Ok(json!(format!("Hello {}", names.join(" & "))))
            })
            .variadic(ParamType::String),
        ),
    );
    let mut client = TestClient::new();

    client.connector_mut().send_published_event(
        NodeId::ROOT,
        "greet",
        vec![json!("Ann"), json!("Bo")],
        Some(3),
    );
    let results = exchange(&mut client, &mut server);

    assert_all_handled!(results);
    assert_eq!(
        server.ui_mut().take_invocations_json(),
        json!([{ "type": "resolvePromise", "promise": 3, "value": "Hello Ann & Bo", "target": 1 }])
    );
}

#[test]
fn attach_request_answered_by_client() {
    init_logger();
    struct Collect(Rc<RefCell<Vec<NodeId>>>);
    impl treesync_server::element::ChildElementConsumer for Collect {
        fn accept(&mut self, node: NodeId) {
            self.0.borrow_mut().push(node);
        }
        fn on_error(&mut self, _parent: NodeId, _tag: &str, _previous: Option<NodeId>) {}
    }

    let mut server = TestServer::new();
    let accepted = Rc::new(RefCell::new(Vec::new()));
    let requested = server.ui_mut().attach_existing_element(
        NodeId::ROOT,
        "header",
        None,
        Box::new(Collect(accepted.clone())),
    );
    let request = server.ui_mut().take_invocations_json();
    assert_eq!(request[0]["requested"], json!(requested.to_u32()));
    let mut client = TestClient::new();

    client.connector_mut().send_attach_response(
        NodeId::ROOT,
        treesync_shared::AttachResponse {
            requested,
            assigned: Some(requested),
            tag: "header".into(),
            index: Some(0),
            id: None,
        },
    );
    let results = exchange(&mut client, &mut server);

    assert_all_handled!(results);
    assert_eq!(*accepted.borrow(), vec![requested]);
    client.receive(&server.mirror_batch());
    assert!(client.tree().is_attached(&requested));
}
