use std::{
    cell::{Cell, RefCell},
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use serde_json::json;

use treesync_shared::{features::ELEMENT_PROPERTIES, ListenerOutcome, NodeId};
use treesync_test::{ChangeBatchBuilder, TestClient};

#[test]
fn unregister_listener_fires_exactly_once() {
    let mut client = TestClient::new();
    client.receive(&ChangeBatchBuilder::new().attach(2).to_json());
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = fired.clone();
    client
        .tree_mut()
        .get_node_mut(&NodeId::new(2))
        .unwrap()
        .add_unregister_listener(Box::new(move |node| sink.borrow_mut().push(node)));

    client.receive(&ChangeBatchBuilder::new().detach(2).to_json());

    assert_eq!(*fired.borrow(), vec![NodeId::new(2)]);
    assert!(client.tree().get_node(&NodeId::new(2)).is_none());

    let again = catch_unwind(AssertUnwindSafe(|| {
        client.tree_mut().unregister_node(&NodeId::new(2));
    }));
    assert!(again.is_err());
    assert_eq!(fired.borrow().len(), 1);
}

#[test]
fn removed_unregister_listener_is_not_fired() {
    let mut client = TestClient::new();
    client.receive(&ChangeBatchBuilder::new().attach(2).to_json());
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    let node = client.tree_mut().get_node_mut(&NodeId::new(2)).unwrap();
    let handle = node.add_unregister_listener(Box::new(move |_| counter.set(counter.get() + 1)));
    assert!(node.remove_unregister_listener(&handle));

    client.receive(&ChangeBatchBuilder::new().detach(2).to_json());

    assert_eq!(fired.get(), 0);
}

#[test]
fn reattached_id_is_a_new_node() {
    let mut client = TestClient::new();
    client.receive(
        &ChangeBatchBuilder::new()
            .attach(2)
            .put(2, ELEMENT_PROPERTIES, "value", json!("old"))
            .to_json(),
    );
    client.receive(&ChangeBatchBuilder::new().detach(2).to_json());

    client.receive(&ChangeBatchBuilder::new().attach(2).to_json());

    assert_eq!(client.property(NodeId::new(2), ELEMENT_PROPERTIES, "value"), None);
}

#[test]
fn binding_listeners_see_the_binding_once() {
    let mut client = TestClient::new();
    client.receive(&ChangeBatchBuilder::new().attach(2).to_json());
    let calls = Rc::new(Cell::new(0));
    let node = client.tree_mut().get_node_mut(&NodeId::new(2)).unwrap();

    let counter = calls.clone();
    node.add_binding_listener(Box::new(move |_| {
        counter.set(counter.get() + 1);
        ListenerOutcome::Remove
    }));
    node.set_binding(Box::new("div#2".to_string()));

    assert_eq!(calls.get(), 1);
    assert_eq!(node.binding::<String>().map(String::as_str), Some("div#2"));
}
