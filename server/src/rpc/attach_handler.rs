use log::debug;

use treesync_shared::{
    features::{ELEMENT_CHILDREN, VIRTUAL_CHILDREN},
    AttachResponse, ListItem, NodeId,
};

use crate::{
    element::AttachExistingElementFeature,
    rpc::{DispatchOutcome, RpcError},
    server::UiContext,
};

/// Completes a pending attach request of `parent` with the client's answer.
///
/// # Panics
///
/// Panics if the client bound the element to a node other than the
/// requested one.
pub(crate) fn handle(
    ui: &mut UiContext,
    parent: NodeId,
    response: &AttachResponse,
    by_id: bool,
) -> Result<DispatchOutcome, RpcError> {
    let requested = response.requested;
    let tree = ui.tree_mut();

    let is_pending = tree
        .get_node(&parent)
        .and_then(|node| node.node_data::<AttachExistingElementFeature>())
        .is_some_and(|feature| feature.is_pending(&requested));
    if !is_pending {
        return Err(RpcError::NoPendingAttach {
            parent: parent.to_u32(),
            requested: requested.to_u32(),
        });
    }

    let insert_at = match response.assigned {
        Some(assigned) if assigned != requested => panic!(
            "Attach request for node {} of node {} was answered with node {}",
            requested, parent, assigned
        ),
        Some(_) if !by_id => {
            let len = tree
                .get_node(&parent)
                .and_then(|node| node.list(ELEMENT_CHILDREN))
                .map_or(0, |children| children.len());
            let index = response.index.unwrap_or(len);
            if index > len {
                return Err(RpcError::AttachIndexOutOfBounds {
                    parent: parent.to_u32(),
                    requested: requested.to_u32(),
                    index,
                    len,
                });
            }
            Some(index)
        }
        _ => None,
    };

    let Some(mut pending) = tree
        .get_node_mut(&parent)
        .and_then(|node| node.node_data_mut::<AttachExistingElementFeature>())
        .and_then(|feature| feature.unregister(&requested))
    else {
        unreachable!("attach request was checked to be pending");
    };

    if response.assigned.is_none() {
        debug!(
            "Client found no '{}' element for attach request {} of node {}",
            response.tag, requested, parent
        );
        if tree.has_node(&requested) {
            tree.unregister_node(&requested);
        }
        pending
            .consumer
            .on_error(parent, &pending.tag, pending.previous_sibling);
        return Ok(DispatchOutcome::Handled);
    }

    if let Some(node) = tree.get_node_mut(&parent) {
        match insert_at {
            Some(index) => {
                node.list_mut(ELEMENT_CHILDREN)
                    .splice(index, 0, vec![ListItem::Node(requested)]);
            }
            None => node.list_mut(VIRTUAL_CHILDREN).push(ListItem::Node(requested)),
        }
    }
    tree.set_parent(&requested, Some(parent));
    pending.consumer.accept(requested);

    Ok(DispatchOutcome::Handled)
}
