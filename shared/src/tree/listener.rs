use crate::tree::node_id::NodeId;

/// Returned by a listener to tell its owner whether it wants further
/// notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerOutcome {
    Keep,
    Remove,
}

/// Identifies one registered listener so it can be removed again
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u32);

impl ListenerHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Invoked once when the node is unregistered
pub type UnregisterListener = dyn FnOnce(NodeId);

/// Invoked when the binding of the node is established
pub type BindingListener = dyn FnMut(NodeId) -> ListenerOutcome;

/// Listeners in registration order, each addressable by its handle
pub struct ListenerSet<F: ?Sized> {
    next_handle: u32,
    listeners: Vec<(ListenerHandle, Box<F>)>,
}

impl<F: ?Sized> ListenerSet<F> {
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Box<F>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.listeners.push((handle, listener));
        handle
    }

    /// Returns false if the handle was never added or already removed
    pub fn remove(&mut self, handle: &ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| other != handle);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Empties the set, handing every listener over to the caller
    pub fn drain(&mut self) -> Vec<Box<F>> {
        std::mem::take(&mut self.listeners)
            .into_iter()
            .map(|(_, listener)| listener)
            .collect()
    }
}

impl ListenerSet<BindingListener> {
    /// Notifies every listener, dropping those answering `Remove`
    pub fn notify(&mut self, node_id: NodeId) {
        self.listeners
            .retain_mut(|(_, listener)| listener(node_id) == ListenerOutcome::Keep);
    }
}

impl<F: ?Sized> Default for ListenerSet<F> {
    fn default() -> Self {
        Self::new()
    }
}
