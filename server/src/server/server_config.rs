use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Interval at which the client polls the server. `None` or a zero
    /// interval disables polling, and poll events are then treated like any
    /// other event.
    pub poll_interval: Option<Duration>,
    /// Tag of the element bound to the root node
    pub root_tag: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: None,
            root_tag: "body".to_string(),
        }
    }
}
