/// Assert that every dispatch result of an exchange was handled
#[macro_export]
macro_rules! assert_all_handled {
    ($results:expr) => {
        for (index, result) in $results.iter().enumerate() {
            assert_eq!(
                result,
                &Ok(treesync_server::DispatchOutcome::Handled),
                "command {} was not handled",
                index
            );
        }
    };
}

/// Assert that a dispatch result was ignored for the given reason
#[macro_export]
macro_rules! assert_ignored {
    ($result:expr, $reason:ident) => {
        assert_eq!(
            $result,
            Ok(treesync_server::DispatchOutcome::Ignored(
                treesync_server::IgnoreReason::$reason
            ))
        );
    };
}

/// Assert that the client mirrors the server's value of a map property
#[macro_export]
macro_rules! assert_property_synced {
    ($client:expr, $server:expr, $node:expr, $feature:expr, $key:expr) => {
        let server_value = $server
            .ui()
            .tree()
            .get_node(&$node)
            .and_then(|node| node.map($feature))
            .and_then(|map| map.get_value($key))
            .cloned();
        assert_eq!(
            $client.property($node, $feature, $key).cloned(),
            server_value,
            "property {} of node {} differs between client and server",
            $key,
            $node
        );
    };
}
