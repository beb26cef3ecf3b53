use treesync_server::{DispatchOutcome, RpcError};

use super::{TestClient, TestServer};

/// Sends everything the client has queued to the server and returns the
/// dispatch result of each command
pub fn exchange(
    client: &mut TestClient,
    server: &mut TestServer,
) -> Vec<Result<DispatchOutcome, RpcError>> {
    let outgoing = client.take_outgoing();
    server.receive(&outgoing)
}

/// Runs `n` exchanges, collecting every dispatch result
pub fn exchange_n_times(
    client: &mut TestClient,
    server: &mut TestServer,
    n: usize,
) -> Vec<Result<DispatchOutcome, RpcError>> {
    let mut results = Vec::new();
    for _ in 0..n {
        results.extend(exchange(client, server));
    }
    results
}
