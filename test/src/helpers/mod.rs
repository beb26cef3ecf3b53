pub mod assertions;
pub mod batch_builder;
pub mod rpc_exchange;
pub mod test_client;
pub mod test_server;

pub use batch_builder::ChangeBatchBuilder;
pub use rpc_exchange::{exchange, exchange_n_times};
pub use test_client::TestClient;
pub use test_server::TestServer;
