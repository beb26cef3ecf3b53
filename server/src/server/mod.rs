mod client_invocation;
pub use client_invocation::ClientInvocation;

mod server_config;
pub use server_config::ServerConfig;

mod ui_context;
pub use ui_context::UiContext;
