//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client for completion API calls.
//! No request timeout is set: the analysis call waits for as long as the
//! transport allows.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for chat-completion requests
pub static COMPLETION_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(concat!("lexreview/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create completion HTTP client")
});

/// Get the global completion HTTP client
#[inline]
pub fn completion_client() -> &'static Client {
    &COMPLETION_CLIENT
}
