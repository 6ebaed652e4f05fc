//! Delay proxy library: a latency-injecting pass-through proxy for
//! integration-test fixtures.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
