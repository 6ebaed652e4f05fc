//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, HTTP/1.1 + HTTP/2, header case preserved)
//!     → delay-forward handler (timer suspension, then single forward)
//!     → upstream response streamed back to the client
//! ```

pub mod error;
pub mod server;

pub use error::ProxyError;
pub use server::HttpServer;
