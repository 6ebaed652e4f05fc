//! Delay proxy: a latency-injecting pass-through proxy for integration-test
//! environments.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────┐
//!                  │               DELAY PROXY                 │
//!                  │                                           │
//!  Client Request  │  ┌─────────┐   ┌────────┐   ┌──────────┐  │
//!  ────────────────┼─▶│  http   │──▶│ delay  │──▶│ forward  │──┼──▶ Upstream
//!                  │  │ server  │   │ (timer)│   │ (client) │  │    Origin
//!                  │  └─────────┘   └────────┘   └─────┬────┘  │
//!                  │                                   │       │
//!  Client Response │                                   ▼       │
//!  ◀───────────────┼───────────────────── streamed response ◀──┼──── Upstream
//!                  │                                           │
//!                  │  config │ observability │ lifecycle       │
//!                  └───────────────────────────────────────────┘
//! ```
//!
//! Every request, any method and any path, is suspended for a fixed delay
//! and then forwarded verbatim to the single configured upstream origin.

use std::path::Path;

use tokio::net::TcpListener;

use delay_proxy::config::{loader, ProxyConfig};
use delay_proxy::lifecycle::signals;
use delay_proxy::observability::logging;
use delay_proxy::{HttpServer, Shutdown};

/// Optional config file; defaults are used when it is absent.
const CONFIG_PATH: &str = "delay-proxy.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = if Path::new(CONFIG_PATH).exists() {
        loader::load_config(Path::new(CONFIG_PATH))?
    } else {
        ProxyConfig::default()
    };

    logging::init(&config.observability);

    tracing::info!("delay-proxy v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.origin,
        delay_ms = config.delay.duration_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::trigger_on_signal(shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
