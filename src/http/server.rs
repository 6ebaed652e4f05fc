//! HTTP server setup and the delay-then-forward handler.
//!
//! # Responsibilities
//! - Create Axum Router with the wildcard handler
//! - Serve HTTP/1.1 and HTTP/2 with header case preserved end-to-end
//! - Suspend each request for the configured delay
//! - Forward requests unmodified to the fixed upstream origin
//! - Stream upstream responses back to the client verbatim
//!
//! # Design Decisions
//! - The delay is a timer suspension (`tokio::time::sleep`), never a blocked
//!   thread, so concurrent requests ride out their delays in parallel
//! - Exactly one forwarding attempt per request; failures map to 502
//! - A client disconnect drops the handler future mid-delay or mid-forward,
//!   abandoning the remaining work for that request

use axum::{
    body::Body,
    extract::State,
    http::uri::{Authority, PathAndQuery, Scheme},
    http::{Request, Uri},
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
    service::TowerToHyperService,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream_scheme: Scheme,
    pub upstream_authority: Authority,
    pub delay: Duration,
}

/// HTTP server for the delay proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the configured upstream origin cannot be parsed into a
    /// scheme and authority.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let (upstream_scheme, upstream_authority) = config.upstream.parse_origin()?;

        // Preserve the original header casing the listener recorded when
        // writing the forwarded request upstream.
        let client = Client::builder(TokioExecutor::new())
            .http1_preserve_header_case(true)
            .build(HttpConnector::new());

        let state = AppState {
            client,
            upstream_scheme,
            upstream_authority,
            delay: config.delay.duration(),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router: every method on every path hits the same
    /// delay-forward handler.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(delay_forward_handler))
            .route("/", any(delay_forward_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.origin,
            delay_ms = self.config.delay.duration_ms,
            "Delay proxy listening"
        );

        let service = TowerToHyperService::new(self.router);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
                _ = shutdown.recv() => break,
            };

            tracing::debug!(peer = %peer, "Connection accepted");

            let service = service.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let mut builder = auto::Builder::new(TokioExecutor::new());
                // Record inbound header casing so forwarding can replay it.
                builder.http1().preserve_header_case(true);

                if let Err(e) = builder.serve_connection(io, service).await {
                    // Client disconnects and mid-stream resets land here;
                    // debug only, never a hard failure.
                    tracing::debug!(peer = %peer, error = %e, "Connection closed");
                }
            });
        }

        tracing::info!("Delay proxy stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// The single wildcard handler: suspend for the configured delay, then
/// forward the request untouched to the fixed upstream and relay the
/// response.
async fn delay_forward_handler(
    State(state): State<AppState>,
    mut request: Request<Body>,
) -> Result<Response, ProxyError> {
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        "Received request"
    );

    // Suspension point: yields the task, other requests keep progressing.
    tokio::time::sleep(state.delay).await;

    *request.uri_mut() = upstream_uri(
        request.uri(),
        &state.upstream_scheme,
        &state.upstream_authority,
    )?;

    // Single attempt, no retry. Body streams through in both directions.
    let response = state
        .client
        .request(request)
        .await
        .map_err(ProxyError::from_client_error)?;

    let (parts, body) = response.into_parts();
    Ok(Response::from_parts(parts, Body::new(body)))
}

/// Rewrite only the scheme and authority of a request URI to point at the
/// upstream origin, keeping the path and query untouched.
fn upstream_uri(
    original: &Uri,
    scheme: &Scheme,
    authority: &Authority,
) -> Result<Uri, ProxyError> {
    let mut parts = original.clone().into_parts();
    parts.scheme = Some(scheme.clone());
    parts.authority = Some(authority.clone());
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }

    Uri::from_parts(parts).map_err(|_| ProxyError::InvalidOrigin(authority.to_string()))
}
