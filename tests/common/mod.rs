//! Shared utilities for integration testing the delay proxy.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use delay_proxy::{HttpServer, ProxyConfig, Shutdown};

/// Raw requests observed by a capture backend.
pub type CapturedRequests = Arc<Mutex<Vec<String>>>;

/// Start a mock upstream that records every raw request (head and body,
/// byte-for-byte) and answers `200 OK` with body "ok".
///
/// Returns the captured request log and a hit counter.
pub async fn start_capture_backend(addr: SocketAddr) -> (CapturedRequests, Arc<AtomicU32>) {
    let listener = TcpListener::bind(addr).await.unwrap();
    let captured: CapturedRequests = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicU32::new(0));

    let task_captured = captured.clone();
    let task_hits = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let captured = task_captured.clone();
                    let hits = task_hits.clone();
                    tokio::spawn(async move {
                        hits.fetch_add(1, Ordering::SeqCst);

                        let raw = read_http_request(&mut socket).await;
                        captured.lock().await.push(raw);

                        let response =
                            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (captured, hits)
}

/// Start a mock upstream that advertises a 10-byte body, writes only a
/// prefix of it, then hard-resets the connection.
#[allow(dead_code)]
pub async fn start_truncating_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_http_request(&mut socket).await;

                        let _ = socket
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc")
                            .await;
                        // Let the head and the body prefix reach the proxy
                        // before the reset.
                        tokio::time::sleep(Duration::from_millis(100)).await;

                        // Linger 0 turns the close into an RST.
                        let _ = socket.set_linger(Some(Duration::from_secs(0)));
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Read one HTTP request from the socket: headers, then a body of
/// Content-Length bytes when the header is present.
async fn read_http_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break buf.len(),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find_header_end(&buf) {
                    break pos;
                }
            }
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let total = head_end + 4 + content_length;
    while buf.len() < total {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Start a delay proxy on `proxy_addr` forwarding to `upstream_origin` after
/// `delay_ms`. Returns the shutdown handle that stops it.
pub async fn start_delay_proxy(
    proxy_addr: SocketAddr,
    upstream_origin: &str,
    delay_ms: u64,
) -> Shutdown {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.upstream.origin = upstream_origin.to_string();
    config.delay.duration_ms = delay_ms;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(proxy_addr).await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    shutdown
}
