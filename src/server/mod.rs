use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AppConfig;

pub mod api;
pub mod routes;

use api::ApiContext;

/// Largest request (headers plus body) the server will buffer.
const MAX_REQUEST_BYTES: usize = 1 << 20;
/// How long one read may wait before the request is handled with what has arrived.
pub const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(5);

pub fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr)?;
    let ctx = ApiContext::new(config.state_store(), config.locale);
    info!(
        addr = %config.bind_addr,
        persistence = config.persistence_enabled,
        "commission server listening on http://{}",
        config.bind_addr
    );

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&ctx, &mut stream) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

fn handle_connection(ctx: &ApiContext, stream: &mut TcpStream) -> std::io::Result<()> {
    let Some(raw) = read_request(stream, REQUEST_READ_TIMEOUT)? else {
        return Ok(());
    };

    let request = String::from_utf8_lossy(&raw);
    let (head, body) = split_head_body(&request);
    let request_line = head.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let response = routes::route_request(ctx, method, path, body);
    info!(method, path, status = response.status_code, "handled request");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

/// Reads headers, then as many body bytes as `Content-Length` announces. A read that
/// stalls past `timeout` ends the request with the bytes received so far.
fn read_request(stream: &mut TcpStream, timeout: Duration) -> std::io::Result<Option<Vec<u8>>> {
    stream.set_read_timeout(Some(timeout))?;
    let mut raw = Vec::new();
    let mut buffer = [0_u8; 16_384];
    loop {
        let bytes_read = match stream.read(&mut buffer) {
            Ok(bytes_read) => bytes_read,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                warn!(received = raw.len(), "request read timed out");
                break;
            }
            Err(err) => return Err(err),
        };
        if bytes_read == 0 {
            break;
        }
        raw.extend_from_slice(&buffer[..bytes_read]);
        if raw.len() >= MAX_REQUEST_BYTES {
            break;
        }
        if let Some(header_end) = find_header_end(&raw) {
            let head = String::from_utf8_lossy(&raw[..header_end]);
            let expected = header_end + content_length(&head);
            if raw.len() >= expected {
                break;
            }
        }
    }
    Ok((!raw.is_empty()).then_some(raw))
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
        .or_else(|| raw.windows(2).position(|w| w == b"\n\n").map(|pos| pos + 2))
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn split_head_body(request: &str) -> (&str, &str) {
    request
        .split_once("\r\n\r\n")
        .or_else(|| request.split_once("\n\n"))
        .unwrap_or((request, ""))
}
