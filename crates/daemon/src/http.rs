// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The submission/observer surface (spec §4.E, §6): a thin HTTP front
//! door for `POST /task` and `POST /log-trace/prune`, and a WebSocket
//! upgrade on `GET /log-trace?id=<job-id>` that drives the log fabric's
//! `add_client`/`get`/`delete` protocol (spec §4.D).
//!
//! No keep-alive, no chunked transfer encoding, no framework: this layer
//! is deliberately thin per spec §1 ("the on-the-wire HTTP framing
//! itself" is an external collaborator, not core). The WebSocket
//! handshake itself is handled by `tokio-tungstenite`.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use jrun_core::JobId;
use jrun_wire::{PruneRequest, ProtocolError, SubmitRequest, LOG_TRACE_PATH, PRUNE_PATH, SUBMIT_PATH};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::server::AppState;

/// Caps the size of a request head (request line + headers) this layer
/// will buffer before giving up; guards against a client that never
/// sends a terminating blank line.
const MAX_HEAD_BYTES: usize = 64 * 1024;

pub async fn accept_loop(listener: TcpListener, state: Arc<AppState>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("submission/observer surface shutting down");
                return;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let state = state.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, state).await {
                                debug!(error = %e, "connection ended with an io error");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                }
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream, state: Arc<AppState>) -> std::io::Result<()> {
    let mut peek = [0u8; 3];
    let n = stream.peek(&mut peek).await?;
    if n == 3 && &peek == b"GET" {
        handle_websocket(stream, state).await;
        return Ok(());
    }
    handle_post(stream, state).await
}

/// Upgrades to a WebSocket and drives one subscriber's lifetime: attach
/// via `add_client`, forward lines from [`LocalReadStreamer::get`] until
/// the connection breaks, then `delete` on teardown. Client frames are
/// drained and ignored; their absence (a close) is what ends the loop.
async fn handle_websocket(stream: TcpStream, state: Arc<AppState>) {
    let captured: Arc<Mutex<Option<(String, String)>>> = Arc::new(Mutex::new(None));
    let for_callback = captured.clone();
    let callback = move |req: &Request, resp: Response| {
        let id = req.uri().query().and_then(|q| query_param(q, "id")).unwrap_or_default();
        let key = req
            .headers()
            .get("sec-websocket-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        *for_callback.lock() = Some((id, key));
        Ok(resp)
    };

    let ws_stream = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!(error = %e, "websocket handshake failed");
            return;
        }
    };

    let Some((id, key)) = captured.lock().clone() else { return };
    if id.is_empty() {
        let err = ProtocolError::MissingQueryParam("id");
        debug!(error = %err, "log-trace request rejected");
        return;
    }
    let Ok(job_id) = JobId::parse(&id) else {
        debug!(id, "log-trace requested with a malformed job id");
        return;
    };

    if state.read_streamer.add_client(&job_id, key.clone()).await.is_err() {
        return;
    }

    let (mut sink, mut source) = ws_stream.split();
    let read_streamer = state.read_streamer.clone();
    let forward_key = key.clone();
    let forward = tokio::spawn(async move {
        loop {
            match read_streamer.get(&forward_key).await {
                Ok(line) => {
                    if sink.send(Message::Text(line)).await.is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    while source.next().await.is_some() {
        // Client->server frames are ignored; only their absence matters.
    }

    forward.abort();
    state.read_streamer.delete(&key);
}

/// Handles one plain HTTP request: reads the head, reads the body up to
/// `Content-Length`, dispatches by `(method, path)`, writes a response,
/// then closes the connection.
async fn handle_post(mut stream: TcpStream, state: Arc<AppState>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return write_response(&mut stream, 400, "Bad Request").await;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        let err = ProtocolError::MalformedRequestLine(request_line.to_string());
        let (status, message) = status_for(&err);
        warn!(error = %err, "request rejected");
        return write_response(&mut stream, status, message).await;
    };
    let method = method.to_string();
    let route = path.split('?').next().unwrap_or(path).to_string();

    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);
    let body = buf[body_start..body_end].to_vec();

    let (status, message) = match dispatch(&method, &route, &body, &state).await {
        Some(Ok(())) => (200, ""),
        Some(Err(err)) => {
            warn!(error = %err, method, route, "request failed");
            status_for(&err)
        }
        None => (404, "Not Found"),
    };
    write_response(&mut stream, status, message).await
}

/// Routes a parsed request to its handler, converting every failure
/// along the way into a [`ProtocolError`] rather than matching out ad
/// hoc status codes. `None` means the path itself isn't one this
/// surface serves at all -- plain 404, not a protocol failure.
async fn dispatch(method: &str, route: &str, body: &[u8], state: &Arc<AppState>) -> Option<Result<(), ProtocolError>> {
    match (method, route) {
        ("POST", SUBMIT_PATH) => Some(submit(body, state).await),
        ("POST", PRUNE_PATH) => Some(prune(body, state).await),
        (other, SUBMIT_PATH) | (other, PRUNE_PATH) => Some(Err(ProtocolError::UnsupportedMethod(other.to_string()))),
        _ => None,
    }
}

async fn submit(body: &[u8], state: &Arc<AppState>) -> Result<(), ProtocolError> {
    let req: SubmitRequest = serde_json::from_slice(body)?;
    if req.cmd.trim().is_empty() {
        return Err(ProtocolError::MalformedRequestLine("empty cmd".to_string()));
    }
    state.queue.enqueue(&req.cmd, None).map_err(to_protocol_io_error)?;
    Ok(())
}

async fn prune(body: &[u8], state: &Arc<AppState>) -> Result<(), ProtocolError> {
    let req: PruneRequest = serde_json::from_slice(body)?;
    for id in &req.ids {
        match JobId::parse(id) {
            Ok(job_id) => state.file_handler.delete(&job_id).await.map_err(to_protocol_io_error)?,
            Err(_) => debug!(id, "prune requested for a malformed job id; skipping"),
        }
    }
    Ok(())
}

fn to_protocol_io_error(err: impl std::fmt::Display) -> ProtocolError {
    ProtocolError::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
}

fn status_for(err: &ProtocolError) -> (u16, &'static str) {
    match err {
        ProtocolError::MalformedRequestLine(_) => (400, "Bad Request"),
        ProtocolError::UnsupportedMethod(_) => (405, "Method Not Allowed"),
        ProtocolError::MissingQueryParam(_) => (400, "Bad Request"),
        ProtocolError::InvalidJson(_) => (400, "Bad Request"),
        ProtocolError::Io(_) => (500, "Internal Server Error"),
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

async fn write_response(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    };
    let response =
        format!("HTTP/1.1 {status} {reason}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}", body.len());
    stream.write_all(response.as_bytes()).await
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
