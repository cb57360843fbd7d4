use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::http::handler;
use crate::http::parser::{parse_http_request_with_limit, ParseError};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::access_log::LogRecord;
use crate::server::ServerContext;

/// Value of the `Server` response header.
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const READ_CHUNK: usize = 4096;

/// Longest request line copied into the access log for a malformed request.
const MAX_LOGGED_LINE: usize = 1024;

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    state: ConnectionState,
    ctx: Arc<ServerContext>,
}

pub enum ConnectionState {
    AwaitingRequest,
    Validating(Request),
    Responding(Exchange),
    Closed,
}

/// A response on its way out, plus what the access log needs to know about it.
pub struct Exchange {
    writer: ResponseWriter,
    keep_alive: bool,
    request_line: String,
    status: StatusCode,
}

enum ReadOutcome {
    Request(Request),
    Malformed { error: ParseError, request_line: String },
    /// Peer closed the stream or went idle before sending a full request
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, ctx: Arc<ServerContext>) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::AwaitingRequest,
            ctx,
        }
    }

    /// Serves requests until the connection is no longer persistent.
    ///
    /// Returns an error only for transport failures; everything a client can
    /// be blamed for is answered with a response.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequest => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Validating(req),
                        ReadOutcome::Malformed { error, request_line } => {
                            tracing::debug!(peer = %self.peer, ?error, "Malformed request");
                            // The stream cannot be resynchronized after a bad request.
                            ConnectionState::Responding(Self::exchange(
                                Response::bad_request(),
                                request_line,
                                false,
                            ))
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Validating(req) => {
                    let response = handler::handle(&self.ctx.root, &req).await;
                    let keep_alive = req.keep_alive() && !response.status.closes_connection();

                    self.state = ConnectionState::Responding(Self::exchange(
                        response,
                        req.request_line(),
                        keep_alive,
                    ));
                }

                ConnectionState::Responding(mut exchange) => {
                    let written = exchange.writer.write_to_stream(&mut self.stream).await;

                    // Logged even when the write failed.
                    self.log(&exchange.request_line, exchange.status);
                    written?;

                    if exchange.keep_alive {
                        self.state = ConnectionState::AwaitingRequest; // go back for next request
                    } else {
                        let _ = self.stream.shutdown().await;
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request_with_limit(&self.buffer, self.ctx.max_header_bytes) {
                Ok((request, consumed)) => {
                    // Pipelined bytes stay buffered for the next cycle
                    self.buffer.advance(consumed);
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(error) => {
                    let request_line = first_line(&self.buffer);
                    self.buffer.clear();
                    return Ok(ReadOutcome::Malformed { error, request_line });
                }
            }

            self.buffer.reserve(READ_CHUNK);
            let read = self.stream.read_buf(&mut self.buffer);

            let n = match self.ctx.idle_timeout {
                Some(limit) => match timeout(limit, read).await {
                    Ok(n) => n?,
                    Err(_) => {
                        tracing::debug!(peer = %self.peer, "Idle timeout, closing");
                        return Ok(ReadOutcome::Closed);
                    }
                },
                None => read.await?,
            };

            if n == 0 {
                // Client closed connection
                if !self.buffer.is_empty() {
                    tracing::debug!(
                        peer = %self.peer,
                        buffered = self.buffer.len(),
                        "Client closed mid-request"
                    );
                }
                return Ok(ReadOutcome::Closed);
            }
        }
    }

    /// Adds the headers every response carries and serializes it.
    fn exchange(mut response: Response, request_line: String, keep_alive: bool) -> Exchange {
        response
            .headers
            .insert("Date", httpdate::fmt_http_date(SystemTime::now()));
        response.headers.insert("Server", SERVER_NAME);
        response.headers.insert(
            "Connection",
            if keep_alive { "keep-alive" } else { "close" },
        );

        Exchange {
            writer: ResponseWriter::new(&response),
            keep_alive,
            request_line,
            status: response.status,
        }
    }

    fn log(&self, request_line: &str, status: StatusCode) {
        let record = LogRecord::new(self.peer, request_line, status);

        if let Err(e) = self.ctx.access_log.record(&record) {
            tracing::warn!(peer = %self.peer, error = %e, "Failed to write access log");
        }
    }
}

/// First non-empty line of a raw request, for logging.
fn first_line(buf: &[u8]) -> String {
    let line = buf
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let line = &line[..line.len().min(MAX_LOGGED_LINE)];
    String::from_utf8_lossy(line).into_owned()
}
