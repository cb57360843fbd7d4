use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes status line, headers and body into one buffer.
///
/// Headers go out in insertion order with the spelling they were given.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut head = format!(
        "{HTTP_VERSION} {} {}\r\n",
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );

    for (name, value) in resp.headers.iter() {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");

    let mut buf = head.into_bytes();
    buf.extend_from_slice(&resp.body);
    buf
}

/// A serialized response plus how much of it has reached the peer.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Writes whatever has not been written yet, then flushes.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::{ResponseBuilder, StatusCode};

    #[tokio::test]
    async fn writes_status_headers_and_body() {
        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .body(b"hi".to_vec())
            .build();

        let mut out: Vec<u8> = Vec::new();
        ResponseWriter::new(&response)
            .write_to_stream(&mut out)
            .await
            .unwrap();

        assert_eq!(
            out,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nhi".to_vec()
        );
    }
}
