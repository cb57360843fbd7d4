use crate::http::headers::HeaderMap;
use crate::http::request::{Method, Request};

/// Request heads larger than this are rejected unless a caller picks another limit.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8192;

/// GET and HEAD carry no meaningful body; anything bigger is not buffered.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not UTF-8 or is not exactly `METHOD SP target SP version`
    InvalidRequest,
    InvalidVersion,
    InvalidHeader,
    InvalidContentLength,
    UnsupportedTransferEncoding,
    /// Head (or declared body) exceeds the configured limit
    TooLarge,
    /// Not enough bytes buffered yet
    Incomplete,
}

pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse_http_request_with_limit(buf, DEFAULT_MAX_HEADER_BYTES)
}

/// Parses one request from the front of `buf`.
///
/// On success returns the request and the number of bytes it occupied,
/// including any empty lines preceding the request line and the body
/// announced by `Content-Length`.
pub fn parse_http_request_with_limit(
    buf: &[u8],
    max_header_bytes: usize,
) -> Result<(Request, usize), ParseError> {
    let start = skip_leading_empty_lines(buf);
    let buf_rest = &buf[start..];

    // Look for header/body separator
    let headers_end = match find_headers_end(buf_rest) {
        Some(end) if end > max_header_bytes => return Err(ParseError::TooLarge),
        Some(end) => end,
        None if buf_rest.len() > max_header_bytes => return Err(ParseError::TooLarge),
        None => return Err(ParseError::Incomplete),
    };
    let header_bytes = &buf_rest[..headers_end];
    let body_bytes = &buf_rest[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes)
        .map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let (method_str, target, version) = split_request_line(request_line)?;

    if !is_valid_version(version) {
        return Err(ParseError::InvalidVersion);
    }

    // Headers
    let mut headers = HeaderMap::new();

    for line in lines {
        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::InvalidHeader)?;

        if key.is_empty() || key.contains(|c: char| c.is_ascii_whitespace()) {
            return Err(ParseError::InvalidHeader);
        }

        headers.insert(key, value.trim());
    }

    if headers.contains("Transfer-Encoding") {
        return Err(ParseError::UnsupportedTransferEncoding);
    }

    // Body
    let content_length = declared_body_len(&headers)?;

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();

    let request = Request {
        method: Method::parse(method_str),
        target: target.to_string(),
        version: version.to_string(),
        headers,
        body,
    };

    let total_consumed = start + headers_end + 4 + content_length;
    Ok((request, total_consumed))
}

/// Splits on single spaces into exactly three non-empty tokens.
fn split_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None)
            if !method.is_empty() && !target.is_empty() && !version.is_empty() =>
        {
            Ok((method, target, version))
        }
        _ => Err(ParseError::InvalidRequest),
    }
}

/// `HTTP/<digit>.<digit>`
fn is_valid_version(version: &str) -> bool {
    match version.strip_prefix("HTTP/").map(str::as_bytes) {
        Some([major, b'.', minor]) => major.is_ascii_digit() && minor.is_ascii_digit(),
        _ => false,
    }
}

fn skip_leading_empty_lines(buf: &[u8]) -> usize {
    let mut offset = 0;
    while buf[offset..].starts_with(b"\r\n") {
        offset += 2;
    }
    offset
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}

/// Body length declared by `Content-Length`; absent means no body.
fn declared_body_len(headers: &HeaderMap) -> Result<usize, ParseError> {
    let Some(value) = headers.get("Content-Length") else {
        return Ok(0);
    };

    let len = value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength)?;

    if len > MAX_BODY_BYTES {
        return Err(ParseError::TooLarge);
    }
    Ok(len)
}
