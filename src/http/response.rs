use crate::http::headers::HeaderMap;

/// HTTP status codes the file server emits.
///
/// - `Ok` (200): File served
/// - `NotModified` (304): Conditional GET satisfied
/// - `BadRequest` (400): Malformed request or unsupported method
/// - `Forbidden` (403): Target escapes the document root
/// - `NotFound` (404): No regular file at the target
/// - `UnsupportedMediaType` (415): File type is not served
/// - `InternalServerError` (500): File could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 415 Unsupported Media Type
    UnsupportedMediaType,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::UnsupportedMediaType.as_u16(), 415);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotModified.reason_phrase(), "Not Modified");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Statuses after which the connection is not reused.
    ///
    /// A 400 means the stream framing cannot be trusted; a 500 means the
    /// server itself is in trouble.
    pub fn closes_connection(&self) -> bool {
        matches!(self, StatusCode::BadRequest | StatusCode::InternalServerError)
    }

    fn description(&self) -> &'static str {
        match self {
            StatusCode::BadRequest => "The server could not understand the request.",
            StatusCode::Forbidden => "Access to the requested resource is not allowed.",
            StatusCode::NotFound => "The requested resource was not found on this server.",
            StatusCode::UnsupportedMediaType => "The requested resource has a type this server does not serve.",
            StatusCode::InternalServerError => "The requested resource could not be read.",
            StatusCode::Ok | StatusCode::NotModified => "",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Contains the HTTP status code, headers, and response body.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers, in the order they will be written
    pub headers: HeaderMap,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use lantern::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<h1>hi</h1>".to_vec())
///     .build();
///
/// assert_eq!(response.headers.get("Content-Length"), Some("11"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header (names are case-insensitive).
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds the Content-Length header based on body size if not already
    /// present. HEAD responses set it explicitly before the body is dropped.
    pub fn build(mut self) -> Response {
        if !self.headers.contains("Content-Length") {
            self.headers.insert("Content-Length", self.body.len().to_string());
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates an error response with a small HTML page describing `status`.
    pub fn error(status: StatusCode) -> Self {
        let body = format!(
            "<html><head><title>{code} {reason}</title></head>\
             <body><h1>{code} {reason}</h1><p>{description}</p></body></html>",
            code = status.as_u16(),
            reason = status.reason_phrase(),
            description = status.description(),
        );

        ResponseBuilder::new(status)
            .header("Content-Type", "text/html")
            .body(body.into_bytes())
            .build()
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    pub fn forbidden() -> Self {
        Self::error(StatusCode::Forbidden)
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn unsupported_media_type() -> Self {
        Self::error(StatusCode::UnsupportedMediaType)
    }

    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }

    /// Drops the body while keeping Content-Length, as HEAD requires.
    pub fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }
}
