use crate::http::headers::HeaderMap;

/// HTTP request methods.
///
/// Every syntactically valid method token parses; the file server only
/// serves `GET` and `HEAD` and answers everything else with 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
    /// Any other method token, kept verbatim
    Extension(String),
}

/// Represents a parsed HTTP request from a client.
///
/// Contains all information extracted from the request line and headers.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, HEAD, ...)
    pub method: Method,
    /// The request target exactly as sent (e.g., "/index.html?v=2")
    pub target: String,
    /// HTTP version token (e.g., "HTTP/1.1")
    pub version: String,
    /// Request headers, looked up case-insensitively
    pub headers: HeaderMap,
    /// Request body, present only when the client sent Content-Length
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Method {
    /// Parses a method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Extension(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token,
        }
    }

    /// Whether the file server can answer this method.
    pub fn is_servable(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target: self.target.ok_or("target missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// The request line as it appeared on the wire, without CRLF.
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method.as_str(), self.target, self.version)
    }

    /// Determines whether the client allows the connection to stay open.
    ///
    /// HTTP/1.1 persists unless `Connection: close` is sent. HTTP/1.0 only
    /// persists with an explicit `Connection: keep-alive`. Anything else
    /// closes.
    pub fn keep_alive(&self) -> bool {
        match self.version.as_str() {
            "HTTP/1.1" => !self.headers.has_token("Connection", "close"),
            "HTTP/1.0" => self.headers.has_token("Connection", "keep-alive"),
            _ => false,
        }
    }
}
