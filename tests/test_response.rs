use lantern::http::response::{Response, ResponseBuilder, StatusCode};
use lantern::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::NotModified.as_u16(), 304);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::UnsupportedMediaType.as_u16(), 415);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NotModified.reason_phrase(), "Not Modified");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::UnsupportedMediaType.reason_phrase(),
        "Unsupported Media Type"
    );
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_code_closes_connection() {
    assert!(StatusCode::BadRequest.closes_connection());
    assert!(StatusCode::InternalServerError.closes_connection());
    assert!(!StatusCode::Ok.closes_connection());
    assert!(!StatusCode::Forbidden.closes_connection());
    assert!(!StatusCode::NotFound.closes_connection());
    assert!(!StatusCode::UnsupportedMediaType.closes_connection());
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("x-custom").unwrap(), "value");
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    let content_length = response.headers.get("Content-Length").unwrap();
    assert_eq!(content_length, body.len().to_string());
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("content-length", "999")
        .body(b"test".to_vec())
        .build();

    // Should keep the custom value, whatever its spelling
    assert_eq!(response.headers.get("Content-Length").unwrap(), "999");
    assert_eq!(response.headers.len(), 1);
}

#[test]
fn test_response_builder_header_replaces() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("content-type", "text/html")
        .build();

    assert_eq!(response.headers.len(), 2); // Content-Type + auto Content-Length
    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::NotModified).build();

    assert_eq!(response.body.len(), 0);
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
}

#[test]
fn test_response_error_pages() {
    for (response, status) in [
        (Response::bad_request(), StatusCode::BadRequest),
        (Response::forbidden(), StatusCode::Forbidden),
        (Response::not_found(), StatusCode::NotFound),
        (Response::unsupported_media_type(), StatusCode::UnsupportedMediaType),
        (Response::internal_error(), StatusCode::InternalServerError),
    ] {
        assert_eq!(response.status, status);
        assert_eq!(response.headers.get("Content-Type"), Some("text/html"));

        let body = String::from_utf8(response.body.clone()).unwrap();
        let heading = format!("<h1>{} {}</h1>", status.as_u16(), status.reason_phrase());
        assert!(body.contains(&heading), "{body}");
        assert_eq!(
            response.headers.get("Content-Length").unwrap(),
            response.body.len().to_string()
        );
    }
}

#[test]
fn test_response_without_body_keeps_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"twelve bytes".to_vec())
        .build()
        .without_body();

    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("Content-Length").unwrap(), "12");
}

#[test]
fn test_serialize_response_layout() {
    let response = ResponseBuilder::new(StatusCode::NotFound)
        .header("Content-Type", "text/html")
        .body(b"<p>x</p>".to_vec())
        .build();

    let bytes = serialize_response(&response);

    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: 8\r\n\r\n<p>x</p>"
    );
}
