//! Turns a parsed request into a response for a file under the document root.

use std::io;

use crate::files::{DocumentRoot, ResolveError, is_modified_since};
use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Validates `req` and builds its response.
///
/// Checks run in a fixed order: method, path, media type, freshness. A 415
/// therefore always means the file exists. HEAD gets exactly the headers GET
/// would, with an empty body.
pub async fn handle(root: &DocumentRoot, req: &Request) -> Response {
    let response = respond(root, req).await;

    if req.method == Method::HEAD {
        response.without_body()
    } else {
        response
    }
}

async fn respond(root: &DocumentRoot, req: &Request) -> Response {
    if !req.method.is_servable() {
        tracing::debug!(method = req.method.as_str(), "Unsupported method");
        return Response::bad_request();
    }

    let file = match root.resolve(&req.target).await {
        Ok(file) => file,
        Err(ResolveError::BadTarget) => return Response::bad_request(),
        Err(ResolveError::Forbidden) => return Response::forbidden(),
        Err(ResolveError::NotFound) => return Response::not_found(),
    };

    let Some(media_type) = mime::classify(&file.requested) else {
        return Response::unsupported_media_type();
    };

    let last_modified = httpdate::fmt_http_date(file.modified);

    if !is_modified_since(file.modified, req.header("If-Modified-Since")) {
        return ResponseBuilder::new(StatusCode::NotModified)
            .header("Last-Modified", last_modified)
            .build();
    }

    let builder = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", media_type.as_str())
        .header("Last-Modified", last_modified);

    if req.method == Method::HEAD {
        return builder
            .header("Content-Length", file.len.to_string())
            .build();
    }

    match tokio::fs::read(&file.path).await {
        Ok(contents) => builder.body(contents).build(),
        Err(e) => {
            tracing::warn!(path = %file.path.display(), error = %e, "Failed to read file");
            match e.kind() {
                io::ErrorKind::PermissionDenied => Response::forbidden(),
                io::ErrorKind::NotFound => Response::not_found(),
                _ => Response::internal_error(),
            }
        }
    }
}
