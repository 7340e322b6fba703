//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path and method matching, body
//! accumulation, dispatch to the book handlers, and access logging.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::books;
use crate::config::AppState;
use crate::http::response::{build_400_response, build_404_response, build_413_response};
use crate::logger::{self, AccessLogEntry};

/// Where a request is headed after path and method matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    List,
    Create,
    Update(&'a str),
    Delete(&'a str),
    NotFound,
}

/// Match a method and path against the books dispatch table.
///
/// Paths have the shape `/<resource>[/<id>]`; segments past the id are
/// ignored. PUT and DELETE require an id segment. Anything else, including
/// unrecognized methods and resources, is not found (no 405).
pub fn match_route<'a>(method: &Method, path: &'a str) -> Route<'a> {
    let mut segments = path.trim_start_matches('/').split('/');
    let resource = segments.next().unwrap_or("");
    let id = segments.next().filter(|s| !s.is_empty());

    if resource != "books" {
        return Route::NotFound;
    }

    match (method, id) {
        (&Method::GET, _) => Route::List,
        (&Method::POST, _) => Route::Create,
        (&Method::PUT, Some(id)) => Route::Update(id),
        (&Method::DELETE, Some(id)) => Route::Delete(id),
        _ => Route::NotFound,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        dispatch(req, &state, &method, &path).await
    };

    if state.cached_access_log.load(Ordering::Relaxed) {
        log_access(&state, peer_addr, &method, &path, &response, started);
    }

    Ok(response)
}

/// Dispatch a request to its handler, accumulating the body first where the
/// handler needs one.
async fn dispatch(
    req: Request<Incoming>,
    state: &AppState,
    method: &Method,
    path: &str,
) -> Response<Full<Bytes>> {
    match match_route(method, path) {
        Route::List => books::list(state).await,
        Route::Create => match collect_body(req).await {
            Ok(body) => books::create(state, &body).await,
            Err(resp) => resp,
        },
        Route::Update(id) => match collect_body(req).await {
            Ok(body) => books::update(state, id, &body).await,
            Err(resp) => resp,
        },
        Route::Delete(id) => books::delete(state, id).await,
        Route::NotFound => build_404_response("Route not found"),
    }
}

/// Await the full request body before parsing.
async fn collect_body(req: Request<Incoming>) -> Result<Bytes, Response<Full<Bytes>>> {
    match req.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(build_400_response("Failed to read request body"))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &Request<Incoming>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(build_413_response())
        }
        _ => None,
    }
}

fn log_access(
    state: &AppState,
    peer_addr: SocketAddr,
    method: &Method,
    path: &str,
    response: &Response<Full<Bytes>>,
    started: Instant,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.to_string(),
        path.to_string(),
    );
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_books_dispatch_table() {
        assert_eq!(match_route(&Method::GET, "/books"), Route::List);
        assert_eq!(match_route(&Method::POST, "/books"), Route::Create);
        assert_eq!(match_route(&Method::PUT, "/books/7"), Route::Update("7"));
        assert_eq!(
            match_route(&Method::DELETE, "/books/7"),
            Route::Delete("7")
        );
    }

    #[test]
    fn test_id_segment_is_optional_for_get_and_post() {
        assert_eq!(match_route(&Method::GET, "/books/7"), Route::List);
        assert_eq!(match_route(&Method::POST, "/books/7"), Route::Create);
    }

    #[test]
    fn test_put_and_delete_require_id_segment() {
        assert_eq!(match_route(&Method::PUT, "/books"), Route::NotFound);
        assert_eq!(match_route(&Method::PUT, "/books/"), Route::NotFound);
        assert_eq!(match_route(&Method::DELETE, "/books"), Route::NotFound);
    }

    #[test]
    fn test_unknown_resource_is_not_found() {
        assert_eq!(match_route(&Method::GET, "/widgets"), Route::NotFound);
        assert_eq!(match_route(&Method::GET, "/"), Route::NotFound);
        assert_eq!(match_route(&Method::GET, "/bookshelf"), Route::NotFound);
    }

    #[test]
    fn test_unrecognized_method_is_not_found() {
        assert_eq!(match_route(&Method::PATCH, "/books/7"), Route::NotFound);
        assert_eq!(match_route(&Method::HEAD, "/books"), Route::NotFound);
    }

    #[test]
    fn test_segments_past_the_id_are_ignored() {
        assert_eq!(
            match_route(&Method::PUT, "/books/7/extra"),
            Route::Update("7")
        );
    }

    #[test]
    fn test_non_numeric_id_still_routes() {
        // The handlers treat a non-numeric id as matching no record.
        assert_eq!(
            match_route(&Method::DELETE, "/books/abc"),
            Route::Delete("abc")
        );
    }
}
