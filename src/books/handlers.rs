//! Book request handlers
//!
//! Each handler runs a full load-modify-save cycle against the persistence
//! store. Mutating handlers hold the state's write lock for the whole cycle
//! so two concurrent mutations cannot both load before either saves.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde_json::{Map, Value};

use crate::config::AppState;
use crate::http::response::{
    build_400_response, build_404_response, build_500_response, build_json_response,
    build_text_response,
};
use crate::logger;
use crate::store::StoreError;

use super::types::{next_id, Book};

/// GET /books - return the whole collection.
pub async fn list(state: &AppState) -> Response<Full<Bytes>> {
    match state.store.load() {
        Ok(books) => build_json_response(200, &books),
        Err(e) => store_error_response(&e),
    }
}

/// POST /books - append a new record with a fresh id.
pub async fn create(state: &AppState, body: &Bytes) -> Response<Full<Bytes>> {
    let Some(fields) = parse_object(body) else {
        return build_400_response("Request body must be a JSON object");
    };

    let _guard = state.write_lock.lock().await;

    let mut books = match state.store.load() {
        Ok(books) => books,
        Err(e) => return store_error_response(&e),
    };

    let book = Book::new(next_id(&books), fields);
    books.push(book.clone());

    match state.store.save(&books) {
        Ok(()) => build_json_response(201, &book),
        Err(e) => store_error_response(&e),
    }
}

/// PUT /books/{id} - merge the payload over an existing record.
///
/// The id segment arrives raw from the path; a non-numeric segment matches
/// no record and reports not found.
pub async fn update(state: &AppState, raw_id: &str, body: &Bytes) -> Response<Full<Bytes>> {
    let Some(updates) = parse_object(body) else {
        return build_400_response("Request body must be a JSON object");
    };

    let id = raw_id.parse::<u64>().ok();

    let _guard = state.write_lock.lock().await;

    let mut books = match state.store.load() {
        Ok(books) => books,
        Err(e) => return store_error_response(&e),
    };

    let Some(book) = id.and_then(|id| books.iter_mut().find(|b| b.id == id)) else {
        return build_404_response("Book not found");
    };

    book.merge(updates);
    let updated = book.clone();

    match state.store.save(&books) {
        Ok(()) => build_json_response(200, &updated),
        Err(e) => store_error_response(&e),
    }
}

/// DELETE /books/{id} - remove matching records.
///
/// Succeeds whether or not a record matched; the collection is rewritten
/// either way. A non-numeric id segment matches nothing.
pub async fn delete(state: &AppState, raw_id: &str) -> Response<Full<Bytes>> {
    let id = raw_id.parse::<u64>().ok();

    let _guard = state.write_lock.lock().await;

    let mut books = match state.store.load() {
        Ok(books) => books,
        Err(e) => return store_error_response(&e),
    };

    books.retain(|b| Some(b.id) != id);

    match state.store.save(&books) {
        Ok(()) => build_text_response("Book deleted"),
        Err(e) => store_error_response(&e),
    }
}

/// Parse a request body as a JSON object, rejecting everything else.
fn parse_object(body: &Bytes) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => None,
    }
}

fn store_error_response(err: &StoreError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Store operation failed: {err}"));
    match err {
        StoreError::Io(_) => build_500_response("Failed to access book data"),
        StoreError::Parse(_) => build_500_response("Book data is corrupted"),
    }
}
