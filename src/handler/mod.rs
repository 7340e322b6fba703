// Request handling module
// Routes incoming HTTP requests to the book handlers.

pub mod router;

pub use router::handle_request;
