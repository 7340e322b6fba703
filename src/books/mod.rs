// Book resource module
// The /books surface: record type, id assignment, and the CRUD handlers.

mod handlers;
mod types;

pub use handlers::{create, delete, list, update};
pub use types::Book;
