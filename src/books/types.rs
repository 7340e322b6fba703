// Book record types
// A record is a store-assigned id plus whatever fields the caller supplied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single book record. Caller-supplied fields (title, author, ...) are an
/// open set and are kept verbatim via serde flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Book {
    /// Build a new record from caller-supplied fields. An `id` key in the
    /// input is discarded; the stored id is always the one assigned here.
    pub fn new(id: u64, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    /// Merge update fields over this record. Update fields win, fields
    /// absent from the update keep their prior values. The id is immutable
    /// and an `id` key in the update is ignored.
    pub fn merge(&mut self, updates: Map<String, Value>) {
        for (key, value) in updates {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// Next id for a collection: one past the highest id currently in use.
/// Ids freed by deletions are never handed out again.
pub fn next_id(books: &[Book]) -> u64 {
    books.iter().map(|b| b.id).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect()
    }

    #[test]
    fn test_next_id_empty_collection() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn test_next_id_is_increasing() {
        let mut books = Vec::new();
        for expected in 1..=5 {
            let id = next_id(&books);
            assert_eq!(id, expected);
            books.push(Book::new(id, fields(&[])));
        }
    }

    #[test]
    fn test_next_id_does_not_reuse_after_deletion() {
        // Collection [1, 3]: length + 1 would collide with 3.
        let books = vec![
            Book::new(1, fields(&[("title", "A")])),
            Book::new(3, fields(&[("title", "C")])),
        ];
        assert_eq!(next_id(&books), 4);
    }

    #[test]
    fn test_new_discards_caller_supplied_id() {
        let mut input = fields(&[("title", "Dune")]);
        input.insert("id".to_string(), json!(99));

        let book = Book::new(7, input);
        assert_eq!(book.id, 7);
        assert!(!book.fields.contains_key("id"));
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut book = Book::new(1, fields(&[("title", "A"), ("author", "X")]));
        book.merge(fields(&[("title", "B")]));

        assert_eq!(book.fields["title"], json!("B"));
        assert_eq!(book.fields["author"], json!("X"));
    }

    #[test]
    fn test_merge_ignores_id_key() {
        let mut book = Book::new(1, fields(&[("title", "A")]));
        let mut updates = fields(&[]);
        updates.insert("id".to_string(), json!(42));
        book.merge(updates);

        assert_eq!(book.id, 1);
        assert!(!book.fields.contains_key("id"));
    }

    #[test]
    fn test_serialization_flattens_fields() {
        let book = Book::new(2, fields(&[("title", "Dune")]));
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value, json!({"id": 2, "title": "Dune"}));

        let parsed: Book = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, book);
    }
}
