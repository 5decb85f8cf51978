pub mod json_backend;

use std::path::Path;

use crate::{domain::cashbook::Cashbook, errors::StoreError};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends capable of storing books.
///
/// The core only requires the load/save contract; date-bearing fields are
/// revived from their ISO-8601 serialized form into true date values by the
/// typed deserialization path.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &Cashbook, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Cashbook>;
    fn list_books(&self) -> Result<Vec<String>>;

    /// Optional helpers for ad-hoc file operations. Default implementations
    /// forward to the JSON document layout.
    fn save_to_path(&self, book: &Cashbook, path: &Path) -> Result<()> {
        json_backend::save_book_to_path(book, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Cashbook> {
        json_backend::load_book_from_path(path)
    }
}

pub use json_backend::JsonStorage;
