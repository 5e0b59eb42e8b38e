//! Data ingestion and validation layer.

pub mod loader;

pub use loader::{load_documents, DocumentRecord, REQUIRED_COLUMNS};
