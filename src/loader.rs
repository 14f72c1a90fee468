// ---------------------------------------------------------------------------
// Catalog loading — one-time parse of the static book document
// ---------------------------------------------------------------------------
//
// The catalog source is a JSON array of book records, read once at startup.
// A document that cannot be read or parsed at all is an error the engine
// degrades to an empty collection; individually malformed records, duplicate
// ids, and books with an empty theme list are skipped and counted instead of
// failing the whole load.
// ---------------------------------------------------------------------------

use std::collections::HashSet;
use std::path::Path;

use crate::error::CatalogError;
use crate::types::Book;

/// Result of loading a catalog document.
#[derive(Debug)]
pub struct LoadedCatalog {
	pub books: Vec<Book>,
	/// Records dropped during the tolerant parse.
	pub skipped: usize,
}

/// Parse a catalog document from its JSON text.
///
/// The document must be a JSON array; each element is decoded on its own so
/// one bad record cannot poison the rest.
pub fn parse_catalog(json: &str) -> Result<LoadedCatalog, CatalogError> {
	let records: Vec<serde_json::Value> = serde_json::from_str(json)
		.map_err(|e| CatalogError::Parse(format!("Invalid catalog JSON: {}", e)))?;

	let mut books: Vec<Book> = Vec::with_capacity(records.len());
	let mut seen_ids: HashSet<u64> = HashSet::new();
	let mut skipped = 0;

	for record in records {
		let book: Book = match serde_json::from_value(record) {
			Ok(b) => b,
			Err(e) => {
				tracing::warn!("Skipping malformed book record: {}", e);
				skipped += 1;
				continue;
			}
		};

		if book.themes.is_empty() {
			tracing::warn!(id = book.id, "Skipping book with no themes");
			skipped += 1;
			continue;
		}

		// Ids must be unique and stable; keep the first occurrence.
		if !seen_ids.insert(book.id) {
			tracing::warn!(id = book.id, "Skipping book with duplicate id");
			skipped += 1;
			continue;
		}

		books.push(book);
	}

	Ok(LoadedCatalog { books, skipped })
}

/// Read and parse a catalog document from disk.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, CatalogError> {
	let json = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
	parse_catalog(&json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
