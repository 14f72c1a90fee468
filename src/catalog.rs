// ---------------------------------------------------------------------------
// CatalogEngine — immutable catalog + annotations behind one facade
// ---------------------------------------------------------------------------
//
// Owns the book collection, the theme index, and the annotation store, and
// exposes the operations the presentation layer consumes: browse
// (filter/sort), recommend, annotation read/write, theme listing, and
// aggregate statistics. All state is explicit and constructed once; the
// book collection never mutates after initialization.
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use crate::annotations::AnnotationStore;
use crate::filtering;
use crate::loader;
use crate::query;
use crate::recommendation::{self, MAX_RECOMMENDATIONS};
use crate::theme_index::ThemeIndex;
use crate::types::{
	Annotation, AnnotationPatch, Book, CatalogQuery, CatalogStats, Recommendation,
	ThemeSection,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub struct EngineConfig {
	/// Catalog document to read at initialization. `None` starts empty
	/// (use [`CatalogEngine::with_books`] to inject a pre-parsed catalog).
	pub catalog_path: Option<PathBuf>,
	/// Directory holding the annotation slot. `None` keeps annotations in
	/// memory only.
	pub storage_dir: Option<PathBuf>,
	pub max_recommendations: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			catalog_path: None,
			storage_dir: None,
			max_recommendations: MAX_RECOMMENDATIONS,
		}
	}
}

/// What initialization found. The presentation layer uses this to tell an
/// empty catalog apart from a failed load when choosing its empty/error
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
	pub books_loaded: usize,
	pub books_skipped: usize,
	/// The catalog document was unreachable or unparsable; the engine is
	/// running on an empty collection.
	pub catalog_failed: bool,
	/// The annotation slot was corrupt and was reset to an empty map.
	pub annotations_reset: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct CatalogEngine {
	books: Vec<Book>,
	theme_index: ThemeIndex,
	annotations: AnnotationStore,
	config: EngineConfig,
}

impl CatalogEngine {
	// -- Lifecycle -----------------------------------------------------------

	/// Create an engine with an empty catalog. Call
	/// [`initialize`](Self::initialize) to load the catalog document and the
	/// stored annotations.
	pub fn new(config: EngineConfig) -> Self {
		let annotations = AnnotationStore::new(config.storage_dir.clone());
		Self {
			books: Vec::new(),
			theme_index: ThemeIndex::default(),
			annotations,
			config,
		}
	}

	/// Create an engine over an already-parsed catalog and load stored
	/// annotations. For consumers that fetch the catalog document
	/// themselves.
	pub fn with_books(books: Vec<Book>, config: EngineConfig) -> Self {
		let mut engine = Self::new(config);
		engine.theme_index = ThemeIndex::from_books(&books);
		engine.books = books;
		engine.annotations.load();
		engine
	}

	/// Load the catalog document and the annotation slot.
	///
	/// Nothing here is fatal: an unreachable or unparsable catalog leaves
	/// the collection empty, a corrupt annotation slot resets to an empty
	/// map, and both outcomes are visible in the returned report.
	pub fn initialize(&mut self) -> LoadReport {
		let mut report = LoadReport::default();

		if let Some(path) = self.config.catalog_path.clone() {
			match loader::load_catalog(&path) {
				Ok(loaded) => {
					report.books_loaded = loaded.books.len();
					report.books_skipped = loaded.skipped;
					self.theme_index = ThemeIndex::from_books(&loaded.books);
					self.books = loaded.books;
				}
				Err(e) => {
					tracing::warn!(
						code = e.code(),
						"Catalog load failed, running on an empty collection: {}",
						e
					);
					report.catalog_failed = true;
					self.books = Vec::new();
					self.theme_index = ThemeIndex::default();
				}
			}
		}

		report.annotations_reset = !self.annotations.load();
		report
	}

	// -- Browsing ------------------------------------------------------------

	/// Filter and sort the catalog. Pure with respect to engine state.
	pub fn filter_and_sort(&self, query: &CatalogQuery) -> Vec<Book> {
		filtering::filter_and_sort(&self.books, self.annotations.all(), query)
	}

	/// Parse a query string (see [`query::parse_query`]) and browse with it.
	pub fn browse(&self, input: &str) -> Vec<Book> {
		self.filter_and_sort(&query::parse_query(input))
	}

	/// Unread books thematically close to the reader's highly-rated ones,
	/// best match first.
	pub fn recommend(&self) -> Vec<Recommendation> {
		recommendation::recommend(
			&self.books,
			self.annotations.all(),
			self.config.max_recommendations,
		)
	}

	// -- Annotations ---------------------------------------------------------

	pub fn annotation(&self, book_id: u64) -> Annotation {
		self.annotations.get(book_id)
	}

	pub fn annotate(&mut self, book_id: u64, patch: AnnotationPatch) -> Annotation {
		self.annotations.set(book_id, patch)
	}

	/// Rate a book (1–5 stars), marking it read.
	pub fn rate(&mut self, book_id: u64, rating: u8) -> Annotation {
		self.annotations.rate(book_id, rating)
	}

	pub fn clear_rating(&mut self, book_id: u64) -> Annotation {
		self.annotations.clear_rating(book_id)
	}

	pub fn toggle_read(&mut self, book_id: u64) -> bool {
		self.annotations.toggle_read(book_id)
	}

	pub fn annotations(&self) -> &AnnotationStore {
		&self.annotations
	}

	// -- Catalog accessors ---------------------------------------------------

	pub fn books(&self) -> &[Book] {
		&self.books
	}

	pub fn book(&self, book_id: u64) -> Option<&Book> {
		self.books.iter().find(|b| b.id == book_id)
	}

	pub fn len(&self) -> usize {
		self.books.len()
	}

	pub fn is_empty(&self) -> bool {
		self.books.is_empty()
	}

	/// Distinct catalog themes, sorted.
	pub fn themes(&self) -> Vec<String> {
		self.theme_index.themes()
	}

	/// Distinct themes with per-theme book counts, sorted.
	pub fn theme_sections(&self) -> Vec<ThemeSection> {
		self.theme_index.sections()
	}

	/// Aggregate reading statistics. Orphaned annotations (ids not in the
	/// catalog) are ignored.
	pub fn stats(&self) -> CatalogStats {
		let mut read_books = 0;
		let mut rated_books = 0;
		let mut rating_sum: u32 = 0;

		for book in &self.books {
			let annotation = self.annotations.get(book.id);
			if annotation.is_read {
				read_books += 1;
			}
			if annotation.rating > 0 {
				rated_books += 1;
				rating_sum += annotation.rating as u32;
			}
		}

		let average_rating = if rated_books > 0 {
			rating_sum as f64 / rated_books as f64
		} else {
			0.0
		};

		CatalogStats {
			total_books: self.books.len(),
			read_books,
			rated_books,
			average_rating,
		}
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
