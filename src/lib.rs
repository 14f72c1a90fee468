// ---------------------------------------------------------------------------
// shelfmark — book catalog engine
// ---------------------------------------------------------------------------
//
// The logic core of a catalog browser: an immutable book collection loaded
// once at startup, per-reader annotations (rating, read flag) persisted
// write-through to a single local slot, a deterministic filter/sort
// pipeline, and theme-overlap recommendations seeded by highly-rated books.
//
// Presentation is someone else's job: the crate exposes plain query and
// command functions on [`CatalogEngine`] and [`AnnotationStore`], free of
// any UI or event model. Logging goes through the `tracing` facade; the
// consumer installs a subscriber if it wants the output.
// ---------------------------------------------------------------------------

pub mod annotations;
pub mod catalog;
pub mod error;
pub mod filtering;
pub mod loader;
pub mod persistence;
pub mod query;
pub mod recommendation;
pub mod theme_index;
pub mod types;

pub use annotations::AnnotationStore;
pub use catalog::{CatalogEngine, EngineConfig, LoadReport};
pub use error::CatalogError;
pub use query::parse_query;
pub use recommendation::{LIKED_RATING_THRESHOLD, MAX_RECOMMENDATIONS};
pub use types::{
	Annotation, AnnotationPatch, Book, CatalogQuery, CatalogStats, Recommendation, SortKey,
	StatusFilter, ThemeFilter, ThemeSection, MAX_RATING,
};
