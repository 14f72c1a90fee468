use serde::{Deserialize, Serialize};

/// Highest rating a reader can assign. Ratings above this are clamped.
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
	pub id: u64,
	pub title: String,
	pub author: String,
	pub year: i32,
	/// Ordered theme tags. Required non-empty; may contain duplicates,
	/// which are treated as a set wherever themes are scored.
	pub themes: Vec<String>,
}

/// Per-reader, per-book state. The default (`rating: 0`, `is_read: false`)
/// stands in for any book without a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotation {
	pub rating: u8,
	#[serde(rename = "isRead")]
	pub is_read: bool,
}

impl Annotation {
	/// Apply a partial update, clamping the rating into [0, MAX_RATING].
	pub fn merged(self, patch: AnnotationPatch) -> Annotation {
		Annotation {
			rating: patch.rating.unwrap_or(self.rating).min(MAX_RATING),
			is_read: patch.is_read.unwrap_or(self.is_read),
		}
	}

	/// Clamp the rating into [0, MAX_RATING]. Used when hydrating stored
	/// entries that may predate the clamp.
	pub fn clamped(self) -> Annotation {
		Annotation {
			rating: self.rating.min(MAX_RATING),
			is_read: self.is_read,
		}
	}
}

/// Partial annotation update: `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnnotationPatch {
	pub rating: Option<u8>,
	#[serde(rename = "isRead")]
	pub is_read: Option<bool>,
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
	#[default]
	All,
	Read,
	Unread,
	Rated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThemeFilter {
	#[default]
	All,
	Theme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
	Title,
	Author,
	YearAsc,
	YearDesc,
	Rating,
}

/// A browse query as the presentation layer supplies it.
///
/// `sort: None` leaves the catalog order untouched; unknown sort or filter
/// values parse to the identity behavior rather than erroring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
	pub search_text: String,
	pub status: StatusFilter,
	pub theme: ThemeFilter,
	pub sort: Option<SortKey>,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A scored recommendation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub book: Book,
	/// Sum of liked-theme weights over the book's matching themes.
	pub score: u32,
	/// The book's themes found in the weight map, in the book's own order.
	#[serde(rename = "matchingThemes")]
	pub matching_themes: Vec<String>,
	/// min(100, round(100 * matching / distinct themes)).
	#[serde(rename = "matchPercentage")]
	pub match_percentage: u8,
}

/// Aggregate reading statistics over the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
	#[serde(rename = "totalBooks")]
	pub total_books: usize,
	#[serde(rename = "readBooks")]
	pub read_books: usize,
	#[serde(rename = "ratedBooks")]
	pub rated_books: usize,
	/// Mean rating over rated books; 0.0 when nothing is rated.
	#[serde(rename = "averageRating")]
	pub average_rating: f64,
}

/// One theme with the number of catalog books carrying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSection {
	pub theme: String,
	#[serde(rename = "bookCount")]
	pub book_count: usize,
}
