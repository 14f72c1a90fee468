// ---------------------------------------------------------------------------
// Filter & sort pipeline
// ---------------------------------------------------------------------------
//
// Pure functions over (books, annotations, query). Steps run in a fixed
// order: text filter, status filter, theme filter, then a stable sort by the
// chosen key. Ties always keep original catalog order, which makes equal
// sort keys and the "no sort key" case deterministic.
// ---------------------------------------------------------------------------

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::types::{Annotation, Book, CatalogQuery, SortKey, StatusFilter, ThemeFilter};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on title or author. The needle must
/// already be lowercased; an empty needle matches everything.
fn matches_text(book: &Book, needle: &str) -> bool {
	if needle.is_empty() {
		return true;
	}
	book.title.to_lowercase().contains(needle) || book.author.to_lowercase().contains(needle)
}

fn matches_status(annotation: Annotation, status: StatusFilter) -> bool {
	match status {
		StatusFilter::All => true,
		StatusFilter::Read => annotation.is_read,
		StatusFilter::Unread => !annotation.is_read,
		StatusFilter::Rated => annotation.rating > 0,
	}
}

fn matches_theme(book: &Book, theme: &ThemeFilter) -> bool {
	match theme {
		ThemeFilter::All => true,
		ThemeFilter::Theme(name) => book.themes.iter().any(|t| t == name),
	}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Apply the full filter/sort pipeline and return the surviving books.
///
/// Books without a stored annotation are judged against the default
/// annotation (unrated, unread).
pub fn filter_and_sort(
	books: &[Book],
	annotations: &HashMap<u64, Annotation>,
	query: &CatalogQuery,
) -> Vec<Book> {
	let needle = query.search_text.to_lowercase();
	let annotation_of = |id: u64| annotations.get(&id).copied().unwrap_or_default();

	let mut result: Vec<Book> = books
		.iter()
		.filter(|book| matches_text(book, &needle))
		.filter(|book| matches_status(annotation_of(book.id), query.status))
		.filter(|book| matches_theme(book, &query.theme))
		.cloned()
		.collect();

	// All sorts are stable, so equal keys keep catalog order.
	match query.sort {
		Some(SortKey::Title) => result.sort_by_cached_key(|b| b.title.to_lowercase()),
		Some(SortKey::Author) => result.sort_by_cached_key(|b| b.author.to_lowercase()),
		Some(SortKey::YearAsc) => result.sort_by_key(|b| b.year),
		Some(SortKey::YearDesc) => result.sort_by_key(|b| Reverse(b.year)),
		Some(SortKey::Rating) => {
			result.sort_by_cached_key(|b| Reverse(annotation_of(b.id).rating))
		}
		None => {}
	}

	result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
