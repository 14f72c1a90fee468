// ---------------------------------------------------------------------------
// Theme index — distinct themes with per-theme book membership
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashSet};

use crate::types::{Book, ThemeSection};

/// Maps each theme to the set of book ids carrying it. Built once from the
/// immutable catalog; the `BTreeMap` keeps the theme listing sorted, which is
/// the order the presentation layer's filter dropdown wants.
#[derive(Debug, Default)]
pub struct ThemeIndex {
	theme_to_books: BTreeMap<String, HashSet<u64>>,
}

impl ThemeIndex {
	pub fn from_books(books: &[Book]) -> Self {
		let mut theme_to_books: BTreeMap<String, HashSet<u64>> = BTreeMap::new();
		for book in books {
			for theme in &book.themes {
				theme_to_books
					.entry(theme.clone())
					.or_default()
					.insert(book.id);
			}
		}
		Self { theme_to_books }
	}

	/// All distinct themes, sorted.
	pub fn themes(&self) -> Vec<String> {
		self.theme_to_books.keys().cloned().collect()
	}

	/// All themes with their book counts, sorted by theme.
	pub fn sections(&self) -> Vec<ThemeSection> {
		self.theme_to_books
			.iter()
			.map(|(theme, ids)| ThemeSection {
				theme: theme.clone(),
				book_count: ids.len(),
			})
			.collect()
	}

	/// Ids of the books carrying a theme. Empty for unknown themes.
	pub fn books_for(&self, theme: &str) -> Vec<u64> {
		let mut ids: Vec<u64> = self
			.theme_to_books
			.get(theme)
			.map(|s| s.iter().copied().collect())
			.unwrap_or_default();
		ids.sort_unstable();
		ids
	}

	pub fn contains(&self, theme: &str) -> bool {
		self.theme_to_books.contains_key(theme)
	}

	pub fn len(&self) -> usize {
		self.theme_to_books.len()
	}

	pub fn is_empty(&self) -> bool {
		self.theme_to_books.is_empty()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn book(id: u64, themes: &[&str]) -> Book {
		Book {
			id,
			title: format!("Book {}", id),
			author: "Author".to_string(),
			year: 2000,
			themes: themes.iter().map(|t| t.to_string()).collect(),
		}
	}

	#[test]
	fn themes_sorted_distinct() {
		let books = vec![
			book(1, &["war", "magic"]),
			book(2, &["magic", "dragons"]),
		];
		let index = ThemeIndex::from_books(&books);
		assert_eq!(index.themes(), vec!["dragons", "magic", "war"]);
	}

	#[test]
	fn duplicate_theme_in_one_book_counted_once() {
		let books = vec![book(1, &["magic", "magic"])];
		let index = ThemeIndex::from_books(&books);
		let sections = index.sections();
		assert_eq!(sections.len(), 1);
		assert_eq!(sections[0].theme, "magic");
		assert_eq!(sections[0].book_count, 1);
	}

	#[test]
	fn sections_count_books_per_theme() {
		let books = vec![
			book(1, &["war", "magic"]),
			book(2, &["magic"]),
			book(3, &["magic"]),
		];
		let index = ThemeIndex::from_books(&books);
		let sections = index.sections();
		let magic = sections.iter().find(|s| s.theme == "magic").unwrap();
		assert_eq!(magic.book_count, 3);
		let war = sections.iter().find(|s| s.theme == "war").unwrap();
		assert_eq!(war.book_count, 1);
	}

	#[test]
	fn books_for_returns_sorted_ids() {
		let books = vec![
			book(3, &["magic"]),
			book(1, &["magic"]),
			book(2, &["war"]),
		];
		let index = ThemeIndex::from_books(&books);
		assert_eq!(index.books_for("magic"), vec![1, 3]);
		assert_eq!(index.books_for("war"), vec![2]);
	}

	#[test]
	fn books_for_unknown_theme_empty() {
		let index = ThemeIndex::from_books(&[book(1, &["magic"])]);
		assert!(index.books_for("space opera").is_empty());
		assert!(!index.contains("space opera"));
	}

	#[test]
	fn empty_catalog_empty_index() {
		let index = ThemeIndex::from_books(&[]);
		assert!(index.is_empty());
		assert_eq!(index.len(), 0);
		assert!(index.themes().is_empty());
	}
}
