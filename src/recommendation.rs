// ---------------------------------------------------------------------------
// Recommendation scoring — theme overlap with highly-rated books
// ---------------------------------------------------------------------------
//
// Pure functions, no side effects. Books rated 4 or 5 seed a theme-weight
// map (each distinct theme accumulates the book's rating); unread books are
// scored by summing the weights of their overlapping themes. Candidates with
// no overlap are dropped, the rest are sorted by score descending with ties
// keeping catalog order, and the list is cut to a fixed size.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::types::{Annotation, Book, Recommendation};

/// Minimum rating for a book to seed the theme weights.
pub const LIKED_RATING_THRESHOLD: u8 = 4;

/// Default number of recommendations returned.
pub const MAX_RECOMMENDATIONS: usize = 6;

// ---------------------------------------------------------------------------
// Theme weights
// ---------------------------------------------------------------------------

/// Accumulate theme weights from liked books (rating >= 4, read or not).
///
/// Every distinct theme of a liked book gains that book's rating, so a
/// 5-star book outweighs a 4-star one and themes shared across liked books
/// accumulate. Empty when nothing is liked.
pub fn build_theme_weights(
	books: &[Book],
	annotations: &HashMap<u64, Annotation>,
) -> HashMap<String, u32> {
	let mut weights: HashMap<String, u32> = HashMap::new();

	for book in books {
		let rating = annotations
			.get(&book.id)
			.map(|a| a.rating)
			.unwrap_or(0);
		if rating < LIKED_RATING_THRESHOLD {
			continue;
		}

		let mut seen: HashSet<&str> = HashSet::new();
		for theme in &book.themes {
			if seen.insert(theme.as_str()) {
				*weights.entry(theme.clone()).or_insert(0) += rating as u32;
			}
		}
	}

	weights
}

// ---------------------------------------------------------------------------
// Candidate scoring
// ---------------------------------------------------------------------------

/// Score one candidate against the theme weights.
///
/// Returns `None` when nothing overlaps (score 0). Duplicate themes within
/// the candidate count once; `matching_themes` keeps the book's own order.
pub fn score_candidate(book: &Book, weights: &HashMap<String, u32>) -> Option<Recommendation> {
	let mut score: u32 = 0;
	let mut matching_themes: Vec<String> = Vec::new();
	let mut distinct = 0usize;
	let mut seen: HashSet<&str> = HashSet::new();

	for theme in &book.themes {
		if !seen.insert(theme.as_str()) {
			continue;
		}
		distinct += 1;
		if let Some(weight) = weights.get(theme) {
			score += weight;
			matching_themes.push(theme.clone());
		}
	}

	if score == 0 {
		return None;
	}

	// Themes are required non-empty, so `distinct` is at least 1 here.
	let percentage = (100.0 * matching_themes.len() as f64 / distinct as f64).round();
	let match_percentage = (percentage as u32).min(100) as u8;

	Some(Recommendation {
		book: book.clone(),
		score,
		matching_themes,
		match_percentage,
	})
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Produce up to `max_results` recommendations: unread books with thematic
/// overlap with liked books, best score first, ties in catalog order.
pub fn recommend(
	books: &[Book],
	annotations: &HashMap<u64, Annotation>,
	max_results: usize,
) -> Vec<Recommendation> {
	let weights = build_theme_weights(books, annotations);
	if weights.is_empty() {
		return Vec::new();
	}

	let mut results: Vec<Recommendation> = books
		.iter()
		.filter(|book| {
			!annotations
				.get(&book.id)
				.map(|a| a.is_read)
				.unwrap_or(false)
		})
		.filter_map(|book| score_candidate(book, &weights))
		.collect();

	// Stable sort over catalog-ordered candidates: equal scores keep
	// catalog order.
	results.sort_by(|a, b| b.score.cmp(&a.score));
	results.truncate(max_results);

	results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
