// ---------------------------------------------------------------------------
// AnnotationStore — per-reader annotation state with write-through storage
// ---------------------------------------------------------------------------
//
// Wraps the in-memory annotation map and the single persistent slot. Reads
// never fail; every mutation merges into the map and immediately rewrites
// the whole slot. Storage failures are logged and swallowed so no error
// reaches the caller from any operation — a store without a storage
// directory simply runs in memory.
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::path::PathBuf;

use crate::persistence;
use crate::types::{Annotation, AnnotationPatch, MAX_RATING};

pub struct AnnotationStore {
	annotations: HashMap<u64, Annotation>,
	storage_dir: Option<PathBuf>,
}

impl AnnotationStore {
	/// Create an empty store. Call [`load`](Self::load) to hydrate it from
	/// the slot.
	pub fn new(storage_dir: Option<PathBuf>) -> Self {
		Self {
			annotations: HashMap::new(),
			storage_dir,
		}
	}

	/// Hydrate from the persistent slot. Any failure — missing directory,
	/// unreadable file, corrupt document, wrong version — resets to an
	/// empty map and logs; it never propagates.
	pub fn load(&mut self) -> bool {
		let Some(dir) = &self.storage_dir else {
			return true;
		};
		match persistence::load_annotations(dir) {
			Ok(loaded) => {
				if loaded.skipped > 0 {
					tracing::warn!(
						skipped = loaded.skipped,
						"Dropped undecodable annotation entries"
					);
				}
				self.annotations = loaded.annotations;
				true
			}
			Err(e) => {
				tracing::warn!(code = e.code(), "Annotation slot unreadable, starting empty: {}", e);
				self.annotations = HashMap::new();
				false
			}
		}
	}

	/// The stored annotation, or the default (unrated, unread). Never fails;
	/// ids unknown to the catalog simply return the default.
	pub fn get(&self, book_id: u64) -> Annotation {
		self.annotations.get(&book_id).copied().unwrap_or_default()
	}

	/// Merge a partial update into the book's annotation and persist the
	/// whole map. The in-memory state updates even if persisting fails.
	pub fn set(&mut self, book_id: u64, patch: AnnotationPatch) -> Annotation {
		let merged = self.get(book_id).merged(patch);
		self.annotations.insert(book_id, merged);
		self.persist();
		merged
	}

	/// Rate a book, marking it read: assigning stars implies the book has
	/// been read. Ratings above [`MAX_RATING`] are clamped.
	pub fn rate(&mut self, book_id: u64, rating: u8) -> Annotation {
		self.set(
			book_id,
			AnnotationPatch {
				rating: Some(rating.min(MAX_RATING)),
				is_read: Some(true),
			},
		)
	}

	/// Reset a book's rating to 0, leaving the read flag alone.
	pub fn clear_rating(&mut self, book_id: u64) -> Annotation {
		self.set(
			book_id,
			AnnotationPatch {
				rating: Some(0),
				is_read: None,
			},
		)
	}

	/// Flip the read flag; returns the new value.
	pub fn toggle_read(&mut self, book_id: u64) -> bool {
		let flipped = !self.get(book_id).is_read;
		self.set(
			book_id,
			AnnotationPatch {
				rating: None,
				is_read: Some(flipped),
			},
		);
		flipped
	}

	/// The full map, for the pure filter/recommendation functions.
	pub fn all(&self) -> &HashMap<u64, Annotation> {
		&self.annotations
	}

	pub fn len(&self) -> usize {
		self.annotations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.annotations.is_empty()
	}

	fn persist(&self) {
		let Some(dir) = &self.storage_dir else {
			return;
		};
		if let Err(e) = persistence::save_annotations(dir, &self.annotations) {
			tracing::warn!(code = e.code(), "Failed to persist annotations: {}", e);
		}
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
