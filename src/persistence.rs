// ---------------------------------------------------------------------------
// Annotation persistence — single-slot gzipped JSON storage
// ---------------------------------------------------------------------------
//
// The whole annotation map lives in one file, overwritten wholesale on every
// mutation. On-disk format (v1): gzipped JSON
//
//   { "version": 1, "annotations": { "<book id>": { "rating": n, "isRead": b } } }
//
// Loading accepts `annotations.gz` (gzipped, preferred) or a plain-JSON
// `annotations.json`, detected by the gzip magic bytes. Individual entries
// that fail to decode are skipped and counted rather than failing the load.
// Writes go through a temp file in the target directory and a rename, so a
// reader never observes a partial map.
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::types::Annotation;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SLOT_FILE: &str = "annotations.gz";
pub const SLOT_FILE_PLAIN: &str = "annotations.json";

const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Gzip helpers
// ---------------------------------------------------------------------------

/// Gzip-compress a byte slice (level 6).
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CatalogError> {
	let mut encoder = GzEncoder::new(data, Compression::new(6));
	let mut compressed = Vec::new();
	encoder
		.read_to_end(&mut compressed)
		.map_err(CatalogError::Io)?;
	Ok(compressed)
}

/// Gunzip-decompress a byte slice.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CatalogError> {
	let mut decoder = GzDecoder::new(data);
	let mut decompressed = Vec::new();
	decoder
		.read_to_end(&mut decompressed)
		.map_err(|e| CatalogError::Corruption(format!("Invalid gzip data: {}", e)))?;
	Ok(decompressed)
}

/// Check for the gzip magic bytes (0x1f, 0x8b).
pub fn is_gzipped(data: &[u8]) -> bool {
	data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

// ---------------------------------------------------------------------------
// On-disk envelope
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotFile<'a> {
	version: u32,
	annotations: &'a HashMap<u64, Annotation>,
}

/// Read-side envelope: entry values stay raw so one bad entry cannot fail
/// the whole document.
#[derive(Deserialize)]
struct SlotFileRaw {
	version: u32,
	annotations: HashMap<String, serde_json::Value>,
}

/// Result of loading the annotation slot.
#[derive(Debug)]
pub struct LoadedAnnotations {
	pub annotations: HashMap<u64, Annotation>,
	/// Entries dropped because their key or value did not decode.
	pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

/// Write the full annotation map to `<dir>/annotations.gz`, atomically.
pub fn save_annotations(
	dir: &Path,
	annotations: &HashMap<u64, Annotation>,
) -> Result<(), CatalogError> {
	std::fs::create_dir_all(dir).map_err(CatalogError::Io)?;

	let envelope = SlotFile {
		version: FORMAT_VERSION,
		annotations,
	};
	let json = serde_json::to_string(&envelope)
		.map_err(|e| CatalogError::Serialization(format!("Failed to serialize slot: {}", e)))?;
	let compressed = compress(json.as_bytes())?;

	// Temp file in the same directory so the rename never crosses a
	// filesystem boundary.
	let tmp = tempfile::NamedTempFile::new_in(dir).map_err(CatalogError::Io)?;
	std::fs::write(tmp.path(), &compressed).map_err(CatalogError::Io)?;
	tmp.persist(dir.join(SLOT_FILE))
		.map_err(|e| CatalogError::Io(e.error))?;

	Ok(())
}

/// Load the annotation map from `<dir>/annotations.gz` (or a plain-JSON
/// `annotations.json`). A missing slot is an empty map, not an error.
pub fn load_annotations(dir: &Path) -> Result<LoadedAnnotations, CatalogError> {
	let gz_path = dir.join(SLOT_FILE);
	let plain_path = dir.join(SLOT_FILE_PLAIN);

	let raw_bytes = if gz_path.exists() {
		std::fs::read(&gz_path).map_err(CatalogError::Io)?
	} else if plain_path.exists() {
		std::fs::read(&plain_path).map_err(CatalogError::Io)?
	} else {
		return Ok(LoadedAnnotations {
			annotations: HashMap::new(),
			skipped: 0,
		});
	};

	let json_bytes = if is_gzipped(&raw_bytes) {
		decompress(&raw_bytes)?
	} else {
		raw_bytes
	};

	let json_str = std::str::from_utf8(&json_bytes)
		.map_err(|e| CatalogError::Corruption(format!("Invalid UTF-8 in slot: {}", e)))?;

	let envelope: SlotFileRaw = serde_json::from_str(json_str)
		.map_err(|e| CatalogError::Corruption(format!("Invalid slot JSON: {}", e)))?;

	if envelope.version != FORMAT_VERSION {
		return Err(CatalogError::Corruption(format!(
			"Unsupported slot version: {}",
			envelope.version
		)));
	}

	let mut annotations: HashMap<u64, Annotation> = HashMap::new();
	let mut skipped = 0;

	for (key, value) in envelope.annotations {
		let id: u64 = match key.parse() {
			Ok(id) => id,
			Err(_) => {
				skipped += 1;
				continue;
			}
		};
		match serde_json::from_value::<Annotation>(value) {
			Ok(annotation) => {
				annotations.insert(id, annotation.clamped());
			}
			Err(_) => {
				skipped += 1;
			}
		}
	}

	Ok(LoadedAnnotations {
		annotations,
		skipped,
	})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn annotation(rating: u8, is_read: bool) -> Annotation {
		Annotation { rating, is_read }
	}

	#[test]
	fn compress_decompress_roundtrip() {
		let original = br#"{"version":1,"annotations":{}}"#;
		let compressed = compress(original).unwrap();
		assert_ne!(compressed, original.as_slice());
		assert!(is_gzipped(&compressed));
		let decompressed = decompress(&compressed).unwrap();
		assert_eq!(decompressed, original.as_slice());
	}

	#[test]
	fn is_gzipped_detection() {
		assert!(!is_gzipped(b"plain json"));
		assert!(!is_gzipped(b""));
		assert!(!is_gzipped(&[0x1f]));
		assert!(!is_gzipped(&[0x00, 0x8b]));
	}

	#[test]
	fn save_load_roundtrip() {
		let dir = tempfile::tempdir().unwrap();
		let mut map = HashMap::new();
		map.insert(1, annotation(5, true));
		map.insert(7, annotation(0, false));
		map.insert(42, annotation(3, true));

		save_annotations(dir.path(), &map).unwrap();
		assert!(dir.path().join(SLOT_FILE).exists());

		let loaded = load_annotations(dir.path()).unwrap();
		assert_eq!(loaded.skipped, 0);
		assert_eq!(loaded.annotations, map);
	}

	#[test]
	fn save_creates_directory() {
		let parent = tempfile::tempdir().unwrap();
		let nested = parent.path().join("a").join("b");
		let mut map = HashMap::new();
		map.insert(1, annotation(4, true));

		save_annotations(&nested, &map).unwrap();
		assert!(nested.join(SLOT_FILE).exists());
	}

	#[test]
	fn save_overwrites_previous_slot() {
		let dir = tempfile::tempdir().unwrap();
		let mut map = HashMap::new();
		map.insert(1, annotation(2, false));
		save_annotations(dir.path(), &map).unwrap();

		map.insert(1, annotation(5, true));
		map.insert(2, annotation(4, true));
		save_annotations(dir.path(), &map).unwrap();

		let loaded = load_annotations(dir.path()).unwrap();
		assert_eq!(loaded.annotations, map);
	}

	#[test]
	fn load_missing_slot_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let loaded = load_annotations(dir.path()).unwrap();
		assert!(loaded.annotations.is_empty());
		assert_eq!(loaded.skipped, 0);
	}

	#[test]
	fn load_accepts_plain_json() {
		let dir = tempfile::tempdir().unwrap();
		let json = r#"{"version":1,"annotations":{"3":{"rating":4,"isRead":true}}}"#;
		std::fs::write(dir.path().join(SLOT_FILE_PLAIN), json).unwrap();

		let loaded = load_annotations(dir.path()).unwrap();
		assert_eq!(loaded.annotations.get(&3), Some(&annotation(4, true)));
	}

	#[test]
	fn load_corrupt_document_errors() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join(SLOT_FILE_PLAIN), "{{{ not json").unwrap();
		let result = load_annotations(dir.path());
		assert!(matches!(result, Err(CatalogError::Corruption(_))));
	}

	#[test]
	fn load_truncated_gzip_errors() {
		let dir = tempfile::tempdir().unwrap();
		let mut bytes = compress(br#"{"version":1,"annotations":{}}"#).unwrap();
		bytes.truncate(bytes.len() / 2);
		std::fs::write(dir.path().join(SLOT_FILE), &bytes).unwrap();
		let result = load_annotations(dir.path());
		assert!(matches!(result, Err(CatalogError::Corruption(_))));
	}

	#[test]
	fn load_wrong_version_errors() {
		let dir = tempfile::tempdir().unwrap();
		let json = r#"{"version":9,"annotations":{}}"#;
		std::fs::write(dir.path().join(SLOT_FILE_PLAIN), json).unwrap();
		let result = load_annotations(dir.path());
		assert!(matches!(result, Err(CatalogError::Corruption(_))));
	}

	#[test]
	fn load_skips_bad_entries() {
		let dir = tempfile::tempdir().unwrap();
		let json = r#"{"version":1,"annotations":{
			"1": {"rating": 5, "isRead": true},
			"not-a-number": {"rating": 1, "isRead": false},
			"2": "garbage"
		}}"#;
		std::fs::write(dir.path().join(SLOT_FILE_PLAIN), json).unwrap();

		let loaded = load_annotations(dir.path()).unwrap();
		assert_eq!(loaded.annotations.len(), 1);
		assert_eq!(loaded.annotations.get(&1), Some(&annotation(5, true)));
		assert_eq!(loaded.skipped, 2);
	}

	#[test]
	fn load_clamps_out_of_range_rating() {
		let dir = tempfile::tempdir().unwrap();
		let json = r#"{"version":1,"annotations":{"1":{"rating":9,"isRead":false}}}"#;
		std::fs::write(dir.path().join(SLOT_FILE_PLAIN), json).unwrap();

		let loaded = load_annotations(dir.path()).unwrap();
		assert_eq!(loaded.annotations.get(&1).unwrap().rating, 5);
	}

	#[test]
	fn gz_slot_preferred_over_plain() {
		let dir = tempfile::tempdir().unwrap();
		let mut map = HashMap::new();
		map.insert(1, annotation(5, true));
		save_annotations(dir.path(), &map).unwrap();

		let stale = r#"{"version":1,"annotations":{"1":{"rating":1,"isRead":false}}}"#;
		std::fs::write(dir.path().join(SLOT_FILE_PLAIN), stale).unwrap();

		let loaded = load_annotations(dir.path()).unwrap();
		assert_eq!(loaded.annotations.get(&1), Some(&annotation(5, true)));
	}
}
