use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Storage corruption: {0}")]
	Corruption(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Catalog parse error: {0}")]
	Parse(String),
}

impl CatalogError {
	pub fn code(&self) -> &str {
		match self {
			Self::Io(_) => "SHELF_IO",
			Self::Corruption(_) => "SHELF_CORRUPT",
			Self::Serialization(_) => "SHELF_SERIALIZATION",
			Self::Parse(_) => "SHELF_PARSE",
		}
	}
}
