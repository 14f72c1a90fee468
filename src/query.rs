// ---------------------------------------------------------------------------
// Query parsing — turn a browse query string into a CatalogQuery
// ---------------------------------------------------------------------------
//
// Supports:
//   status:read|unread|rated|all   — read-status filter
//   theme:name                     — theme filter ("all" bypasses;
//                                    quotes allow multi-word themes)
//   sort:title|author|year-asc|year-desc|rating
//   plain text                     — title/author search
//
// Unknown parameter values never error: status and theme fall through to
// "all", sort falls through to no reordering.
// ---------------------------------------------------------------------------

use crate::types::{CatalogQuery, SortKey, StatusFilter, ThemeFilter};

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split input on whitespace while keeping quoted regions inside a single
/// token, so `theme:"dark fantasy"` survives as one token. Unterminated
/// quotes consume the rest of the string.
fn tokenize(input: &str) -> Vec<String> {
	let chars: Vec<char> = input.chars().collect();
	let len = chars.len();
	let mut tokens = Vec::new();
	let mut i = 0;

	while i < len {
		// Skip whitespace
		while i < len && chars[i].is_whitespace() {
			i += 1;
		}
		if i >= len {
			break;
		}

		let start = i;
		while i < len && !chars[i].is_whitespace() {
			if chars[i] == '"' {
				// Enter quoted region: run to the closing quote (or the end)
				i += 1;
				while i < len && chars[i] != '"' {
					i += 1;
				}
				if i < len {
					i += 1; // consume closing quote
				}
			} else {
				i += 1;
			}
		}
		tokens.push(chars[start..i].iter().collect());
	}

	tokens
}

/// Strip one pair of surrounding quotes, if present.
fn unquote(value: &str) -> &str {
	let v = value.strip_prefix('"').unwrap_or(value);
	v.strip_suffix('"').unwrap_or(v)
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a status filter value. Unknown values fall through to `All`.
pub fn parse_status(value: &str) -> StatusFilter {
	match value {
		"read" => StatusFilter::Read,
		"unread" => StatusFilter::Unread,
		"rated" => StatusFilter::Rated,
		_ => StatusFilter::All,
	}
}

/// Parse a theme filter value. `"all"` (and empty) bypasses.
pub fn parse_theme(value: &str) -> ThemeFilter {
	let value = unquote(value);
	if value.is_empty() || value == "all" {
		ThemeFilter::All
	} else {
		ThemeFilter::Theme(value.to_string())
	}
}

/// Parse a sort key. Unknown values mean "leave catalog order untouched".
pub fn parse_sort(value: &str) -> Option<SortKey> {
	match value {
		"title" => Some(SortKey::Title),
		"author" => Some(SortKey::Author),
		"year-asc" => Some(SortKey::YearAsc),
		"year-desc" => Some(SortKey::YearDesc),
		"rating" => Some(SortKey::Rating),
		_ => None,
	}
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a query string into a [`CatalogQuery`].
///
/// Later occurrences of the same field win; everything that is not a
/// recognized `field:` token joins the search text.
pub fn parse_query(input: &str) -> CatalogQuery {
	let mut query = CatalogQuery::default();
	let mut search_parts: Vec<String> = Vec::new();

	for token in tokenize(input) {
		if let Some(value) = token.strip_prefix("status:") {
			query.status = parse_status(value);
		} else if let Some(value) = token.strip_prefix("theme:") {
			query.theme = parse_theme(value);
		} else if let Some(value) = token.strip_prefix("sort:") {
			query.sort = parse_sort(value);
		} else {
			search_parts.push(unquote(&token).to_string());
		}
	}

	query.search_text = search_parts.join(" ");
	query
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
