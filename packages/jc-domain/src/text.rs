/// Terms this short only match whole words; "ai" must not hit "trainee" or "retail".
pub const SHORT_TERM_CHARS: usize = 2;

/// Lower-cased whitespace tokens of a query, in input order.
pub fn query_tokens(query: &str) -> Vec<String> {
	query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Checks whether `term` occurs in the already lower-cased `haystack`.
///
/// Longer terms use substring semantics, so "developer" matches "developers" and
/// "schwester" matches "krankenschwester". Terms of at most [`SHORT_TERM_CHARS`] characters
/// must appear as a whole alphanumeric word.
pub fn contains_term(haystack: &str, term: &str) -> bool {
	if term.is_empty() {
		return false;
	}
	if term.chars().count() > SHORT_TERM_CHARS {
		return haystack.contains(term);
	}

	haystack.split(|ch: char| !ch.is_alphanumeric()).any(|word| word == term)
}

pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
	terms.iter().any(|term| contains_term(haystack, term))
}

/// Prefix of `text` holding at most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}
