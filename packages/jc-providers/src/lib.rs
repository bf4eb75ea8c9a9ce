pub mod embedding;
pub mod indeed;
pub mod link;
pub mod linkedin;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header {key:?} must be a string."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Reads a JSON field as text, accepting numbers for id-like fields.
pub(crate) fn json_text(value: &Value, key: &str) -> Option<String> {
	match value.get(key)? {
		Value::String(text) => {
			let trimmed = text.trim();

			(!trimmed.is_empty()).then(|| trimmed.to_string())
		},
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}
