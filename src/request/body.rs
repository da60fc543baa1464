//! Response body decoding that never fails.

// self
use crate::_prelude::*;

/// Decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
	/// Body parsed as JSON.
	Json(JsonValue),
	/// Body kept verbatim because it was not valid JSON.
	Text(String),
}
impl ResponseBody {
	/// Decodes a raw body: empty bytes yield `None`, invalid JSON yields [`Self::Text`].
	pub fn decode(raw: &[u8]) -> Option<Self> {
		if raw.is_empty() {
			#[cfg(feature = "tracing")]
			tracing::debug!("No body was returned.");

			return None;
		}

		match serde_json::from_slice(raw) {
			Ok(value) => Some(Self::Json(value)),
			Err(_e) => {
				let text = String::from_utf8_lossy(raw).into_owned();

				#[cfg(feature = "tracing")]
				tracing::debug!(error = %_e, body = %text, "Could not decode JSON from body.");

				Some(Self::Text(text))
			},
		}
	}

	/// Returns the JSON value, if the body decoded.
	pub fn as_json(&self) -> Option<&JsonValue> {
		match self {
			Self::Json(value) => Some(value),
			Self::Text(_) => None,
		}
	}

	/// Returns the raw text, if decoding failed.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Json(_) => None,
			Self::Text(text) => Some(text),
		}
	}
}
