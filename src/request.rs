//! Request options, decoded responses, and the unauthenticated request primitive.

pub mod body;
pub mod fresh;
pub mod raw;

pub use body::*;
pub use fresh::*;
pub use raw::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ConfigError};

/// Caller-supplied request options: extra headers and an optional JSON body.
///
/// Options are never mutated by the request layer. Redirects and re-authentication
/// retries rebuild the wire request from the same options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
	/// Additional headers sent with the request.
	pub headers: HeaderMap,
	/// JSON body, serialized when the request is dispatched.
	pub body: Option<JsonValue>,
}
impl RequestOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) a header.
	pub fn with_header(
		mut self,
		name: impl AsRef<str>,
		value: impl AsRef<str>,
	) -> Result<Self, ConfigError> {
		let name_ref = name.as_ref();
		let invalid = || ConfigError::InvalidHeader { name: name_ref.to_owned() };
		let header_name = HeaderName::from_bytes(name_ref.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value.as_ref()).map_err(|_| invalid())?;

		self.headers.insert(header_name, header_value);

		Ok(self)
	}

	/// Sets the JSON body from any serializable value.
	pub fn with_json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body).map_err(ConfigError::RequestBody)?);

		Ok(self)
	}

	/// Sets an already-built JSON body.
	pub fn with_body(mut self, body: JsonValue) -> Self {
		self.body = Some(body);

		self
	}
}

/// Response returned by successful (non-error, non-redirect) calls.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Decoded JSON body, raw text when decoding failed, or `None` when empty.
	pub body: Option<ResponseBody>,
}
impl ApiResponse {
	/// Decodes the JSON body into `T`, reporting the failing path on mismatch.
	///
	/// An empty body decodes as JSON `null`, which suits `Option<_>` and `()` targets.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let value = match &self.body {
			Some(ResponseBody::Json(value)) => value.clone(),
			Some(ResponseBody::Text(text)) => JsonValue::String(text.clone()),
			None => JsonValue::Null,
		};

		serde_path_to_error::deserialize(value)
			.map_err(|source| Error::Decode { status: self.status.as_u16(), source })
	}
}
