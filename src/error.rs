//! Client-level error types shared by the transport, request, and session layers.

// self
use crate::{_prelude::*, request::ResponseBody};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The identity service answered with one of the mapped error statuses.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Redirect chain exceeded the configured limit.
	#[error("Redirect limit of {limit} exceeded while following `{location}`.")]
	TooManyRedirects {
		/// Configured maximum number of redirects.
		limit: usize,
		/// Location that would have been followed next.
		location: String,
	},
	/// Redirect status without a usable `Location` header.
	#[error("HTTP {status} redirect is missing a usable Location header.")]
	MissingLocation {
		/// Redirect status code.
		status: u16,
	},
	/// The selected authenticator does not implement the capability.
	#[error("{capability} is not implemented; select a versioned authenticator.")]
	NotImplemented {
		/// Capability label (`authenticate`, `extract_service_catalog`).
		capability: &'static str,
	},
	/// Authentication returned without establishing a management URL.
	#[error("Authentication completed without setting a management URL.")]
	MissingManagementUrl,
	/// Response body could not be decoded into the requested type.
	#[error("Response body for HTTP {status} could not be decoded.")]
	Decode {
		/// HTTP status of the decoded response.
		status: u16,
		/// Structured decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the [`ApiErrorKind`] when the error came from a mapped HTTP status.
	pub fn api_kind(&self) -> Option<ApiErrorKind> {
		match self {
			Self::Api(e) => Some(e.kind),
			_ => None,
		}
	}

	/// Whether the identity service rejected the credentials (HTTP 401).
	pub fn is_unauthorized(&self) -> bool {
		self.api_kind() == Some(ApiErrorKind::Unauthorized)
	}
}

/// HTTP-level error categories raised by the identity service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
	/// HTTP 400.
	BadRequest,
	/// HTTP 401.
	Unauthorized,
	/// HTTP 403.
	Forbidden,
	/// HTTP 404.
	NotFound,
	/// HTTP 408.
	RequestTimeout,
	/// HTTP 409.
	Conflict,
	/// HTTP 413.
	OverLimit,
	/// HTTP 500.
	InternalServerError,
	/// HTTP 501.
	NotImplemented,
}
impl ApiErrorKind {
	/// Every mapped kind, in status order.
	pub const ALL: [Self; 9] = [
		Self::BadRequest,
		Self::Unauthorized,
		Self::Forbidden,
		Self::NotFound,
		Self::RequestTimeout,
		Self::Conflict,
		Self::OverLimit,
		Self::InternalServerError,
		Self::NotImplemented,
	];

	/// Maps a status code to its kind; unmapped codes return `None`.
	pub const fn from_status(status: u16) -> Option<Self> {
		match status {
			400 => Some(Self::BadRequest),
			401 => Some(Self::Unauthorized),
			403 => Some(Self::Forbidden),
			404 => Some(Self::NotFound),
			408 => Some(Self::RequestTimeout),
			409 => Some(Self::Conflict),
			413 => Some(Self::OverLimit),
			500 => Some(Self::InternalServerError),
			501 => Some(Self::NotImplemented),
			_ => None,
		}
	}

	/// Status code that produces this kind.
	pub const fn status(self) -> u16 {
		match self {
			Self::BadRequest => 400,
			Self::Unauthorized => 401,
			Self::Forbidden => 403,
			Self::NotFound => 404,
			Self::RequestTimeout => 408,
			Self::Conflict => 409,
			Self::OverLimit => 413,
			Self::InternalServerError => 500,
			Self::NotImplemented => 501,
		}
	}

	/// Message used when the response body carries none.
	pub const fn default_message(self) -> &'static str {
		match self {
			Self::BadRequest => "Bad request",
			Self::Unauthorized => "Unauthorized",
			Self::Forbidden => "Forbidden",
			Self::NotFound => "Not found",
			Self::RequestTimeout => "Request timeout",
			Self::Conflict => "Conflict",
			Self::OverLimit => "Over limit",
			Self::InternalServerError => "Internal server error",
			Self::NotImplemented => "Not implemented",
		}
	}
}
impl Display for ApiErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.default_message())
	}
}

/// Error raised for a mapped HTTP status, carrying the decoded response body.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{message} (HTTP {status})")]
pub struct ApiError {
	/// Error category.
	pub kind: ApiErrorKind,
	/// HTTP status code.
	pub status: u16,
	/// Service-supplied message or the kind's default.
	pub message: String,
	/// Optional service-supplied details.
	pub details: Option<String>,
	/// Decoded (or raw) response body.
	pub body: Option<ResponseBody>,
}
impl ApiError {
	/// Builds an error for `status` if it belongs to the mapped set.
	///
	/// Identity services wrap failures in a single-key envelope such as
	/// `{"itemNotFound": {"message": "...", "details": "..."}}`; both fields are
	/// lifted from the first value when present.
	pub fn from_response(status: StatusCode, body: Option<ResponseBody>) -> Option<Self> {
		let kind = ApiErrorKind::from_status(status.as_u16())?;
		let envelope = body.as_ref().and_then(ResponseBody::as_json).and_then(|value| match value {
			JsonValue::Object(map) => map.values().next(),
			_ => None,
		});
		let field = |name: &str| {
			envelope.and_then(|inner| inner.get(name)).and_then(|value| match value {
				JsonValue::String(text) => Some(text.to_owned()),
				JsonValue::Null => None,
				other => Some(other.to_string()),
			})
		};
		let message = field("message").unwrap_or_else(|| kind.default_message().to_owned());
		let details = field("details");

		Some(Self { kind, status: status.as_u16(), message, details, body })
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Header name or value is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	RequestBody(#[source] serde_json::Error),
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Which setting failed validation.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect limit must allow at least one hop.
	#[error("The redirect limit must be at least 1.")]
	ZeroRedirectLimit,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_round_trip_through_status_codes() {
		for kind in ApiErrorKind::ALL {
			assert_eq!(ApiErrorKind::from_status(kind.status()), Some(kind));
		}

		for unmapped in [200, 302, 402, 405, 429, 502, 503] {
			assert_eq!(ApiErrorKind::from_status(unmapped), None, "{unmapped} must pass through.");
		}
	}

	#[test]
	fn from_response_lifts_envelope_fields() {
		let body = ResponseBody::Json(serde_json::json!({
			"itemNotFound": { "message": "Tenant missing", "details": "tenant-7", "code": 404 }
		}));
		let err = ApiError::from_response(StatusCode::NOT_FOUND, Some(body.clone()))
			.expect("404 must map to an API error.");

		assert_eq!(err.kind, ApiErrorKind::NotFound);
		assert_eq!(err.status, 404);
		assert_eq!(err.message, "Tenant missing");
		assert_eq!(err.details.as_deref(), Some("tenant-7"));
		assert_eq!(err.body, Some(body));
		assert_eq!(err.to_string(), "Tenant missing (HTTP 404)");
	}

	#[test]
	fn from_response_falls_back_to_default_message() {
		let err = ApiError::from_response(
			StatusCode::CONFLICT,
			Some(ResponseBody::Text("<html>busy</html>".into())),
		)
		.expect("409 must map to an API error.");

		assert_eq!(err.message, "Conflict");
		assert_eq!(err.details, None);
		assert!(ApiError::from_response(StatusCode::SERVICE_UNAVAILABLE, None).is_none());
	}

	#[test]
	fn unauthorized_helper_only_matches_401() {
		let unauthorized: Error =
			ApiError::from_response(StatusCode::UNAUTHORIZED, None).expect("401 maps.").into();
		let forbidden: Error =
			ApiError::from_response(StatusCode::FORBIDDEN, None).expect("403 maps.").into();

		assert!(unauthorized.is_unauthorized());
		assert!(!forbidden.is_unauthorized());
		assert!(!Error::MissingManagementUrl.is_unauthorized());
	}
}
