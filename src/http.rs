//! Transport primitives for identity-service calls.
//!
//! The module exposes [`HttpTransport`], the client's only dependency on an HTTP
//! stack. Requests and responses travel as [`HttpRequest`]/[`HttpResponse`] values
//! (`http` crate types with byte bodies) so custom transports and test stubs never
//! depend on reqwest.

pub use oauth2::{
	HttpRequest, HttpResponse,
	http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header, uri},
};

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::TransportError};

/// Future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> = BoxFuture<'a, Result<HttpResponse, TransportError>>;

/// Abstraction over HTTP stacks capable of executing a single request.
///
/// Implementations must not follow redirects themselves: the request layer inspects
/// `301`/`302`/`305` responses and reissues the original request so redirect limits and
/// tracing stay consistent. Any per-request timeout belongs to the transport.
pub trait HttpTransport
where
	Self: Send + Sync,
{
	/// Sends `request` and resolves to the complete response, body included.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client disables redirect following. Configure any custom
/// [`ReqwestClient`] passed to [`ReqwestTransport::with_client`] the same way, otherwise
/// reqwest resolves redirects before the request layer can apply its limit.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport that applies `timeout` uniformly to every call.
	pub fn new(timeout: Option<StdDuration>) -> Result<Self> {
		let mut builder = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none());

		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}

		let client = builder.build().map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = self.0.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok::<_, TransportError>(response_new)
		})
	}
}
