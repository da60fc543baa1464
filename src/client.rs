//! Authenticated client: header injection, lazy authentication, and one re-auth retry.

pub mod config;
pub mod session;

pub use config::*;
pub use session::*;

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use crate::{
	_prelude::*,
	auth::Authenticator,
	http::HttpTransport,
	obs::{self, RequestOutcome, RequestSpan},
	request::{self, ApiResponse, RawClient, RequestOptions, ResponseBody},
};

/// Issues authenticated REST calls against the session's management URL.
///
/// Every verb checks for a management URL first and authenticates when it is missing.
/// A `401` response triggers exactly one re-authentication followed by one retry of
/// the same request; the retry budget resets at the start of each call. Methods take
/// `&mut self` because authentication rewrites the session in place.
pub struct IdentityClient {
	session: ClientSession,
	http: RawClient,
	authenticator: Arc<dyn Authenticator>,
}
impl IdentityClient {
	/// Creates a client backed by the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
		let session = config.session();
		let http = RawClient::new(transport).with_max_redirects(config.max_redirects);

		Self { session, http, authenticator: config.authenticator }
	}

	/// Current session state.
	pub fn session(&self) -> &ClientSession {
		&self.session
	}

	/// Mutable session state, e.g. to seed a cached token.
	pub fn session_mut(&mut self) -> &mut ClientSession {
		&mut self.session
	}

	/// Unauthenticated request layer shared with the authenticator.
	pub fn http(&self) -> &RawClient {
		&self.http
	}

	/// Runs the configured authenticator and checks that it produced a management URL.
	pub async fn authenticate(&mut self) -> Result<()> {
		self.authenticator.authenticate(&mut self.session, &self.http).await?;

		if self.session.management_url.is_none() {
			return Err(Error::MissingManagementUrl);
		}

		Ok(())
	}

	/// Lets the configured authenticator parse a service catalog into the session.
	pub fn extract_service_catalog(
		&mut self,
		url: &str,
		body: Option<&ResponseBody>,
	) -> Result<()> {
		self.authenticator.extract_service_catalog(&mut self.session, url, body)
	}

	/// Sends a GET with a cache-busting `fresh` parameter appended to `path`.
	pub async fn get(&mut self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
		let path = request::append_fresh_param(path);

		self.send_request(&path, Method::GET, options).await
	}

	/// Sends a POST.
	pub async fn post(&mut self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
		self.send_request(path, Method::POST, options).await
	}

	/// Sends a PUT.
	pub async fn put(&mut self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
		self.send_request(path, Method::PUT, options).await
	}

	/// Sends a DELETE.
	pub async fn delete(&mut self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
		self.send_request(path, Method::DELETE, options).await
	}

	/// Sends `method` to `management_url + path` with auth headers attached.
	pub async fn send_request(
		&mut self,
		path: &str,
		method: Method,
		options: RequestOptions,
	) -> Result<ApiResponse> {
		let span = RequestSpan::new(&method, "send_request");

		obs::record_request_outcome(&method, RequestOutcome::Attempt);

		let result = span.instrument(self.dispatch(path, &method, &options)).await;
		let outcome =
			if result.is_ok() { RequestOutcome::Success } else { RequestOutcome::Failure };

		obs::record_request_outcome(&method, outcome);

		result
	}

	/// Sends a request through the unauthenticated layer; `url` must be absolute.
	pub async fn raw_request(
		&self,
		url: &str,
		method: Method,
		options: &RequestOptions,
	) -> Result<ApiResponse> {
		self.http.raw_request(url, method, options).await
	}

	async fn dispatch(
		&mut self,
		path: &str,
		method: &Method,
		options: &RequestOptions,
	) -> Result<ApiResponse> {
		if self.session.management_url.is_none() {
			self.authenticate().await?;
		}

		self.session.reset_auth_failures();

		loop {
			let (url, decorated) = self.decorate(path, options)?;

			match self.http.raw_request(&url, method.clone(), &decorated).await {
				Err(e) if e.is_unauthorized() && self.session.try_consume_reauth() => {
					#[cfg(feature = "tracing")]
					tracing::warn!(
						%method,
						path,
						"Token rejected; re-authenticating and retrying once."
					);

					obs::record_request_outcome(method, RequestOutcome::Reauthenticated);

					self.authenticate().await?;
				},
				result => return result,
			}
		}
	}

	/// Resolves the absolute URL and merges the session's auth headers into the options.
	fn decorate(&self, path: &str, options: &RequestOptions) -> Result<(String, RequestOptions)> {
		let base = self.session.management_url.as_deref().ok_or(Error::MissingManagementUrl)?;
		let mut decorated = options.clone();

		for (name, value) in self.session.auth_headers()? {
			if let Some(name) = name {
				decorated.headers.insert(name, value);
			}
		}

		Ok((format!("{base}{path}"), decorated))
	}
}
#[cfg(feature = "reqwest")]
impl IdentityClient {
	/// Creates a client backed by reqwest, applying the configured timeout to every call.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::new(config.timeout)?;

		Ok(Self::with_transport(config, Arc::new(transport)))
	}
}
impl Debug for IdentityClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentityClient")
			.field("session", &self.session)
			.field("http", &self.http)
			.field("version", &self.authenticator.version())
			.finish()
	}
}
