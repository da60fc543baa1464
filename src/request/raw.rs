//! Unauthenticated request primitive: JSON encoding, status mapping, redirects.

// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError},
	http::{HttpTransport, header, uri::Uri},
	obs::{self, RequestOutcome, RequestSpan},
	request::{ApiResponse, RequestOptions, ResponseBody},
};

/// Fixed `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Statuses that cause the original request to be reissued against `Location`.
const REDIRECT_STATUSES: [u16; 3] = [301, 302, 305];

/// Sends requests without touching session state.
///
/// The authenticated client layers token handling on top of this type, and
/// authenticators use it directly to reach the auth endpoint.
#[derive(Clone)]
pub struct RawClient {
	transport: Arc<dyn HttpTransport>,
	max_redirects: usize,
}
impl RawClient {
	/// Default cap on consecutive redirects.
	pub const DEFAULT_MAX_REDIRECTS: usize = 5;

	/// Wraps `transport` with the default redirect limit.
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self { transport, max_redirects: Self::DEFAULT_MAX_REDIRECTS }
	}

	/// Overrides the redirect limit.
	pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;

		self
	}

	/// Configured redirect limit.
	pub fn max_redirects(&self) -> usize {
		self.max_redirects
	}

	/// Sends `method url` with `options`, mapping error statuses and following redirects.
	///
	/// Redirects reissue the original method and options against the `Location`
	/// value (resolved against the current URL when relative). Statuses outside the
	/// mapped error set and the redirect set are returned as ordinary responses.
	pub async fn raw_request(
		&self,
		url: &str,
		method: Method,
		options: &RequestOptions,
	) -> Result<ApiResponse> {
		let span = RequestSpan::new(&method, "raw_request");

		span.instrument(self.follow(url, method, options)).await
	}

	async fn follow(
		&self,
		url: &str,
		method: Method,
		options: &RequestOptions,
	) -> Result<ApiResponse> {
		let mut current = url.to_owned();
		let mut redirects = 0;

		loop {
			let response = self.send_once(&current, &method, options).await?;
			let status = response.status.as_u16();

			if !REDIRECT_STATUSES.contains(&status) {
				return Ok(response);
			}

			let location = redirect_target(&current, &response.headers)
				.ok_or(Error::MissingLocation { status })?;

			if redirects >= self.max_redirects {
				return Err(Error::TooManyRedirects { limit: self.max_redirects, location });
			}

			obs::record_request_outcome(&method, RequestOutcome::Redirected);

			redirects += 1;
			current = location;
		}
	}

	async fn send_once(
		&self,
		url: &str,
		method: &Method,
		options: &RequestOptions,
	) -> Result<ApiResponse> {
		let request = build_request(url, method, options)?;

		obs::log_request(&request);

		let response = self.transport.execute(request).await?;
		let (parts, raw_body) = response.into_parts();

		obs::log_response(parts.status, &parts.headers, &raw_body);

		let body = ResponseBody::decode(&raw_body);

		if let Some(err) = ApiError::from_response(parts.status, body.clone()) {
			return Err(err.into());
		}

		Ok(ApiResponse { status: parts.status, headers: parts.headers, body })
	}
}
impl Debug for RawClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RawClient").field("max_redirects", &self.max_redirects).finish()
	}
}

/// Builds the wire request: caller headers, fixed user agent, and the JSON body.
fn build_request(url: &str, method: &Method, options: &RequestOptions) -> Result<HttpRequest> {
	let mut headers = options.headers.clone();

	headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

	let body = match &options.body {
		Some(value) => {
			headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

			serde_json::to_vec(value).map_err(ConfigError::RequestBody)?
		},
		None => Vec::new(),
	};
	let mut request = HttpRequest::new(body);

	*request.method_mut() = method.clone();
	*request.uri_mut() =
		url.parse::<Uri>().map_err(|e| ConfigError::HttpRequest(e.into()))?;
	*request.headers_mut() = headers;

	Ok(request)
}

/// Resolves the `Location` header against the URL that produced the redirect.
fn redirect_target(current: &str, headers: &HeaderMap) -> Option<String> {
	let location = headers.get(header::LOCATION)?.to_str().ok()?.trim();

	if location.is_empty() {
		return None;
	}

	match Url::parse(current).and_then(|base| base.join(location)) {
		Ok(resolved) => Some(resolved.into()),
		Err(_) => Some(location.to_owned()),
	}
}
