// self
use crate::{_prelude::*, http::header};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Header whose value never appears in traces.
const REDACTED_HEADER: &str = "x-auth-token";

/// A span builder used by the request layers.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the HTTP method + stage.
	pub fn new(method: &Method, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("keystone_client.request", method = method.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Traces an outgoing request as a curl command line plus its body.
pub fn log_request(request: &HttpRequest) {
	#[cfg(feature = "tracing")]
	{
		if !trace_enabled() {
			return;
		}

		emit(&format!("REQ: {}", render_curl(request)));

		if !request.body().is_empty() {
			emit(&format!("REQ BODY: {}", String::from_utf8_lossy(request.body())));
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = request;
	}
}

/// Traces a response status, headers, and body.
pub fn log_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) {
	#[cfg(feature = "tracing")]
	{
		if !trace_enabled() {
			return;
		}

		emit(&format!(
			"RESP: {status} {}\nRESP BODY: {}",
			render_headers(headers),
			String::from_utf8_lossy(body)
		));
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, headers, body);
	}
}

/// Renders `curl -i <url> -X <METHOD> -H "name: value" ...` with secrets redacted.
pub fn render_curl(request: &HttpRequest) -> String {
	let mut line = format!("curl -i {} -X {}", request.uri(), request.method());

	for (name, value) in request.headers() {
		line.push_str(&format!(" -H \"{name}: {}\"", display_value(name, value)));
	}

	line
}

#[cfg(feature = "tracing")]
fn render_headers(headers: &HeaderMap) -> String {
	let pairs = headers
		.iter()
		.map(|(name, value)| format!("{name}: {}", display_value(name, value)))
		.collect::<Vec<_>>();

	format!("{{{}}}", pairs.join(", "))
}

fn display_value(name: &HeaderName, value: &HeaderValue) -> String {
	if name.as_str() == REDACTED_HEADER || *name == header::AUTHORIZATION {
		"<redacted>".into()
	} else {
		String::from_utf8_lossy(value.as_bytes()).into_owned()
	}
}

#[cfg(feature = "tracing")]
fn trace_enabled() -> bool {
	crate::obs::debug_enabled() || tracing::enabled!(tracing::Level::DEBUG)
}

/// Level used for request/response traces: `INFO` while the debug toggle is set.
#[cfg(feature = "tracing")]
pub(crate) fn trace_level() -> tracing::Level {
	if crate::obs::debug_enabled() {
		tracing::Level::INFO
	} else {
		tracing::Level::DEBUG
	}
}

#[cfg(feature = "tracing")]
fn emit(message: &str) {
	if trace_level() == tracing::Level::INFO {
		tracing::info!(target: "keystone_client::http", "{message}");
	} else {
		tracing::debug!(target: "keystone_client::http", "{message}");
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn render_curl_lists_method_url_and_redacted_headers() {
		let mut request = HttpRequest::new(Vec::new());

		*request.method_mut() = Method::DELETE;
		*request.uri_mut() = "https://identity.example.com/v2.0/users/7"
			.parse()
			.expect("Fixture URI should parse.");
		request.headers_mut().insert("x-auth-token", HeaderValue::from_static("super-secret"));
		request.headers_mut().insert("x-auth-project-id", HeaderValue::from_static("demo"));

		let line = render_curl(&request);

		assert!(line.starts_with("curl -i https://identity.example.com/v2.0/users/7 -X DELETE"));
		assert!(line.contains("-H \"x-auth-token: <redacted>\""));
		assert!(line.contains("-H \"x-auth-project-id: demo\""));
		assert!(!line.contains("super-secret"));
	}

	#[test]
	fn request_span_noop_without_subscriber() {
		let span = RequestSpan::new(&Method::GET, "test");
		let _ = span.clone();
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new(&Method::POST, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
