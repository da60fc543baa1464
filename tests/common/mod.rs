//! Shared stubs for integration tests: a scripted transport that records every request
//! and an authenticator that counts invocations.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use serde_json::Value;
// self
use keystone_client::{
	auth::{AuthFuture, Authenticator},
	client::{ClientConfig, ClientSession, IdentityClient},
	error::{Result, TransportError},
	http::{
		HeaderMap, HttpRequest, HttpResponse, HttpTransport, Method, StatusCode, TransportFuture,
	},
	request::{RawClient, ResponseBody},
};

pub const MANAGEMENT_URL: &str = "https://compute.example.com/v2/demo";

/// Request captured by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: Method,
	pub uri: String,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}
impl RecordedRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	pub fn json(&self) -> Value {
		serde_json::from_slice(&self.body).expect("Recorded body should be JSON.")
	}
}

/// Scripted reply served by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub enum Reply {
	/// Fixed status, headers, and body.
	Fixed { status: u16, headers: Vec<(&'static str, String)>, body: Vec<u8> },
	/// Status 200 echoing the request body and content type.
	Echo,
}
impl Reply {
	pub fn status(status: u16) -> Self {
		Self::Fixed { status, headers: Vec::new(), body: Vec::new() }
	}

	pub fn json(status: u16, body: Value) -> Self {
		Self::Fixed {
			status,
			headers: vec![("content-type", "application/json".into())],
			body: serde_json::to_vec(&body).expect("Fixture body should serialize."),
		}
	}

	pub fn text(status: u16, body: &str) -> Self {
		Self::Fixed { status, headers: Vec::new(), body: body.as_bytes().to_vec() }
	}

	pub fn redirect(status: u16, location: &str) -> Self {
		Self::Fixed { status, headers: vec![("location", location.into())], body: Vec::new() }
	}
}

/// Transport that replays scripted replies in order and records every request.
///
/// Once the script runs dry the last reply repeats.
#[derive(Default)]
pub struct RecordingTransport {
	replies: Mutex<VecDeque<Reply>>,
	last: Mutex<Option<Reply>>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl RecordingTransport {
	pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
		Arc::new(Self { replies: Mutex::new(replies.into_iter().collect()), ..Self::default() })
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}

	fn next_reply(&self) -> Reply {
		let mut last = self.last.lock();

		if let Some(reply) = self.replies.lock().pop_front() {
			*last = Some(reply);
		}

		last.clone().expect("RecordingTransport needs at least one scripted reply.")
	}
}
impl HttpTransport for RecordingTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let recorded = RecordedRequest {
			method: request.method().clone(),
			uri: request.uri().to_string(),
			headers: request.headers().clone(),
			body: request.body().clone(),
		};
		let reply = self.next_reply();

		self.requests.lock().push(recorded.clone());

		Box::pin(async move {
			let response = match reply {
				Reply::Fixed { status, headers, body } => {
					let mut response = HttpResponse::new(body);

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Fixture status should be valid.");

					for (name, value) in headers {
						response
							.headers_mut()
							.insert(name, value.parse().expect("Fixture header should be valid."));
					}

					response
				},
				Reply::Echo => HttpResponse::new(recorded.body),
			};

			Ok::<_, TransportError>(response)
		})
	}
}

/// Authenticator that counts invocations and issues numbered tokens.
pub struct CountingAuthenticator {
	calls: AtomicUsize,
	management_url: Option<String>,
}
impl CountingAuthenticator {
	pub fn new(management_url: Option<&str>) -> Arc<Self> {
		Arc::new(Self {
			calls: AtomicUsize::new(0),
			management_url: management_url.map(Into::into),
		})
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl Authenticator for CountingAuthenticator {
	fn authenticate<'a>(
		&'a self,
		session: &'a mut ClientSession,
		_http: &'a RawClient,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

			if let Some(url) = &self.management_url {
				session.set_credentials(url.clone(), format!("token-{call}"));
			}

			Ok(())
		})
	}

	fn extract_service_catalog(
		&self,
		_session: &mut ClientSession,
		_url: &str,
		_body: Option<&ResponseBody>,
	) -> Result<()> {
		Ok(())
	}
}

/// Builds a client over `transport` with the counting authenticator.
pub fn client_with(
	config: keystone_client::client::ClientConfigBuilder,
	authenticator: Arc<CountingAuthenticator>,
	transport: Arc<RecordingTransport>,
) -> IdentityClient {
	let config: ClientConfig = config
		.shared_authenticator(authenticator)
		.build()
		.expect("Test configuration should be valid.");

	IdentityClient::with_transport(config, transport)
}
