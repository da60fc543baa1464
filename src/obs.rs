//! Optional observability helpers for request handling.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `keystone_client.request` with the `method` and `stage`
//!   fields, plus curl-style request/response traces.
//! - Enable `metrics` to increment the `keystone_client_request_total` counter, labeled by
//!   `method` + `outcome`.
//!
//! # Debug Toggle
//!
//! Setting [`DEBUG_ENV`] to a non-empty value promotes request/response traces to `INFO`
//! so they reach a default subscriber. Without it they are emitted at `DEBUG`, and only
//! rendered when that level is enabled.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Environment variable that enables verbose request/response tracing.
pub const DEBUG_ENV: &str = "KEYSTONECLIENT_DEBUG";

/// Whether [`DEBUG_ENV`] is set to a non-empty value.
pub fn debug_enabled() -> bool {
	std::env::var_os(DEBUG_ENV).is_some_and(|value| !value.is_empty())
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to an authenticated request.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Credentials were refreshed after a 401 and the request retried.
	Reauthenticated,
	/// A redirect response was followed.
	Redirected,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
			RequestOutcome::Reauthenticated => "reauthenticated",
			RequestOutcome::Redirected => "redirected",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
