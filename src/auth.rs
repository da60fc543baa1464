//! Authentication strategy hooks and secret handling.
//!
//! Credential acquisition and service-catalog parsing differ between identity API
//! versions, so the client delegates both to an [`Authenticator`] selected when the
//! client is configured.

pub mod secret;

pub use secret::*;

// self
use crate::{
	_prelude::*,
	client::ClientSession,
	request::{RawClient, ResponseBody},
};

/// API version tag reported when an authenticator does not override it.
pub const DEFAULT_API_VERSION: &str = "v2.0";

/// Future returned by [`Authenticator::authenticate`].
pub type AuthFuture<'a> = BoxFuture<'a, Result<()>>;

/// Version-specific authentication strategy.
///
/// Implementors receive the session by mutable reference and must leave it with a
/// management URL and an auth token, or return an error. They may call the auth
/// endpoint through the provided [`RawClient`], which applies the same user agent,
/// JSON encoding, status mapping, and redirect handling as authenticated calls.
pub trait Authenticator
where
	Self: Send + Sync,
{
	/// Identity API version implemented by this strategy.
	fn version(&self) -> &str {
		DEFAULT_API_VERSION
	}

	/// Acquires credentials and populates `session.management_url` and `session.auth_token`.
	fn authenticate<'a>(
		&'a self,
		session: &'a mut ClientSession,
		http: &'a RawClient,
	) -> AuthFuture<'a>;

	/// Parses the service catalog returned by the auth endpoint at `url` into `session`.
	fn extract_service_catalog(
		&self,
		session: &mut ClientSession,
		url: &str,
		body: Option<&ResponseBody>,
	) -> Result<()>;
}

/// Strategy used when no API version was selected; every hook fails with
/// [`Error::NotImplemented`].
///
/// Clients built with this strategy still work when both a management endpoint and a
/// token are configured up front, as long as the service never answers 401.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnversionedAuthenticator;
impl Display for UnversionedAuthenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("unversioned-authenticator")
	}
}
impl Authenticator for UnversionedAuthenticator {
	fn authenticate<'a>(
		&'a self,
		_session: &'a mut ClientSession,
		_http: &'a RawClient,
	) -> AuthFuture<'a> {
		Box::pin(async { Err(Error::NotImplemented { capability: "authenticate" }) })
	}

	fn extract_service_catalog(
		&self,
		_session: &mut ClientSession,
		_url: &str,
		_body: Option<&ResponseBody>,
	) -> Result<()> {
		Err(Error::NotImplemented { capability: "extract_service_catalog" })
	}
}
