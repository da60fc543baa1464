//! Mutable session state shared between the client and its authenticator.

// self
use crate::{
	_prelude::*,
	auth::{DEFAULT_API_VERSION, Secret},
	client::ClientConfig,
	error::ConfigError,
};

/// Header carrying the issued auth token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";
/// Header carrying the project (tenant) identifier.
pub const PROJECT_ID_HEADER: &str = "x-auth-project-id";

/// Credentials, endpoints, and retry bookkeeping for one client instance.
///
/// Before the first authentication `auth_token` holds the configured token or, when
/// none was given, the password as a placeholder. The placeholder is never sent as
/// `X-Auth-Token`.
#[derive(Clone, Debug)]
pub struct ClientSession {
	/// Username presented to the auth endpoint.
	pub username: Option<String>,
	/// Password presented to the auth endpoint.
	pub password: Option<Secret>,
	/// Project (tenant) identifier sent as `X-Auth-Project-Id`.
	pub project_id: Option<String>,
	/// Issued token, or the password placeholder before authentication.
	pub auth_token: Option<Secret>,
	/// Base URL of the auth endpoint.
	pub auth_url: Option<Url>,
	/// Base URL for authenticated calls; unset until authentication succeeds.
	pub management_url: Option<String>,
	/// Preferred service-catalog region.
	pub region_name: Option<String>,
	/// Identity API version tag.
	pub version: String,
	auth_failures: u32,
}
impl ClientSession {
	/// Re-authentication attempts allowed per request chain.
	pub const MAX_REAUTH_ATTEMPTS: u32 = 1;

	/// Stores the management URL and token produced by an authenticator.
	pub fn set_credentials(&mut self, management_url: impl Into<String>, token: impl Into<Secret>) {
		self.management_url = Some(management_url.into());
		self.auth_token = Some(token.into());
	}

	/// Re-authentication attempts consumed by the current request chain.
	pub fn auth_failures(&self) -> u32 {
		self.auth_failures
	}

	/// Returns the token to send, skipping empty values and the password placeholder.
	pub fn effective_token(&self) -> Option<&Secret> {
		Secret::non_empty(self.auth_token.as_ref())
			.filter(|token| self.password.as_ref() != Some(*token))
	}

	/// Builds the `X-Auth-Token` and `X-Auth-Project-Id` headers for the current state.
	pub fn auth_headers(&self) -> Result<HeaderMap, ConfigError> {
		let mut headers = HeaderMap::new();

		if let Some(token) = self.effective_token() {
			headers.insert(AUTH_TOKEN_HEADER, header_value(AUTH_TOKEN_HEADER, token.expose())?);
		}
		if let Some(project_id) = self.project_id.as_deref().filter(|id| !id.is_empty()) {
			headers.insert(PROJECT_ID_HEADER, header_value(PROJECT_ID_HEADER, project_id)?);
		}

		Ok(headers)
	}

	pub(crate) fn reset_auth_failures(&mut self) {
		self.auth_failures = 0;
	}

	/// Consumes one re-authentication attempt; returns `false` once the budget is spent.
	pub(crate) fn try_consume_reauth(&mut self) -> bool {
		if self.auth_failures >= Self::MAX_REAUTH_ATTEMPTS {
			return false;
		}

		self.auth_failures += 1;

		true
	}
}
impl Default for ClientSession {
	fn default() -> Self {
		Self {
			username: None,
			password: None,
			project_id: None,
			auth_token: None,
			auth_url: None,
			management_url: None,
			region_name: None,
			version: DEFAULT_API_VERSION.into(),
			auth_failures: 0,
		}
	}
}

impl From<&ClientConfig> for ClientSession {
	fn from(config: &ClientConfig) -> Self {
		Self {
			username: config.username.clone(),
			password: config.password.clone(),
			project_id: config.project_id.clone(),
			auth_token: Secret::non_empty(config.token.as_ref())
				.or(config.password.as_ref())
				.cloned(),
			auth_url: config.auth_url.clone(),
			management_url: config.endpoint.clone(),
			region_name: config.region_name.clone(),
			version: config.authenticator.version().to_owned(),
			auth_failures: 0,
		}
	}
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
	let mut value = HeaderValue::from_str(value)
		.map_err(|_| ConfigError::InvalidHeader { name: name.to_owned() })?;

	if name == AUTH_TOKEN_HEADER {
		value.set_sensitive(true);
	}

	Ok(value)
}
