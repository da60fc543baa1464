//! Code-first client configuration with a validating builder.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{Authenticator, Secret, UnversionedAuthenticator},
	client::ClientSession,
	error::ConfigError,
	request::RawClient,
};

/// Validated settings consumed by [`IdentityClient`](crate::client::IdentityClient).
#[derive(Clone)]
pub struct ClientConfig {
	/// Username presented to the auth endpoint.
	pub username: Option<String>,
	/// Password presented to the auth endpoint.
	pub password: Option<Secret>,
	/// Pre-issued token.
	pub token: Option<Secret>,
	/// Project (tenant) identifier.
	pub project_id: Option<String>,
	/// Base URL of the auth endpoint.
	pub auth_url: Option<Url>,
	/// Preferred service-catalog region.
	pub region_name: Option<String>,
	/// Timeout applied to every transport call.
	pub timeout: Option<StdDuration>,
	/// Pre-known management endpoint; skips the initial authentication.
	pub endpoint: Option<String>,
	/// Maximum number of redirects followed per request.
	pub max_redirects: usize,
	/// Version-specific authentication strategy.
	pub authenticator: Arc<dyn Authenticator>,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Builds the initial session: the token falls back to the password placeholder.
	pub fn session(&self) -> ClientSession {
		ClientSession::from(self)
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("username", &self.username)
			.field("password_set", &self.password.is_some())
			.field("token_set", &self.token.is_some())
			.field("project_id", &self.project_id)
			.field("auth_url", &self.auth_url)
			.field("region_name", &self.region_name)
			.field("timeout", &self.timeout)
			.field("endpoint", &self.endpoint)
			.field("max_redirects", &self.max_redirects)
			.field("version", &self.authenticator.version())
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
pub struct ClientConfigBuilder {
	username: Option<String>,
	password: Option<Secret>,
	token: Option<Secret>,
	project_id: Option<String>,
	auth_url: Option<String>,
	region_name: Option<String>,
	timeout: Option<StdDuration>,
	endpoint: Option<String>,
	max_redirects: usize,
	authenticator: Option<Arc<dyn Authenticator>>,
}
impl ClientConfigBuilder {
	/// Sets the username.
	pub fn username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the password.
	pub fn password(mut self, password: impl Into<Secret>) -> Self {
		self.password = Some(password.into());

		self
	}

	/// Sets a pre-issued token.
	pub fn token(mut self, token: impl Into<Secret>) -> Self {
		self.token = Some(token.into());

		self
	}

	/// Sets the project (tenant) identifier.
	pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
		self.project_id = Some(project_id.into());

		self
	}

	/// Sets the auth endpoint base URL; validated by [`build`](Self::build).
	pub fn auth_url(mut self, auth_url: impl Into<String>) -> Self {
		self.auth_url = Some(auth_url.into());

		self
	}

	/// Sets the preferred service-catalog region.
	pub fn region_name(mut self, region_name: impl Into<String>) -> Self {
		self.region_name = Some(region_name.into());

		self
	}

	/// Sets the timeout applied to every transport call.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets a pre-known management endpoint; validated by [`build`](Self::build).
	pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into());

		self
	}

	/// Overrides the redirect limit (defaults to [`RawClient::DEFAULT_MAX_REDIRECTS`]).
	pub fn max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;

		self
	}

	/// Selects the version-specific authentication strategy.
	pub fn authenticator(mut self, authenticator: impl 'static + Authenticator) -> Self {
		self.authenticator = Some(Arc::new(authenticator));

		self
	}

	/// Selects a shared authentication strategy.
	pub fn shared_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
		self.authenticator = Some(authenticator);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.max_redirects == 0 {
			return Err(ConfigError::ZeroRedirectLimit);
		}

		let auth_url = self
			.auth_url
			.as_deref()
			.map(|raw| {
				Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field: "auth", source })
			})
			.transpose()?;

		if let Some(endpoint) = self.endpoint.as_deref() {
			Url::parse(endpoint)
				.map_err(|source| ConfigError::InvalidUrl { field: "endpoint", source })?;
		}

		Ok(ClientConfig {
			username: self.username,
			password: self.password,
			token: self.token,
			project_id: self.project_id,
			auth_url,
			region_name: self.region_name,
			timeout: self.timeout,
			endpoint: self.endpoint,
			max_redirects: self.max_redirects,
			authenticator: self.authenticator.unwrap_or_else(|| Arc::new(UnversionedAuthenticator)),
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			username: None,
			password: None,
			token: None,
			project_id: None,
			auth_url: None,
			region_name: None,
			timeout: None,
			endpoint: None,
			max_redirects: RawClient::DEFAULT_MAX_REDIRECTS,
			authenticator: None,
		}
	}
}
impl Debug for ClientConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfigBuilder")
			.field("username", &self.username)
			.field("auth_url", &self.auth_url)
			.field("endpoint", &self.endpoint)
			.field("max_redirects", &self.max_redirects)
			.field("authenticator_set", &self.authenticator.is_some())
			.finish()
	}
}
