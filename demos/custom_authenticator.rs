//! Demonstrates plugging a version-specific authenticator and an in-process transport into
//! [`IdentityClient`].
//!
//! 1. Implement [`Authenticator`] so it posts credentials through the provided [`RawClient`] and
//!    stores the issued token plus the compute endpoint from the service catalog.
//! 2. Implement [`HttpTransport`] to answer requests without a network.
//! 3. Build a [`ClientConfig`] with the authenticator and issue a GET; authentication happens
//!    lazily before the first call.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use serde_json::{Value, json};
// self
use keystone_client::{
	auth::{AuthFuture, Authenticator},
	client::{ClientConfig, ClientSession, IdentityClient},
	error::{Error, TransportError},
	http::{HttpRequest, HttpResponse, HttpTransport, Method, StatusCode, TransportFuture},
	request::{RawClient, RequestOptions, ResponseBody},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder()
		.username("demo")
		.password("demo-password")
		.project_id("demo-project")
		.auth_url("https://identity.example.com/v2.0")
		.region_name("RegionOne")
		.authenticator(PasswordAuthenticator)
		.build()?;
	let mut client = IdentityClient::with_transport(config, Arc::new(MockCloud));
	let response = client.get("/servers?limit=1", RequestOptions::new()).await?;

	println!("Authenticated against {:?}.", client.session().management_url);
	println!("GET /servers answered {} with {:?}.", response.status, response.body);

	match client.delete("/servers/missing", RequestOptions::new()).await {
		Ok(_) => println!("Mock cloud unexpectedly deleted a missing server."),
		Err(e) => println!("Typed error surfaced to the caller: {e}."),
	}

	Ok(())
}

/// Password authenticator for a v2.0-style `/tokens` endpoint.
struct PasswordAuthenticator;
impl Authenticator for PasswordAuthenticator {
	fn authenticate<'a>(
		&'a self,
		session: &'a mut ClientSession,
		http: &'a RawClient,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			let auth_url = session.auth_url.clone().ok_or(Error::MissingManagementUrl)?;
			let body = json!({
				"auth": {
					"passwordCredentials": {
						"username": session.username,
						"password": session.password.as_ref().map(|secret| secret.expose()),
					},
					"tenantId": session.project_id,
				}
			});
			let url = format!("{}/tokens", auth_url.as_str().trim_end_matches('/'));
			let response =
				http.raw_request(&url, Method::POST, &RequestOptions::new().with_body(body)).await?;

			self.extract_service_catalog(session, &url, response.body.as_ref())
		})
	}

	fn extract_service_catalog(
		&self,
		session: &mut ClientSession,
		_url: &str,
		body: Option<&ResponseBody>,
	) -> keystone_client::error::Result<()> {
		let access = body.and_then(ResponseBody::as_json).map(|value| &value["access"]);
		let token = access.and_then(|access| access["token"]["id"].as_str());
		let region = session.region_name.clone();
		let endpoint = access
			.and_then(|access| access["serviceCatalog"].as_array())
			.into_iter()
			.flatten()
			.filter(|service| service["type"] == "compute")
			.flat_map(|service| service["endpoints"].as_array().cloned().unwrap_or_default())
			.find(|endpoint| {
				region.as_deref().is_none_or(|region| endpoint["region"] == region)
			})
			.and_then(|endpoint| endpoint["publicURL"].as_str().map(str::to_owned));

		match (endpoint, token) {
			(Some(endpoint), Some(token)) => {
				session.set_credentials(endpoint, token);

				Ok(())
			},
			_ => Err(Error::MissingManagementUrl),
		}
	}
}

/// Answers token and compute requests in-process.
struct MockCloud;
impl HttpTransport for MockCloud {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let path = request.uri().path().to_owned();
			let method = request.method();
			let (status, body): (StatusCode, Value) = if method == Method::POST
				&& path == "/v2.0/tokens"
			{
				(
					StatusCode::OK,
					json!({
						"access": {
							"token": { "id": "demo-token" },
							"serviceCatalog": [{
								"type": "compute",
								"endpoints": [{
									"region": "RegionOne",
									"publicURL": "https://compute.example.com/v2/demo-project"
								}]
							}]
						}
					}),
				)
			} else if method == Method::GET && path == "/v2/demo-project/servers" {
				(StatusCode::OK, json!({ "servers": [{ "id": "srv-1", "name": "web" }] }))
			} else {
				(
					StatusCode::NOT_FOUND,
					json!({ "itemNotFound": { "message": format!("No route for {path}.") } }),
				)
			};
			let bytes = serde_json::to_vec(&body)
				.map_err(|e| TransportError::Io(std::io::Error::other(e)))?;
			let mut response = HttpResponse::new(bytes);

			*response.status_mut() = status;

			Ok::<_, TransportError>(response)
		})
	}
}
