#![cfg(feature = "reqwest")]

mod common;

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::CountingAuthenticator;
use keystone_client::{
	client::{ClientConfig, IdentityClient},
	error::ApiErrorKind,
	request::{FRESH_PARAM, RequestOptions, ResponseBody},
};

fn build_client(
	server: &MockServer,
	token: &str,
	authenticator: Arc<CountingAuthenticator>,
) -> IdentityClient {
	let config = ClientConfig::builder()
		.token(token)
		.project_id("demo-project")
		.endpoint(server.url("/v2/demo"))
		.timeout(Duration::from_secs(5))
		.shared_authenticator(authenticator)
		.build()
		.expect("Client configuration should build successfully.");

	IdentityClient::new(config).expect("Reqwest client should build successfully.")
}

#[tokio::test]
async fn get_sends_auth_headers_and_cache_buster() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/demo/servers")
				.query_param("limit", "1")
				.query_param_exists(FRESH_PARAM)
				.header("x-auth-token", "abc")
				.header("x-auth-project-id", "demo-project")
				.header("user-agent", concat!("keystone-client/", env!("CARGO_PKG_VERSION")));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"servers":[{"id":"srv-1"}]}"#);
		})
		.await;
	let mut client = build_client(&server, "abc", CountingAuthenticator::new(None));
	let response = client
		.get("/servers?limit=1", RequestOptions::new())
		.await
		.expect("GET should succeed against the mock server.");

	mock.assert_calls_async(1).await;

	assert_eq!(response.status.as_u16(), 200);
	assert_eq!(
		response.body,
		Some(ResponseBody::Json(json!({ "servers": [{ "id": "srv-1" }] })))
	);
}

#[tokio::test]
async fn rejected_token_is_refreshed_and_retried() {
	let server = MockServer::start_async().await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/demo/servers").header("x-auth-token", "stale");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"unauthorized":{"message":"Token expired"}}"#);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v2/demo/servers")
				.header("x-auth-token", "token-1")
				.header("content-type", "application/json")
				.json_body(json!({ "server": { "name": "web" } }));
			then.status(202).header("content-type", "application/json").body(r#"{"id":"srv-2"}"#);
		})
		.await;
	let authenticator = CountingAuthenticator::new(Some(server.url("/v2/demo").as_str()));
	let mut client = build_client(&server, "stale", authenticator.clone());
	let response = client
		.post("/servers", RequestOptions::new().with_body(json!({ "server": { "name": "web" } })))
		.await
		.expect("Retry with a fresh token should succeed.");

	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;

	assert_eq!(authenticator.calls(), 1);
	assert_eq!(response.status.as_u16(), 202);
}

#[tokio::test]
async fn legacy_redirect_is_followed_with_the_same_method() {
	let server = MockServer::start_async().await;
	let location = server.url("/v2/demo/servers/new");
	let moved = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v2/demo/servers/old");
			then.status(301).header("location", location);
		})
		.await;
	let target = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v2/demo/servers/new").header("x-auth-token", "abc");
			then.status(204);
		})
		.await;
	let mut client = build_client(&server, "abc", CountingAuthenticator::new(None));
	let response = client
		.delete("/servers/old", RequestOptions::new())
		.await
		.expect("Redirected DELETE should succeed.");

	moved.assert_calls_async(1).await;
	target.assert_calls_async(1).await;

	assert_eq!(response.status.as_u16(), 204);
	assert!(response.body.is_none());
}

#[tokio::test]
async fn not_found_maps_to_typed_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PUT).path("/v2/demo/servers/missing");
			then.status(404)
				.header("content-type", "application/json")
				.body(r#"{"itemNotFound":{"message":"Instance could not be found","code":404}}"#);
		})
		.await;
	let mut client = build_client(&server, "abc", CountingAuthenticator::new(None));
	let err = client
		.put("/servers/missing", RequestOptions::new())
		.await
		.expect_err("404 should surface as an error.");

	mock.assert_async().await;

	assert_eq!(err.api_kind(), Some(ApiErrorKind::NotFound));
	assert_eq!(err.to_string(), "Instance could not be found (HTTP 404)");
}
