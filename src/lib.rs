//! Authenticated REST client for Keystone-style identity services: consistent header
//! injection, JSON bodies, typed status errors, bounded redirects, and a single
//! re-authentication retry when a token expires.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use oauth2::{HttpRequest, http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode}};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Serialize;
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};

	/// Boxed `Send` future used at the crate's dynamic seams.
	pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _, tokio as _};
