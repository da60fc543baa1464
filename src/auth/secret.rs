//! Password and token wrapper that never prints its contents.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Credential string (password or auth token) hidden from `Debug` and `Display`.
///
/// An empty secret counts as unset wherever the session decides which credential to
/// send.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);
impl Secret {
	/// Wraps a credential.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw credential for header construction.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the credential is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Drops empty credentials so they fall through to the next candidate.
	pub(crate) fn non_empty(secret: Option<&Self>) -> Option<&Self> {
		secret.filter(|secret| !secret.is_empty())
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<&str> for Secret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Secret({REDACTED})")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
