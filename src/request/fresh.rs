//! Cache-busting rewrite for GET paths.
//!
//! Some deployments cache GET responses aggressively and ignore cache-control
//! headers, so every GET carries a synthetic `fresh=<unix-timestamp>` parameter.

// crates.io
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Query parameter appended to every GET request.
pub const FRESH_PARAM: &str = "fresh";

/// Appends `fresh=<now>` to `url`, keeping existing query pairs and any fragment.
///
/// Caller parameters are never dropped: a bare `flag` is re-encoded as `flag=`.
pub fn append_fresh_param(url: &str) -> String {
	append_fresh_param_at(url, OffsetDateTime::now_utc())
}

/// Same as [`append_fresh_param`] with an explicit clock reading.
pub fn append_fresh_param_at(url: &str, now: OffsetDateTime) -> String {
	let (rest, fragment) = match url.split_once('#') {
		Some((rest, fragment)) => (rest, Some(fragment)),
		None => (url, None),
	};
	let (path, query) = match rest.split_once('?') {
		Some((path, query)) => (path, query),
		None => (rest, ""),
	};
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	serializer.extend_pairs(form_urlencoded::parse(query.as_bytes()));
	serializer.append_pair(FRESH_PARAM, &format_timestamp(now));

	let mut munged = format!("{path}?{}", serializer.finish());

	if let Some(fragment) = fragment {
		munged.push('#');
		munged.push_str(fragment);
	}

	munged
}

/// Unix timestamp with microsecond precision, e.g. `1700000000.123456`.
fn format_timestamp(now: OffsetDateTime) -> String {
	format!("{}.{:06}", now.unix_timestamp(), now.microsecond())
}
