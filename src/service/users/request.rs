use std::net::IpAddr;

use http::{
	header::{AUTHORIZATION, USER_AGENT},
	request::Parts,
};
use serde::Deserialize;
use warden_core::debug_warn;

/// The parts of an incoming client request identity resolution looks at.
#[derive(Clone, Debug, Default)]
pub struct ClientRequest {
	pub access_token: Option<String>,
	pub ip: Option<IpAddr>,
	pub user_agent: Option<String>,
}

#[derive(Default, Deserialize)]
struct QueryParams {
	access_token: Option<String>,
}

impl ClientRequest {
	/// Take the token from a bearer `Authorization` header, falling back to
	/// the `access_token` query parameter.
	#[must_use]
	pub fn from_parts(parts: &Parts, ip: Option<IpAddr>) -> Self {
		let bearer = parts
			.headers
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "))
			.map(str::trim)
			.filter(|token| !token.is_empty())
			.map(ToOwned::to_owned);

		let query = parts
			.uri
			.query()
			.map(serde_html_form::from_str::<QueryParams>)
			.transpose()
			.unwrap_or_else(|error| {
				debug_warn!("Failed to read query parameters: {error}");
				None
			})
			.unwrap_or_default()
			.access_token
			.filter(|token| !token.is_empty());

		let user_agent = parts
			.headers
			.get(USER_AGENT)
			.and_then(|value| value.to_str().ok())
			.map(ToOwned::to_owned);

		Self {
			access_token: bearer.or(query),
			ip,
			user_agent,
		}
	}
}
