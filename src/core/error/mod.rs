mod err;
mod response;

use std::{borrow::Cow, fmt};

use http::StatusCode;
use ruma::api::client::error::ErrorKind;

pub use self::err::format_cow;

#[derive(thiserror::Error)]
pub enum Error {
	// std
	#[error(transparent)]
	Io(#[from] std::io::Error),

	// third-party
	#[error("Configuration error: {0}")]
	Figment(#[from] figment::error::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Mxid(#[from] ruma::IdParseError),

	// ruma/warden
	#[error("{1}")]
	BadRequest(ErrorKind, &'static str),
	#[error("There was a problem with the '{0}' directive in your configuration: {1}")]
	Config(&'static str, Cow<'static, str>),
	#[error("{1}")]
	Request(ErrorKind, Cow<'static, str>, StatusCode),

	// unique / untyped
	#[error("{0}")]
	Err(Cow<'static, str>),
}

impl Error {
	/// Sanitized message for the submitter of a request.
	pub fn message(&self) -> String {
		match self {
			| Self::Request(_, msg, _) => msg.to_string(),
			| Self::BadRequest(_, msg) => (*msg).to_owned(),
			| _ => format!("{self}"),
		}
	}

	/// Returns the HTTP error code or closest approximation based on error
	/// variant.
	pub fn status_code(&self) -> StatusCode {
		match self {
			| Self::Request(kind, _, code) => response::status_code(kind, *code),
			| Self::BadRequest(kind, ..) => response::bad_request_code(kind),
			| Self::Json(..) | Self::Mxid(..) => StatusCode::BAD_REQUEST,
			| _ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// A denial by room policy rather than malformed input or a fault.
	#[inline]
	#[must_use]
	pub fn is_forbidden(&self) -> bool { self.status_code() == StatusCode::FORBIDDEN }

	/// Rejection of malformed input.
	#[inline]
	#[must_use]
	pub fn is_invalid(&self) -> bool { self.status_code() == StatusCode::BAD_REQUEST }

	/// Upstream contract violation or internal fault.
	#[inline]
	#[must_use]
	pub fn is_structural(&self) -> bool { self.status_code().is_server_error() }
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.message(), self.status_code())
	}
}
