//! Error construction macros
//!
//! These are specialized macros specific to this project's patterns for
//! throwing Errors; they make Error construction succinct and reduce
//! boilerplate.
//!
//! The `Err!(...)` macro simply wraps `err!(...)` in `Err(...)`.
//!
//! ```ignore
//! // 403 with a `Forbidden` error kind
//! Err!(Request(Forbidden("You are not in room {room_id}.")))
//!
//! // 400 with an `InvalidParam` error kind
//! Err!(Request(InvalidParam("Not a valid user_id: {user_id}")))
//!
//! // 500 untyped
//! Err!("Unknown membership {membership}")
//! ```

use std::{borrow::Cow, fmt};

#[macro_export]
macro_rules! Err {
	($($args:tt)*) => {
		Err($crate::err!($($args)*))
	};
}

#[macro_export]
macro_rules! err {
	(Request(Forbidden($($args:tt)+))) => {
		$crate::error::Error::Request(
			$crate::ruma::api::client::error::ErrorKind::forbidden(),
			$crate::format_maybe!($($args)+),
			$crate::http::StatusCode::BAD_REQUEST
		)
	};

	(Request($variant:ident($($args:tt)+))) => {
		$crate::error::Error::Request(
			$crate::ruma::api::client::error::ErrorKind::$variant,
			$crate::format_maybe!($($args)+),
			$crate::http::StatusCode::BAD_REQUEST
		)
	};

	(Config($item:literal, $($args:tt)+)) => {
		$crate::error::Error::Config($item, $crate::format_maybe!($($args)+))
	};

	($($args:tt)+) => {
		$crate::error::Error::Err($crate::format_maybe!($($args)+))
	};
}

/// Formats its arguments, borrowing instead of allocating when there is
/// nothing to interpolate.
#[macro_export]
macro_rules! format_maybe {
	($s:literal $(,)?) => {
		$crate::error::format_cow(::std::format_args!($s))
	};

	($s:literal, $($args:tt)+) => {
		$crate::error::format_cow(::std::format_args!($s, $($args)+))
	};
}

#[inline]
#[must_use]
pub fn format_cow(args: fmt::Arguments<'_>) -> Cow<'static, str> {
	args.as_str()
		.map_or_else(|| Cow::Owned(args.to_string()), Cow::Borrowed)
}
