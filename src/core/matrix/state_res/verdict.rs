use ruma::serde::{DebugAsRefStr, DisplayAsRefStr};

use crate::{Error, Result};

/// Outcome of authorizing one event against the state before it.
#[derive(Debug)]
pub enum Verdict {
	Allowed(Allowance),
	Denied(Error),
}

/// Why an event was let through.
#[derive(Clone, Copy, DebugAsRefStr, DisplayAsRefStr, Eq, PartialEq)]
pub enum Allowance {
	/// The state before the event is unknown; the event is trusted as is.
	Trusted,

	/// Outliers are authorized elsewhere.
	Outlier,

	/// `m.room.create` starts the room and has nothing to be judged against.
	Create,

	/// Every applicable rule passed.
	Policy,
}

/// How a denial is surfaced to the caller.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AuthMode {
	/// Denials become `false`.
	#[default]
	Lenient,

	/// Denials become `Err`.
	Strict,
}

impl Verdict {
	#[inline]
	#[must_use]
	pub fn is_allowed(&self) -> bool { matches!(self, Self::Allowed(_)) }

	#[inline]
	pub fn into_result(self) -> Result<Allowance> {
		match self {
			| Self::Allowed(allowance) => Ok(allowance),
			| Self::Denied(error) => Err(error),
		}
	}

	/// Surface the verdict in the given mode.
	#[inline]
	pub fn surface(self, mode: AuthMode) -> Result<bool> {
		match (self, mode) {
			| (Self::Allowed(_), _) => Ok(true),
			| (Self::Denied(_), AuthMode::Lenient) => Ok(false),
			| (Self::Denied(error), AuthMode::Strict) => Err(error),
		}
	}
}

impl From<Result<Allowance>> for Verdict {
	#[inline]
	fn from(result: Result<Allowance>) -> Self {
		match result {
			| Ok(allowance) => Self::Allowed(allowance),
			| Err(error) => Self::Denied(error),
		}
	}
}

impl AsRef<str> for Allowance {
	#[inline]
	fn as_ref(&self) -> &'static str {
		match self {
			| Self::Trusted => "trusted",
			| Self::Outlier => "outlier",
			| Self::Create => "create",
			| Self::Policy => "policy",
		}
	}
}

impl From<bool> for AuthMode {
	#[inline]
	fn from(strict: bool) -> Self { if strict { Self::Strict } else { Self::Lenient } }
}
