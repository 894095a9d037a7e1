use std::fmt::Display;

use super::Result;
use crate::debug_error;

pub trait LogDebugErr<T, E: Display> {
	/// Log the error with `debug_error!` and pass it through; loud in debug
	/// builds, quiet in release builds.
	#[must_use]
	fn log_debug_err(self) -> Self;
}

impl<T, E: Display> LogDebugErr<T, E> for Result<T, E> {
	#[inline]
	fn log_debug_err(self) -> Self { self.inspect_err(|error| debug_error!("{error}")) }
}
