//! Logging macros wrapping `tracing`.
//!
//! Everything in the workspace logs through these so the backend can be
//! changed in one place.

pub use tracing::Level;

// Wraps for logging macros.

#[macro_export]
macro_rules! event {
	( $level:expr, $($x:tt)+ ) => { $crate::tracing::event!( $level, $($x)+ ) }
}

#[macro_export]
macro_rules! error {
    ( $($x:tt)+ ) => { $crate::tracing::error!( $($x)+ ) }
}

#[macro_export]
macro_rules! warn {
    ( $($x:tt)+ ) => { $crate::tracing::warn!( $($x)+ ) }
}

#[macro_export]
macro_rules! info {
    ( $($x:tt)+ ) => { $crate::tracing::info!( $($x)+ ) }
}

#[macro_export]
macro_rules! debug {
    ( $($x:tt)+ ) => { $crate::tracing::debug!( $($x)+ ) }
}

#[macro_export]
macro_rules! trace {
    ( $($x:tt)+ ) => { $crate::tracing::trace!( $($x)+ ) }
}

/// Log event at given level in debug-mode (when debug-assertions are enabled).
/// In release-mode it becomes DEBUG level, and possibly subject to elision.
#[macro_export]
macro_rules! debug_event {
	( $level:expr, $($x:tt)+ ) => {
		if cfg!(debug_assertions) {
			$crate::tracing::event!( $level, _debug = true, $($x)+ )
		} else {
			$crate::tracing::debug!( _debug = true, $($x)+ )
		}
	}
}

/// Log message at the ERROR level in debug-mode (when debug-assertions are
/// enabled). In release-mode it becomes DEBUG level, and possibly subject to
/// elision.
#[macro_export]
macro_rules! debug_error {
	( $($x:tt)+ ) => {
		$crate::debug_event!( $crate::tracing::Level::ERROR, $($x)+ )
	}
}

/// Log message at the WARN level in debug-mode (when debug-assertions are
/// enabled). In release-mode it becomes DEBUG level, and possibly subject to
/// elision.
#[macro_export]
macro_rules! debug_warn {
	( $($x:tt)+ ) => {
		$crate::debug_event!( $crate::tracing::Level::WARN, $($x)+ )
	}
}

/// Log message at the INFO level in debug-mode (when debug-assertions are
/// enabled). In release-mode it becomes DEBUG level, and possibly subject to
/// elision.
#[macro_export]
macro_rules! debug_info {
	( $($x:tt)+ ) => {
		$crate::debug_event!( $crate::tracing::Level::INFO, $($x)+ )
	}
}
