mod log_debug_err;
mod log_err;

pub use self::{log_debug_err::LogDebugErr, log_err::LogErr};

pub type Result<T = (), E = crate::Error> = std::result::Result<T, E>;
