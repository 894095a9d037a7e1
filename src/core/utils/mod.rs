pub mod result;

pub use self::result::{LogDebugErr, LogErr};
