pub mod config;
pub mod error;
pub mod log;
pub mod matrix;
pub mod utils;

pub use ::http;
pub use ::ruma;
pub use ::smallstr;
pub use ::tracing;
pub use config::Config;
pub use error::Error;
pub use matrix::{Event, EventTypeExt, Pdu, PduEvent, StateKey, StateMap, state_res};
pub use utils::{result, result::Result};
