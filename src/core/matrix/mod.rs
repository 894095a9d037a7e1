//! Core Matrix Library

pub mod event;
pub mod pdu;
pub mod state_key;
pub mod state_res;

pub use event::{Event, TypeExt as EventTypeExt};
pub use pdu::{Pdu, PduEvent};
pub use state_key::{StateKey, TypeStateKey};
pub use state_res::StateMap;
