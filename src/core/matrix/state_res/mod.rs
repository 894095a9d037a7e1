//! Authorization of room events against the state before them.

pub mod event_auth;
pub mod events;
mod state_map;
#[cfg(test)]
mod test_utils;
mod verdict;

pub use self::{
	event_auth::{auth_check, check, check_event_sender_in_room, check_with_mode, is_allowed},
	state_map::{StateMap, StateMapExt},
	verdict::{Allowance, AuthMode, Verdict},
};
