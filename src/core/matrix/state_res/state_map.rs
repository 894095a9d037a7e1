use std::collections::BTreeMap;

use ruma::{
	UserId,
	events::{StateEventType, room::member::MembershipState},
};

use super::events::{
	JoinRule, RoomJoinRulesEvent, RoomMemberEvent, RoomPowerLevelsEvent,
	join_rules::RoomJoinRulesEventOptionExt, member::RoomMemberEventOptionExt,
};
use crate::{
	Result,
	matrix::{Event, EventTypeExt, TypeStateKey},
};

/// A mapping of event type and state_key to some value `T`, usually an
/// `EventId` or an event.
pub type StateMap<T> = BTreeMap<TypeStateKey, T>;

/// Typed lookups of the state the authorization rules depend on.
pub trait StateMapExt<E: Event> {
	fn state_event(&self, event_type: &StateEventType, state_key: &str) -> Option<&E>;

	#[inline]
	fn room_power_levels_event(&self) -> Option<RoomPowerLevelsEvent<E>> {
		self.state_event(&StateEventType::RoomPowerLevels, "")
			.cloned()
			.map(RoomPowerLevelsEvent::new)
	}

	#[inline]
	fn room_member_event(&self, user_id: &UserId) -> Option<RoomMemberEvent<E>> {
		self.state_event(&StateEventType::RoomMember, user_id.as_str())
			.cloned()
			.map(RoomMemberEvent::new)
	}

	/// The membership of the user; `None` when the user never had one.
	#[inline]
	fn user_membership(&self, user_id: &UserId) -> Result<Option<MembershipState>> {
		self.room_member_event(user_id).membership()
	}

	/// The join rule of the room; `invite` when unset.
	#[inline]
	fn join_rule(&self) -> Result<JoinRule> {
		self.state_event(&StateEventType::RoomJoinRules, "")
			.cloned()
			.map(RoomJoinRulesEvent::new)
			.join_rule()
	}
}

impl<E: Event> StateMapExt<E> for StateMap<E> {
	#[inline]
	fn state_event(&self, event_type: &StateEventType, state_key: &str) -> Option<&E> {
		self.get(&event_type.with_state_key(state_key))
	}
}
