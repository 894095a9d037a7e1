//! Helper types to work with events (aka PDUs).

pub mod join_rules;
pub mod member;
pub mod power_levels;

use ruma::events::TimelineEventType;

pub use self::{
	join_rules::{JoinRule, RoomJoinRulesEvent},
	member::{RoomMemberEvent, RoomMemberEventContent},
	power_levels::{RoomPowerLevelsEvent, RoomPowerLevelsEventOptionExt, RoomPowerLevelsIntField},
};
use crate::matrix::Event;

/// The part of an event that authorization cares about, selected by event
/// type.
#[derive(Clone, Debug)]
pub enum Payload<E: Event> {
	/// `m.room.create`
	Create,

	/// `m.room.member`
	Member(RoomMemberEvent<E>),

	/// `m.room.power_levels`
	PowerLevels(RoomPowerLevelsEvent<E>),

	/// `m.room.redaction`
	Redaction(E),

	/// Anything else; only the send level applies.
	Other,
}

impl<E: Event> Payload<E> {
	#[must_use]
	pub fn new(event: E) -> Self {
		match event.event_type() {
			| TimelineEventType::RoomCreate => Self::Create,
			| TimelineEventType::RoomMember => Self::Member(RoomMemberEvent::new(event)),
			| TimelineEventType::RoomPowerLevels =>
				Self::PowerLevels(RoomPowerLevelsEvent::new(event)),
			| TimelineEventType::RoomRedaction => Self::Redaction(event),
			| _ => Self::Other,
		}
	}

	#[inline]
	#[must_use]
	pub fn is_create(&self) -> bool { matches!(self, Self::Create) }
}
