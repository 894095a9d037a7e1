//! Types to deserialize `m.room.member` events.

use std::ops::Deref;

use ruma::{UserId, events::room::member::MembershipState, serde::from_raw_json_value};
use serde::Deserialize;
use serde_json::value::RawValue as RawJsonValue;

use crate::{Err, Result, err, matrix::Event};

/// A helper type for an [`Event`] of type `m.room.member`.
///
/// This is a type that deserializes each field lazily, as requested.
#[derive(Debug, Clone)]
pub struct RoomMemberEvent<E: Event>(E);

impl<E: Event> RoomMemberEvent<E> {
	/// Construct a new `RoomMemberEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	#[inline]
	pub fn into_inner(self) -> E { self.0 }

	/// The membership of the user.
	#[inline]
	pub fn membership(&self) -> Result<MembershipState> {
		RoomMemberEventContent(self.content()).membership()
	}

	/// The user whose membership this event changes.
	///
	/// A member event without a state key is a malformed upstream event.
	pub fn target(&self) -> Result<&UserId> {
		let Some(state_key) = self.state_key() else {
			return Err!("`m.room.member` event {} has no state key", self.event_id());
		};

		<&UserId>::try_from(state_key).map_err(|e| {
			err!(Request(InvalidParam(
				"`state_key` of `m.room.member` event is not a user id: {e}"
			)))
		})
	}
}

impl<E: Event> Deref for RoomMemberEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}

/// A helper type for the raw JSON content of an event of type `m.room.member`.
pub struct RoomMemberEventContent<'a>(&'a RawJsonValue);

impl<'a> RoomMemberEventContent<'a> {
	/// Construct a new `RoomMemberEventContent` around the given raw JSON
	/// content.
	#[inline]
	#[must_use]
	pub fn new(content: &'a RawJsonValue) -> Self { Self(content) }
}

impl RoomMemberEventContent<'_> {
	/// The membership of the user.
	pub fn membership(&self) -> Result<MembershipState> {
		#[derive(Deserialize)]
		struct RoomMemberContentMembership {
			membership: MembershipState,
		}

		let content: RoomMemberContentMembership =
			from_raw_json_value(self.0).map_err(|err: serde_json::Error| {
				err!(Request(InvalidParam(
					"missing or invalid `membership` field in `m.room.member` event: {err}"
				)))
			})?;

		Ok(content.membership)
	}
}

/// Helper trait for the prior `m.room.member` event of a user, if any.
pub(crate) trait RoomMemberEventOptionExt {
	/// The membership of the user, `None` when there is no `m.room.member`
	/// event at all.
	fn membership(&self) -> Result<Option<MembershipState>>;
}

impl<E: Event> RoomMemberEventOptionExt for Option<RoomMemberEvent<E>> {
	fn membership(&self) -> Result<Option<MembershipState>> {
		self.as_ref()
			.map(RoomMemberEvent::membership)
			.transpose()
	}
}
