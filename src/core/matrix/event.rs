mod type_ext;

use std::fmt::Debug;

use ruma::{EventId, RoomId, UserId, events::TimelineEventType};
use serde_json::value::RawValue as RawJsonValue;

pub use self::type_ext::TypeExt;

/// Abstraction of a PDU so users can have their own PDU types.
pub trait Event: Clone + Debug {
	/// The event's content.
	fn content(&self) -> &RawJsonValue;

	/// The `EventId` of this event.
	fn event_id(&self) -> &EventId;

	/// If this event is a redaction event this is the event it redacts.
	fn redacts(&self) -> Option<&EventId>;

	/// The `RoomId` of this event, if it is bound to a room at all.
	fn room_id(&self) -> Option<&RoomId>;

	/// The `UserId` of this event.
	fn sender(&self) -> &UserId;

	/// The state key for this event.
	fn state_key(&self) -> Option<&str>;

	/// The event type.
	fn kind(&self) -> &TimelineEventType;

	/// Whether this event arrived without the events preceding it, so the room
	/// state it was sent against is not ours to judge.
	fn is_outlier(&self) -> bool;

	#[inline]
	fn event_type(&self) -> &TimelineEventType { self.kind() }
}
