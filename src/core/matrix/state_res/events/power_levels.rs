//! Types to deserialize `m.room.power_levels` events.

use std::{ops::Deref, sync::OnceLock};

use ruma::{
	Int, OwnedUserId, UserId,
	events::TimelineEventType,
	int,
	serde::{
		DebugAsRefStr, DisplayAsRefStr, JsonObject, OrdAsRefStr, PartialEqAsRefStr,
		PartialOrdAsRefStr, deserialize_v1_powerlevel, from_raw_json_value,
	},
};
use serde_json::{Error, Value as JsonValue};

use crate::{Err, Result, err, matrix::Event};

/// A helper type for an [`Event`] of type `m.room.power_levels`.
///
/// The content is deserialized once, on first use, and cached in memory.
/// Absent fields stay absent; defaults are only applied through
/// [`RoomPowerLevelsIntField::default_value`].
#[derive(Clone, Debug)]
pub struct RoomPowerLevelsEvent<E: Event> {
	event: E,
	content: OnceLock<JsonObject>,
}

impl<E: Event> RoomPowerLevelsEvent<E> {
	/// Construct a new `RoomPowerLevelsEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self { event, content: OnceLock::new() } }

	/// The deserialized content of the event.
	fn deserialized_content(&self) -> Result<&JsonObject> {
		if let Some(content) = self.content.get() {
			return Ok(content);
		}

		let content = from_raw_json_value(self.event.content()).map_err(|error: Error| {
			err!(Request(InvalidParam("malformed `m.room.power_levels` content: {error}")))
		})?;

		Ok(self.content.get_or_init(|| content))
	}

	/// Get the value of a field that should contain an integer, if any.
	///
	/// Integers and strings containing an integer are both accepted.
	pub fn get_as_int(&self, field: RoomPowerLevelsIntField) -> Result<Option<Int>> {
		let content = self.deserialized_content()?;

		content
			.get(field.as_str())
			.map(power_level)
			.transpose()
	}

	/// Get the value of a field that should contain an integer, or its default
	/// value if it is absent.
	#[inline]
	pub fn get_as_int_or_default(&self, field: RoomPowerLevelsIntField) -> Result<Int> {
		Ok(self
			.get_as_int(field)?
			.unwrap_or_else(|| field.default_value()))
	}

	/// Get the value of a field that should contain a map of some key to
	/// integer, if any.
	fn get_as_int_map<K, F>(&self, field: &str, parse_key: F) -> Result<Option<Vec<(K, Int)>>>
	where
		F: Fn(&str) -> Result<K>,
	{
		let content = self.deserialized_content()?;

		let Some(value) = content.get(field) else {
			return Ok(None);
		};

		let Some(map) = value.as_object() else {
			return Err!(Request(InvalidParam(
				"unexpected format of `{field}` field in `content` of `m.room.power_levels` \
				 event: expected object"
			)));
		};

		map.iter()
			.map(|(key, value)| Ok((parse_key(key)?, power_level(value)?)))
			.collect::<Result<_>>()
			.map(Some)
	}

	/// Get the power levels required to send events, if any.
	#[inline]
	pub fn events(&self) -> Result<Option<Vec<(TimelineEventType, Int)>>> {
		self.get_as_int_map("events", |event_type| Ok(event_type.into()))
	}

	/// Get the power levels of the users, if any.
	///
	/// Every key must be a valid user ID. Only proposed content is held to
	/// this; see [`Self::user_levels`] for state already in the room.
	#[inline]
	pub fn users(&self) -> Result<Option<Vec<(OwnedUserId, Int)>>> {
		self.get_as_int_map("users", |user_id| {
			UserId::parse(user_id)
				.map_err(|_| err!(Request(InvalidParam("Not a valid user_id: {user_id}"))))
		})
	}

	/// Get the power levels of the users, if any, keyed as they appear.
	#[inline]
	pub fn user_levels(&self) -> Result<Option<Vec<(String, Int)>>> {
		self.get_as_int_map("users", |key| Ok(key.to_owned()))
	}

	/// Get the power level of the user with the given ID.
	///
	/// Only the user's own entry is looked at. An entry of zero in `users` is
	/// treated like a missing entry and falls through to `users_default`.
	pub fn user_power_level(&self, user_id: &UserId) -> Result<Int> {
		let explicit = self
			.user_entry(user_id)?
			.filter(|power_level| *power_level != int!(0));

		match explicit {
			| Some(power_level) => Ok(power_level),
			| None => self.get_as_int_or_default(RoomPowerLevelsIntField::UsersDefault),
		}
	}

	fn user_entry(&self, user_id: &UserId) -> Result<Option<Int>> {
		let content = self.deserialized_content()?;

		let Some(value) = content.get("users") else {
			return Ok(None);
		};

		let Some(users) = value.as_object() else {
			return Err!(Request(InvalidParam(
				"unexpected format of `users` field in `content` of `m.room.power_levels` \
				 event: expected object"
			)));
		};

		users.get(user_id.as_str()).map(power_level).transpose()
	}

	/// Get the power level required to send an event of the given type.
	pub fn event_power_level(
		&self,
		event_type: &TimelineEventType,
		state_key: Option<&str>,
	) -> Result<Int> {
		let events = self.events()?;

		if let Some(power_level) = events
			.as_deref()
			.and_then(|events| get_value(events, event_type))
		{
			return Ok(*power_level);
		}

		let default_field = if state_key.is_some() {
			RoomPowerLevelsIntField::StateDefault
		} else {
			RoomPowerLevelsIntField::EventsDefault
		};

		self.get_as_int_or_default(default_field)
	}

	/// Get a map of all the fields with an integer value in the `content` of an
	/// `m.room.power_levels` event.
	pub fn int_fields_map(&self) -> Result<Vec<(RoomPowerLevelsIntField, Int)>> {
		RoomPowerLevelsIntField::ALL
			.iter()
			.copied()
			.filter_map(|field| match self.get_as_int(field) {
				| Ok(value) => value.map(|value| Ok((field, value))),
				| Err(error) => Some(Err(error)),
			})
			.collect()
	}
}

impl<E: Event> Deref for RoomPowerLevelsEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.event }
}

/// Helper trait for `Option<&RoomPowerLevelsEvent<E>>`, where `None` means the
/// room has no `m.room.power_levels` state at all.
pub trait RoomPowerLevelsEventOptionExt {
	/// Get the power level of the user with the given ID.
	///
	/// `None` when there is no power level information; callers compare that as
	/// zero.
	fn user_power_level(&self, user_id: &UserId) -> Result<Option<Int>>;

	/// Get the value of a field that should contain an integer, or its default
	/// value if it is absent.
	fn get_as_int_or_default(&self, field: RoomPowerLevelsIntField) -> Result<Int>;

	/// Get the power level required to send an event of the given type; zero
	/// without power level information.
	fn event_power_level(
		&self,
		event_type: &TimelineEventType,
		state_key: Option<&str>,
	) -> Result<Int>;

	/// The `(ban, kick, redact)` levels.
	#[inline]
	fn thresholds(&self) -> Result<(Int, Int, Int)> {
		Ok((
			self.get_as_int_or_default(RoomPowerLevelsIntField::Ban)?,
			self.get_as_int_or_default(RoomPowerLevelsIntField::Kick)?,
			self.get_as_int_or_default(RoomPowerLevelsIntField::Redact)?,
		))
	}
}

impl<E: Event> RoomPowerLevelsEventOptionExt for Option<&RoomPowerLevelsEvent<E>> {
	fn user_power_level(&self, user_id: &UserId) -> Result<Option<Int>> {
		self.map(|event| event.user_power_level(user_id))
			.transpose()
	}

	fn get_as_int_or_default(&self, field: RoomPowerLevelsIntField) -> Result<Int> {
		if let Some(room_power_levels_event) = self {
			room_power_levels_event.get_as_int_or_default(field)
		} else {
			Ok(field.default_value())
		}
	}

	fn event_power_level(
		&self,
		event_type: &TimelineEventType,
		state_key: Option<&str>,
	) -> Result<Int> {
		if let Some(room_power_levels_event) = self {
			room_power_levels_event.event_power_level(event_type, state_key)
		} else {
			Ok(int!(0))
		}
	}
}

/// Effective level for comparisons; no power level information counts as
/// zero.
#[inline]
#[must_use]
pub fn comparable(power_level: Option<Int>) -> Int { power_level.unwrap_or(int!(0)) }

fn power_level(value: &JsonValue) -> Result<Int> {
	deserialize_v1_powerlevel(value)
		.map_err(|_| err!(Request(InvalidParam("Not a valid power level: {value}"))))
}

#[inline]
pub(crate) fn get_value<'a, K, V, B>(vec: &'a [(K, V)], key: &B) -> Option<&'a V>
where
	K: PartialEq<B>,
	B: ?Sized,
{
	vec.iter()
		.find(|(k, _)| k == key)
		.map(|(_, v)| v)
}

/// Fields in the `content` of an `m.room.power_levels` event with an integer
/// value.
#[derive(
	DebugAsRefStr,
	Clone,
	Copy,
	DisplayAsRefStr,
	PartialEqAsRefStr,
	Eq,
	PartialOrdAsRefStr,
	OrdAsRefStr,
)]
#[non_exhaustive]
pub enum RoomPowerLevelsIntField {
	/// `users_default`
	UsersDefault,

	/// `events_default`
	EventsDefault,

	/// `state_default`
	StateDefault,

	/// `ban`
	Ban,

	/// `redact`
	Redact,

	/// `kick`
	Kick,
}

impl RoomPowerLevelsIntField {
	/// A slice containing all the variants.
	pub const ALL: &[Self] = &[
		Self::UsersDefault,
		Self::EventsDefault,
		Self::StateDefault,
		Self::Ban,
		Self::Redact,
		Self::Kick,
	];

	/// The fields whose changes are bounded by the sender's own level.
	pub const GUARDED: &[Self] = &[
		Self::UsersDefault,
		Self::EventsDefault,
		Self::Ban,
		Self::Redact,
		Self::Kick,
	];

	/// The string representation of this field.
	#[inline]
	#[must_use]
	pub fn as_str(&self) -> &str { self.as_ref() }

	/// The default value for this field if it is absent.
	#[inline]
	#[must_use]
	pub fn default_value(self) -> Int {
		match self {
			| Self::UsersDefault | Self::EventsDefault => int!(0),
			| Self::StateDefault | Self::Kick | Self::Ban | Self::Redact => int!(50),
		}
	}
}

impl AsRef<str> for RoomPowerLevelsIntField {
	#[inline]
	fn as_ref(&self) -> &'static str {
		match self {
			| Self::UsersDefault => "users_default",
			| Self::EventsDefault => "events_default",
			| Self::StateDefault => "state_default",
			| Self::Ban => "ban",
			| Self::Redact => "redact",
			| Self::Kick => "kick",
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use maplit::btreemap;
	use ruma::{events::TimelineEventType, int};
	use serde_json::json;

	use super::{RoomPowerLevelsEvent, RoomPowerLevelsEventOptionExt, RoomPowerLevelsIntField};
	use crate::matrix::{
		PduEvent,
		state_res::test_utils::{alice, bob, charlie, power_levels},
	};

	fn room_power_levels() -> RoomPowerLevelsEvent<PduEvent> {
		RoomPowerLevelsEvent::new(power_levels(
			alice(),
			json!({
				"users": { alice().as_str(): 100, bob().as_str(): "25" },
				"users_default": 5,
				"events": { "m.room.name": 75 },
				"kick": 60,
			}),
		))
	}

	#[test]
	fn user_levels() {
		let levels = room_power_levels();

		assert_eq!(levels.user_power_level(alice()).unwrap(), int!(100));
		assert_eq!(levels.user_power_level(bob()).unwrap(), int!(25));
		assert_eq!(levels.user_power_level(charlie()).unwrap(), int!(5));

		let users: BTreeMap<_, _> = levels.users().unwrap().unwrap().into_iter().collect();
		assert_eq!(users, btreemap! {
			alice().to_owned() => int!(100),
			bob().to_owned() => int!(25),
		});
	}

	#[test]
	fn content_is_parsed_once() {
		let levels = room_power_levels();

		let first = levels.deserialized_content().unwrap();
		let second = levels.deserialized_content().unwrap();
		assert!(std::ptr::eq(first, second));
	}

	#[test]
	fn raw_user_keys_are_kept() {
		let levels = RoomPowerLevelsEvent::new(power_levels(
			alice(),
			json!({ "users": { alice().as_str(): 100, "not-a-user": 50 } }),
		));

		assert_eq!(levels.user_power_level(alice()).unwrap(), int!(100));
		assert!(levels.users().is_err());

		let raw: BTreeMap<_, _> = levels
			.user_levels()
			.unwrap()
			.unwrap()
			.into_iter()
			.collect();
		assert_eq!(raw, btreemap! {
			alice().to_string() => int!(100),
			"not-a-user".to_owned() => int!(50),
		});
	}

	#[test]
	fn no_power_levels_means_no_level() {
		let levels: Option<&RoomPowerLevelsEvent<PduEvent>> = None;

		assert_eq!(levels.user_power_level(alice()).unwrap(), None);
		assert_eq!(
			levels
				.event_power_level(&TimelineEventType::RoomTopic, Some(""))
				.unwrap(),
			int!(0)
		);
		assert_eq!(levels.thresholds().unwrap(), (int!(50), int!(50), int!(50)));
	}

	#[test]
	fn thresholds_default_per_field() {
		let levels = room_power_levels();

		assert_eq!(Some(&levels).thresholds().unwrap(), (int!(50), int!(60), int!(50)));
		assert_eq!(levels.get_as_int(RoomPowerLevelsIntField::Ban).unwrap(), None);
	}

	#[test]
	fn event_levels() {
		let levels = room_power_levels();

		let name = levels
			.event_power_level(&TimelineEventType::RoomName, Some(""))
			.unwrap();
		let topic = levels
			.event_power_level(&TimelineEventType::RoomTopic, Some(""))
			.unwrap();
		let message = levels
			.event_power_level(&TimelineEventType::RoomMessage, None)
			.unwrap();

		assert_eq!(name, int!(75));
		assert_eq!(topic, RoomPowerLevelsIntField::StateDefault.default_value());
		assert_eq!(message, RoomPowerLevelsIntField::EventsDefault.default_value());
	}

	#[test]
	fn int_fields_keep_absence() {
		let fields = room_power_levels().int_fields_map().unwrap();

		assert_eq!(fields, vec![
			(RoomPowerLevelsIntField::UsersDefault, int!(5)),
			(RoomPowerLevelsIntField::Kick, int!(60)),
		]);
	}
}
