//! Types to deserialize `m.room.join_rules` events.

use std::ops::Deref;

use ruma::serde::{DebugAsRefStr, DisplayAsRefStr, from_raw_json_value};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::{Result, err, matrix::Event};

/// A helper type for an [`Event`] of type `m.room.join_rules`.
///
/// This is a type that deserializes each field lazily, as requested.
#[derive(Debug, Clone)]
pub struct RoomJoinRulesEvent<E: Event>(E);

impl<E: Event> RoomJoinRulesEvent<E> {
	/// Construct a new `RoomJoinRulesEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	/// The join rule of the room; `invite` when the field is absent. A value
	/// that is not a string is [`JoinRule::Other`].
	pub fn join_rule(&self) -> Result<JoinRule> {
		#[derive(Deserialize)]
		struct RoomJoinRulesContentJoinRule {
			#[serde(default, deserialize_with = "JoinRule::deserialize_lenient")]
			join_rule: JoinRule,
		}

		let content: RoomJoinRulesContentJoinRule =
			from_raw_json_value(self.content()).map_err(|err: serde_json::Error| {
				err!(Request(InvalidParam(
					"invalid `join_rule` field in `m.room.join_rules` event: {err}"
				)))
			})?;

		Ok(content.join_rule)
	}
}

impl<E: Event> Deref for RoomJoinRulesEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}

/// Helper trait for `Option<RoomJoinRulesEvent<E>>`.
pub(crate) trait RoomJoinRulesEventOptionExt {
	/// The join rule of the room; `invite` without an `m.room.join_rules`
	/// event.
	fn join_rule(&self) -> Result<JoinRule>;
}

impl<E: Event> RoomJoinRulesEventOptionExt for Option<RoomJoinRulesEvent<E>> {
	fn join_rule(&self) -> Result<JoinRule> {
		self.as_ref()
			.map_or(Ok(JoinRule::default()), RoomJoinRulesEvent::join_rule)
	}
}

/// Who may join the room without an invite.
///
/// Values other than the three understood here are kept as [`JoinRule::Other`]
/// and never admit a join.
#[derive(Clone, Copy, Default, DebugAsRefStr, DisplayAsRefStr, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JoinRule {
	/// Anyone may join.
	Public,

	/// Only users already admitted may join.
	#[default]
	Invite,

	/// Reserved; nobody may join.
	Private,

	#[serde(other)]
	Other,
}

impl JoinRule {
	fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match JsonValue::deserialize(deserializer)? {
			| JsonValue::String(rule) => Self::from(rule.as_str()),
			| _ => Self::Other,
		})
	}
}

impl From<&str> for JoinRule {
	fn from(rule: &str) -> Self {
		match rule {
			| "public" => Self::Public,
			| "invite" => Self::Invite,
			| "private" => Self::Private,
			| _ => Self::Other,
		}
	}
}

impl AsRef<str> for JoinRule {
	#[inline]
	fn as_ref(&self) -> &'static str {
		match self {
			| Self::Public => "public",
			| Self::Invite => "invite",
			| Self::Private => "private",
			| Self::Other => "other",
		}
	}
}

#[cfg(test)]
mod tests {
	use ruma::events::TimelineEventType;
	use serde_json::{from_value as from_json_value, json};

	use super::{JoinRule, RoomJoinRulesEvent};
	use crate::matrix::state_res::test_utils::{alice, to_pdu_event, to_raw};

	#[test]
	fn known_rules() {
		let rule: JoinRule = from_json_value(json!("public")).unwrap();
		assert_eq!(rule, JoinRule::Public);

		let rule: JoinRule = from_json_value(json!("private")).unwrap();
		assert_eq!(rule, JoinRule::Private);
	}

	#[test]
	fn unknown_rule_is_other() {
		let rule: JoinRule = from_json_value(json!("knock")).unwrap();
		assert_eq!(rule, JoinRule::Other);
		assert_eq!(rule.to_string(), "other");
	}

	#[test]
	fn field_values_that_are_not_strings_are_other() {
		let event = |content| {
			RoomJoinRulesEvent::new(to_pdu_event(
				"IJR",
				alice(),
				TimelineEventType::RoomJoinRules,
				Some(""),
				to_raw(content),
			))
		};

		assert_eq!(event(json!({ "join_rule": 5 })).join_rule().unwrap(), JoinRule::Other);
		assert_eq!(event(json!({ "join_rule": null })).join_rule().unwrap(), JoinRule::Other);
		assert_eq!(event(json!({ "join_rule": "public" })).join_rule().unwrap(), JoinRule::Public);
		assert_eq!(event(json!({})).join_rule().unwrap(), JoinRule::Invite);
		event(json!("public")).join_rule().unwrap_err();
	}

	#[test]
	fn default_is_invite() {
		assert_eq!(JoinRule::default(), JoinRule::Invite);
	}
}
