use std::sync::atomic::{AtomicU64, Ordering::SeqCst};

use ruma::{OwnedEventId, RoomId, UserId, events::TimelineEventType, room_id, user_id};
use serde_json::{
	Value as JsonValue, json,
	value::{RawValue as RawJsonValue, to_raw_value as to_raw_json_value},
};

use super::StateMap;
use crate::matrix::{Event, EventTypeExt, PduEvent};

static SERVER_TIMESTAMP: AtomicU64 = AtomicU64::new(0);

pub(super) fn event_id(id: &str) -> OwnedEventId {
	if id.contains('$') {
		return id.try_into().unwrap();
	}

	format!("${id}:foo").try_into().unwrap()
}

pub(super) fn alice() -> &'static UserId { user_id!("@alice:foo") }

pub(super) fn bob() -> &'static UserId { user_id!("@bob:foo") }

pub(super) fn charlie() -> &'static UserId { user_id!("@charlie:foo") }

pub(super) fn ella() -> &'static UserId { user_id!("@ella:foo") }

pub(super) fn room_id() -> &'static RoomId { room_id!("!test:foo") }

pub(super) fn to_raw(content: JsonValue) -> Box<RawJsonValue> {
	to_raw_json_value(&content).unwrap()
}

pub(super) fn member_content(membership: &str) -> Box<RawJsonValue> {
	to_raw(json!({ "membership": membership }))
}

pub(super) fn to_pdu_event(
	id: &str,
	sender: &UserId,
	ev_type: TimelineEventType,
	state_key: Option<&str>,
	content: Box<RawJsonValue>,
) -> PduEvent {
	let ts = SERVER_TIMESTAMP.fetch_add(1, SeqCst);

	PduEvent {
		event_id: event_id(id),
		room_id: Some(room_id().to_owned()),
		sender: sender.to_owned(),
		origin_server_ts: ts.try_into().unwrap(),
		kind: ev_type,
		content,
		state_key: state_key.map(Into::into),
		redacts: None,
		outlier: false,
	}
}

/// `user` is joined (or otherwise a member) of its own accord.
pub(super) fn member(user: &UserId, membership: &str) -> PduEvent {
	to_pdu_event(
		&format!("IMA{}", user.localpart()),
		user,
		TimelineEventType::RoomMember,
		Some(user.as_str()),
		member_content(membership),
	)
}

/// A membership change of `target` made by `sender`.
pub(super) fn membership_change(sender: &UserId, target: &UserId, membership: &str) -> PduEvent {
	to_pdu_event(
		"MEMBER",
		sender,
		TimelineEventType::RoomMember,
		Some(target.as_str()),
		member_content(membership),
	)
}

pub(super) fn power_levels(sender: &UserId, content: JsonValue) -> PduEvent {
	to_pdu_event(
		"IPOWER",
		sender,
		TimelineEventType::RoomPowerLevels,
		Some(""),
		to_raw(content),
	)
}

pub(super) fn join_rules(join_rule: &str) -> PduEvent {
	to_pdu_event(
		"IJR",
		alice(),
		TimelineEventType::RoomJoinRules,
		Some(""),
		to_raw(json!({ "join_rule": join_rule })),
	)
}

pub(super) fn message(sender: &UserId) -> PduEvent {
	to_pdu_event(
		"MESSAGE",
		sender,
		TimelineEventType::RoomMessage,
		None,
		to_raw(json!({ "msgtype": "m.text", "body": "hi" })),
	)
}

pub(super) fn redaction(sender: &UserId, redacts: &str) -> PduEvent {
	PduEvent {
		redacts: Some(event_id(redacts)),
		..to_pdu_event(
			"REDACT",
			sender,
			TimelineEventType::RoomRedaction,
			None,
			to_raw(json!({})),
		)
	}
}

pub(super) fn state_map<I>(events: I) -> StateMap<PduEvent>
where
	I: IntoIterator<Item = PduEvent>,
{
	events
		.into_iter()
		.map(|event| {
			let key = event
				.event_type()
				.with_state_key(event.state_key().unwrap());

			(key, event)
		})
		.collect()
}

/// Alice created a public room, is joined, and holds level 100; everyone else
/// is at the default of zero.
pub(super) fn public_room() -> StateMap<PduEvent> {
	state_map([
		member(alice(), "join"),
		join_rules("public"),
		power_levels(alice(), json!({ "users": { alice().as_str(): 100 } })),
	])
}

pub(super) fn init_subscriber() -> tracing::dispatcher::DefaultGuard {
	tracing::subscriber::set_default(
		tracing_subscriber::fmt()
			.with_test_writer()
			.finish(),
	)
}
