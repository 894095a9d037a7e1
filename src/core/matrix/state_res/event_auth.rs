mod room_member;

use std::collections::BTreeSet;

use ruma::{Int, RoomId, UserId, events::room::member::MembershipState};

use self::room_member::check_room_member;
use super::{
	Allowance, AuthMode, StateMap, StateMapExt, Verdict,
	events::{
		Payload, RoomMemberEvent, RoomPowerLevelsEvent,
		power_levels::{self, RoomPowerLevelsEventOptionExt, RoomPowerLevelsIntField, comparable},
	},
};
use crate::{Err, Result, debug, info, matrix::Event, trace, warn};

/// Decide whether `incoming_event` may be applied on top of `prior_state`.
///
/// `prior_state` is the resolved room state immediately before the event;
/// `None` means it is unknown, in which case the event is trusted. The
/// verdict is a pure function of its inputs.
#[tracing::instrument(
	level = "debug",
	skip_all,
	fields(
		event_id = %incoming_event.event_id(),
		sender = %incoming_event.sender(),
	)
)]
pub fn check<E: Event>(incoming_event: &E, prior_state: Option<&StateMap<E>>) -> Verdict {
	let result = check_event(incoming_event, prior_state);

	if let Err(error) = &result {
		info!(
			event_id = %incoming_event.event_id(),
			"Event auth check failed: {error}"
		);
	}

	result.into()
}

/// [`check`], surfacing a denial as the error.
#[inline]
pub fn auth_check<E: Event>(
	incoming_event: &E,
	prior_state: Option<&StateMap<E>>,
) -> Result<Allowance> {
	check(incoming_event, prior_state).into_result()
}

/// [`check`], surfacing a denial as `false`.
#[inline]
pub fn is_allowed<E: Event>(incoming_event: &E, prior_state: Option<&StateMap<E>>) -> bool {
	check(incoming_event, prior_state).is_allowed()
}

/// [`check`], surfacing a denial according to `mode`.
#[inline]
pub fn check_with_mode<E: Event>(
	incoming_event: &E,
	prior_state: Option<&StateMap<E>>,
	mode: AuthMode,
) -> Result<bool> {
	check(incoming_event, prior_state).surface(mode)
}

fn check_event<E: Event>(
	incoming_event: &E,
	prior_state: Option<&StateMap<E>>,
) -> Result<Allowance> {
	let Some(room_id) = incoming_event.room_id() else {
		return Err!("Unknown event: {} is not bound to a room", incoming_event.event_id());
	};

	let Some(state) = prior_state else {
		warn!("Trusting event: {}", incoming_event.event_id());
		return Ok(Allowance::Trusted);
	};

	if incoming_event.is_outlier() {
		trace!("allowing outlier");
		return Ok(Allowance::Outlier);
	}

	let payload = Payload::new(incoming_event.clone());
	let room_power_levels_event = state.room_power_levels_event();

	if !payload.is_create() {
		check_send_level(incoming_event, room_power_levels_event.as_ref())?;
	}

	match payload {
		| Payload::Create => {
			trace!("allowing `m.room.create` event");
			Ok(Allowance::Create)
		},
		| Payload::Member(room_member_event) => {
			check_room_member(
				&room_member_event,
				room_id,
				state,
				room_power_levels_event.as_ref(),
			)?;

			Ok(Allowance::Policy)
		},
		| Payload::PowerLevels(new_room_power_levels_event) => {
			let sender_power_level = room_power_levels_event
				.as_ref()
				.user_power_level(incoming_event.sender())?;

			check_room_power_levels(
				&new_room_power_levels_event,
				room_power_levels_event.as_ref(),
				sender_power_level,
			)?;

			Ok(Allowance::Policy)
		},
		| Payload::Redaction(room_redaction_event) => {
			check_room_redaction(&room_redaction_event, room_power_levels_event.as_ref())?;
			Ok(Allowance::Policy)
		},
		| Payload::Other => {
			trace!("allowing event passed all checks");
			Ok(Allowance::Policy)
		},
	}
}

/// Check that the sender's level reaches the level required to send an event
/// of this type.
#[tracing::instrument(level = "trace", skip_all)]
pub fn check_send_level<E: Event>(
	incoming_event: &E,
	room_power_levels_event: Option<&RoomPowerLevelsEvent<E>>,
) -> Result {
	let send_level = room_power_levels_event
		.event_power_level(incoming_event.event_type(), incoming_event.state_key())?;

	let user_level =
		comparable(room_power_levels_event.user_power_level(incoming_event.sender())?);

	if user_level < send_level {
		return Err!(Request(Forbidden(
			"You don't have permission to post that to the room. user_level ({user_level}) < \
			 send_level ({send_level})"
		)));
	}

	Ok(())
}

/// Check whether the given event passes the `m.room.power_levels`
/// authorization rules.
///
/// The content is validated first; then, when the room already has power
/// levels, every changed value (old or new) must be within the sender's own
/// level. Unchanged values are never rejected.
#[tracing::instrument(level = "trace", skip_all)]
pub fn check_room_power_levels<E: Event>(
	room_power_levels_event: &RoomPowerLevelsEvent<E>,
	current_room_power_levels_event: Option<&RoomPowerLevelsEvent<E>>,
	sender_power_level: Option<Int>,
) -> Result {
	let new_int_fields = room_power_levels_event.int_fields_map()?;
	let new_events = room_power_levels_event.events()?;
	room_power_levels_event.users()?;
	let new_users = room_power_levels_event.user_levels()?;

	trace!("validation of power event finished");

	let Some(current_room_power_levels_event) = current_room_power_levels_event else {
		trace!("initial m.room.power_levels event allowed");
		return Ok(());
	};

	let sender_power_level = comparable(sender_power_level);
	for field in RoomPowerLevelsIntField::GUARDED {
		let current_power_level = current_room_power_levels_event.get_as_int(*field)?;
		let new_power_level = power_levels::get_value(&new_int_fields, field).copied();

		if !level_change_allowed(current_power_level, new_power_level, sender_power_level) {
			debug!(%field, ?current_power_level, ?new_power_level, "power level change refused");
			return Err!(Request(Forbidden(
				"You don't have permission to add ops level greater than your own"
			)));
		}
	}

	let current_events = current_room_power_levels_event.events()?;
	check_power_level_maps(current_events.as_deref(), new_events.as_deref(), sender_power_level)?;

	let current_users = current_room_power_levels_event.user_levels()?;
	check_power_level_maps(current_users.as_deref(), new_users.as_deref(), sender_power_level)?;

	trace!("m.room.power_levels event allowed");
	Ok(())
}

/// Check the power level changes between the current and the new maps, for
/// every key present in either.
fn check_power_level_maps<K>(
	current: Option<&[(K, Int)]>,
	new: Option<&[(K, Int)]>,
	sender_power_level: Int,
) -> Result
where
	K: Ord + std::fmt::Debug,
{
	let keys_to_check: BTreeSet<&K> = current
		.into_iter()
		.chain(new)
		.flat_map(|m| m.iter().map(|(k, _)| k))
		.collect();

	for key in keys_to_check {
		let current_power_level = current
			.and_then(|m| power_levels::get_value(m, key))
			.copied();

		let new_power_level = new
			.and_then(|m| power_levels::get_value(m, key))
			.copied();

		if !level_change_allowed(current_power_level, new_power_level, sender_power_level) {
			debug!(?key, ?current_power_level, ?new_power_level, "power level change refused");
			return Err!(Request(Forbidden(
				"You don't have permission to add ops level greater than your own"
			)));
		}
	}

	Ok(())
}

/// An unchanged value is always allowed, absent counting as its own value.
/// Otherwise neither the old nor the new value may exceed the sender's level.
#[inline]
fn level_change_allowed(current: Option<Int>, new: Option<Int>, sender_power_level: Int) -> bool {
	current == new
		|| !current
			.into_iter()
			.chain(new)
			.any(|power_level| power_level > sender_power_level)
}

/// Check whether the given event passes the `m.room.redaction` authorization
/// rules.
#[tracing::instrument(level = "trace", skip_all)]
pub fn check_room_redaction<E: Event>(
	room_redaction_event: &E,
	room_power_levels_event: Option<&RoomPowerLevelsEvent<E>>,
) -> Result {
	let user_level =
		comparable(room_power_levels_event.user_power_level(room_redaction_event.sender())?);

	let (_, _, redact_level) = room_power_levels_event.thresholds()?;

	if user_level < redact_level {
		return Err!(Request(Forbidden("You don't have permission to redact events")));
	}

	trace!("`m.room.redaction` event allowed via power levels");
	Ok(())
}

/// Check that the sender of `incoming_event` is joined according to `state`.
pub fn check_event_sender_in_room<E: Event>(incoming_event: &E, state: &StateMap<E>) -> Result {
	let Some(room_id) = incoming_event.room_id() else {
		return Err!("Unknown event: {} is not bound to a room", incoming_event.event_id());
	};

	let sender = incoming_event.sender();
	check_joined_room(state.room_member_event(sender), room_id, sender).map(|_| ())
}

/// Check that `member`, the `m.room.member` event of `user_id`, is a join;
/// returns it when it is.
pub fn check_joined_room<E: Event>(
	member: Option<RoomMemberEvent<E>>,
	room_id: &RoomId,
	user_id: &UserId,
) -> Result<RoomMemberEvent<E>> {
	let membership = member
		.as_ref()
		.map(RoomMemberEvent::membership)
		.transpose()?;

	match member {
		| Some(member) if membership == Some(MembershipState::Join) => Ok(member),
		| _ => Err!(Request(Forbidden(
			"User {user_id} not in room {room_id} ({})",
			membership.as_ref().map_or("none", MembershipState::as_str)
		))),
	}
}
