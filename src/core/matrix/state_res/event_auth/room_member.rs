use ruma::{RoomId, UserId, events::room::member::MembershipState};

use super::super::{
	StateMap, StateMapExt,
	events::{
		JoinRule, RoomMemberEvent, RoomPowerLevelsEvent, RoomPowerLevelsEventOptionExt,
		power_levels::comparable,
	},
};
use crate::{Err, Result, debug, matrix::Event, trace};

/// Check whether the given event passes the `m.room.member` authorization
/// rules.
///
/// The caller is the sender and the target is the state key. Both are judged
/// by their membership in `state`; only `join` counts as being in the room.
#[tracing::instrument(
	name = "member",
	level = "debug",
	skip_all,
	fields(
		target = ?room_member_event.state_key(),
	)
)]
pub(super) fn check_room_member<E: Event>(
	room_member_event: &RoomMemberEvent<E>,
	room_id: &RoomId,
	state: &StateMap<E>,
	room_power_levels_event: Option<&RoomPowerLevelsEvent<E>>,
) -> Result {
	let sender = room_member_event.sender();
	let target = room_member_event.target()?;
	let membership = room_member_event.membership()?;

	let caller_in_room = state.user_membership(sender)? == Some(MembershipState::Join);
	let target_in_room = state.user_membership(target)? == Some(MembershipState::Join);

	debug!(
		caller_in_room,
		target_in_room,
		%membership,
		%target,
		%sender,
		"is_membership_change_allowed"
	);

	match membership {
		| MembershipState::Invite => check_invite(room_id, target, caller_in_room, target_in_room),
		| MembershipState::Join => check_join(sender, target, state.join_rule()?, caller_in_room),
		| MembershipState::Leave => check_leave(
			room_id,
			sender,
			target,
			caller_in_room,
			room_power_levels_event,
		),
		| MembershipState::Ban => check_ban(sender, room_power_levels_event),
		| _ => Err!("Unknown membership {membership}"),
	}
}

/// Invites are valid iff the caller is in the room and the target is not.
fn check_invite(
	room_id: &RoomId,
	target: &UserId,
	caller_in_room: bool,
	target_in_room: bool,
) -> Result {
	if !caller_in_room {
		return Err!(Request(Forbidden("You are not in room {room_id}.")));
	}

	if target_in_room {
		return Err!(Request(Forbidden("{target} is already in the room.")));
	}

	trace!("invite allowed");
	Ok(())
}

/// Joins are only ever made by the user joining. An `invite` room admits a
/// caller who is already in it, which makes a repeated join a no-op. The join
/// rule matters to joins alone.
fn check_join(
	sender: &UserId,
	target: &UserId,
	join_rule: JoinRule,
	caller_in_room: bool,
) -> Result {
	if sender != target {
		return Err!(Request(Forbidden("Cannot force another user to join.")));
	}

	match join_rule {
		| JoinRule::Public => {},
		| JoinRule::Invite if caller_in_room => {},
		| JoinRule::Invite => {
			return Err!(Request(Forbidden("You are not invited to this room.")));
		},
		| JoinRule::Private | JoinRule::Other => {
			return Err!(Request(Forbidden("You are not allowed to join this room")));
		},
	}

	trace!(%join_rule, "join allowed");
	Ok(())
}

/// Leaving needs the caller in the room; making someone else leave is a kick.
fn check_leave<E: Event>(
	room_id: &RoomId,
	sender: &UserId,
	target: &UserId,
	caller_in_room: bool,
	room_power_levels_event: Option<&RoomPowerLevelsEvent<E>>,
) -> Result {
	if !caller_in_room {
		return Err!(Request(Forbidden("You are not in room {room_id}.")));
	}

	if sender != target {
		let user_level = comparable(room_power_levels_event.user_power_level(sender)?);
		let (_, kick_level, _) = room_power_levels_event.thresholds()?;

		if user_level < kick_level {
			return Err!(Request(Forbidden("You cannot kick user {target}.")));
		}
	}

	trace!("leave allowed");
	Ok(())
}

fn check_ban<E: Event>(
	sender: &UserId,
	room_power_levels_event: Option<&RoomPowerLevelsEvent<E>>,
) -> Result {
	let user_level = comparable(room_power_levels_event.user_power_level(sender)?);
	let (ban_level, ..) = room_power_levels_event.thresholds()?;

	if user_level < ban_level {
		return Err!(Request(Forbidden("You don't have permission to ban")));
	}

	trace!("ban allowed");
	Ok(())
}
