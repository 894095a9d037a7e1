#[cfg(test)]
mod tests;

use std::sync::Arc;

use futures::future::join_all;
use ruma::{RoomId, UserId};
use warden_core::{
	PduEvent, Result, debug,
	state_res::{self, AuthMode, Verdict, event_auth, events::RoomMemberEvent},
	utils::LogErr,
};

use crate::{
	services::OnceServices,
	users::{ClientRequest, Identity},
};

/// Authorizes events against the room state the state store holds before
/// them.
pub struct Service {
	services: Arc<OnceServices>,
	mode: AuthMode,
}

impl crate::Service for Service {
	fn build(args: crate::Args<'_>) -> Result<Arc<Self>> {
		Ok(Arc::new(Self {
			services: args.services.clone(),
			mode: args.config.strict_auth.into(),
		}))
	}

	fn name(&self) -> &str { crate::service::make_name(std::module_path!()) }
}

impl Service {
	/// Full decision for one event. Errors only when the state store fails.
	#[tracing::instrument(
		name = "auth",
		level = "debug",
		skip_all,
		fields(event_id = %event.event_id)
	)]
	pub async fn verdict(&self, event: &PduEvent) -> Result<Verdict> {
		let state = self
			.services
			.state
			.state_before(event)
			.await
			.log_err()?;

		Ok(state_res::check(event, state.as_ref()))
	}

	/// Decide in the configured mode.
	#[inline]
	pub async fn check_event(&self, event: &PduEvent) -> Result<bool> {
		self.check_event_with_mode(event, self.mode).await
	}

	pub async fn check_event_with_mode(&self, event: &PduEvent, mode: AuthMode) -> Result<bool> {
		self.verdict(event).await?.surface(mode)
	}

	/// Decide a batch of independent events concurrently, in the configured
	/// mode. Results are in the order of `events`.
	pub async fn check_events<'a, I>(&self, events: I) -> Vec<Result<bool>>
	where
		I: IntoIterator<Item = &'a PduEvent>,
	{
		join_all(events.into_iter().map(|event| self.check_event(event))).await
	}

	/// The persisted membership of `user_id` in `room_id`, provided it is a
	/// join.
	pub async fn check_joined_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<PduEvent> {
		let member = self
			.services
			.state
			.room_member(room_id, user_id)
			.await?
			.map(RoomMemberEvent::new);

		event_auth::check_joined_room(member, room_id, user_id).map(RoomMemberEvent::into_inner)
	}

	/// Whether the sender of `event` is joined to its room in the state before
	/// it. Unknown state is trusted.
	pub async fn check_event_sender_in_room(&self, event: &PduEvent) -> Result {
		match self.services.state.state_before(event).await? {
			| Some(state) => state_res::check_event_sender_in_room(event, &state),
			| None => {
				debug!(event_id = %event.event_id, "No state to check sender against");
				Ok(())
			},
		}
	}

	/// Resolve who is behind a client request.
	#[inline]
	pub async fn identify(&self, request: &ClientRequest) -> Result<Identity> {
		self.services.users.find_from_request(request).await
	}

	#[inline]
	pub async fn is_server_admin(&self, user_id: &UserId) -> Result<bool> {
		self.services.users.is_server_admin(user_id).await
	}

	#[inline]
	#[must_use]
	pub fn mode(&self) -> AuthMode { self.mode }
}
