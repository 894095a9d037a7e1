mod memory;

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use ruma::{RoomId, UserId};
use warden_core::{PduEvent, Result, StateMap, trace};

pub use self::memory::MemoryState;

/// Snapshot provider for room state.
#[async_trait]
pub trait Data: Send + Sync {
	/// The resolved room state immediately before `event`; `None` when the
	/// store cannot tell.
	async fn state_before(&self, event: &PduEvent) -> Result<Option<StateMap<PduEvent>>>;

	/// The persisted `m.room.member` event of `user_id` in `room_id`, if any.
	async fn room_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<Option<PduEvent>>;
}

pub struct Service {
	db: Arc<dyn Data>,
}

impl crate::Service for Service {
	fn build(args: crate::Args<'_>) -> Result<Arc<Self>> {
		Ok(Arc::new(Self { db: args.backends.state.clone() }))
	}

	fn name(&self) -> &str { crate::service::make_name(std::module_path!()) }
}

impl Service {
	#[tracing::instrument(level = "debug", skip_all, fields(event_id = %event.event_id))]
	pub async fn state_before(&self, event: &PduEvent) -> Result<Option<StateMap<PduEvent>>> {
		let state = self.db.state_before(event).await?;
		trace!(known = state.is_some(), len = state.as_ref().map_or(0, BTreeMap::len));

		Ok(state)
	}

	#[inline]
	pub async fn room_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<Option<PduEvent>> {
		self.db.room_member(room_id, user_id).await
	}
}
