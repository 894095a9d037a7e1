use std::collections::BTreeMap;

use async_trait::async_trait;
use ruma::{OwnedRoomId, RoomId, UserId, events::StateEventType};
use tokio::sync::RwLock;
use warden_core::{Err, Event, EventTypeExt, PduEvent, Result, StateMap, debug};

use super::Data;

/// Room state kept in memory: the current state of each room, which is the
/// state before whatever event comes next.
#[derive(Default)]
pub struct MemoryState {
	rooms: RwLock<BTreeMap<OwnedRoomId, StateMap<PduEvent>>>,
}

impl MemoryState {
	#[must_use]
	pub fn new() -> Self { Self::default() }

	/// Make the state of `room_id` known, and empty until state is inserted.
	pub async fn create_room(&self, room_id: &RoomId) {
		self.rooms
			.write()
			.await
			.entry(room_id.to_owned())
			.or_default();
	}

	/// Apply a state event to the current state of its room.
	pub async fn insert(&self, pdu: PduEvent) -> Result {
		let Some(room_id) = pdu.room_id.clone() else {
			return Err!("Event {} is not bound to a room", pdu.event_id);
		};

		let Some(state_key) = pdu.state_key.clone() else {
			return Err!("Event {} is not a state event", pdu.event_id);
		};

		debug!(%room_id, event_id = %pdu.event_id, kind = %pdu.kind, "inserting state");
		let key = pdu.event_type().with_state_key(state_key);
		self.rooms
			.write()
			.await
			.entry(room_id)
			.or_default()
			.insert(key, pdu);

		Ok(())
	}

	/// Apply each state event in order.
	pub async fn extend<I>(&self, pdus: I) -> Result
	where
		I: IntoIterator<Item = PduEvent> + Send,
		I::IntoIter: Send,
	{
		for pdu in pdus {
			self.insert(pdu).await?;
		}

		Ok(())
	}
}

#[async_trait]
impl Data for MemoryState {
	async fn state_before(&self, event: &PduEvent) -> Result<Option<StateMap<PduEvent>>> {
		let Some(room_id) = event.room_id() else {
			return Ok(None);
		};

		Ok(self.rooms.read().await.get(room_id).cloned())
	}

	async fn room_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<Option<PduEvent>> {
		let key = StateEventType::RoomMember.with_state_key(user_id.as_str());

		Ok(self
			.rooms
			.read()
			.await
			.get(room_id)
			.and_then(|state| state.get(&key))
			.cloned())
	}
}
