use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use ruma::{OwnedUserId, UserId};
use tokio::sync::RwLock;
use warden_core::{Result, trace};

use super::{ClientIp, Data, Identity};

/// Session store kept in memory.
#[derive(Default)]
pub struct MemoryUsers {
	tokens: RwLock<BTreeMap<String, Identity>>,
	admins: RwLock<BTreeSet<OwnedUserId>>,
	client_ips: RwLock<Vec<ClientIp>>,
}

impl MemoryUsers {
	#[must_use]
	pub fn new() -> Self { Self::default() }

	pub async fn set_token(&self, token: &str, identity: Identity) {
		if identity.is_admin {
			self.admins
				.write()
				.await
				.insert(identity.user_id.clone());
		}

		self.tokens
			.write()
			.await
			.insert(token.to_owned(), identity);
	}

	pub async fn client_ips(&self) -> Vec<ClientIp> { self.client_ips.read().await.clone() }
}

#[async_trait]
impl Data for MemoryUsers {
	async fn find_token(&self, token: &str) -> Result<Option<Identity>> {
		Ok(self.tokens.read().await.get(token).cloned())
	}

	async fn insert_client_ip(&self, row: ClientIp) -> Result {
		trace!(?row, "client ip");
		self.client_ips.write().await.push(row);

		Ok(())
	}

	async fn is_server_admin(&self, user_id: &UserId) -> Result<bool> {
		Ok(self.admins.read().await.contains(user_id))
	}
}
