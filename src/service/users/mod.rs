mod memory;
mod request;

use std::{net::IpAddr, sync::Arc};

use async_trait::async_trait;
use ruma::{OwnedDeviceId, OwnedUserId, UserId, api::client::error::ErrorKind};
use tokio::runtime::Handle;
use warden_core::{Err, Error, Result, debug, debug_warn, utils::LogDebugErr};

pub use self::{memory::MemoryUsers, request::ClientRequest};

/// Session store backing identity resolution.
#[async_trait]
pub trait Data: Send + Sync {
	/// The identity an access token was issued to, if it is known.
	async fn find_token(&self, token: &str) -> Result<Option<Identity>>;

	/// Record a client access row.
	async fn insert_client_ip(&self, row: ClientIp) -> Result;

	async fn is_server_admin(&self, user_id: &UserId) -> Result<bool>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
	pub user_id: OwnedUserId,
	pub device_id: Option<OwnedDeviceId>,
	pub is_admin: bool,
}

/// One access-log row per authenticated request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIp {
	pub user_id: OwnedUserId,
	pub access_token: String,
	pub device_id: Option<OwnedDeviceId>,
	pub ip: IpAddr,
	pub user_agent: Option<String>,
}

pub struct Service {
	db: Arc<dyn Data>,
}

impl crate::Service for Service {
	fn build(args: crate::Args<'_>) -> Result<Arc<Self>> {
		Ok(Arc::new(Self { db: args.backends.users.clone() }))
	}

	fn name(&self) -> &str { crate::service::make_name(std::module_path!()) }
}

impl Service {
	/// Find out which user an access token belongs to.
	#[tracing::instrument(level = "debug", skip_all, err(level = "debug"))]
	pub async fn find_from_token(&self, token: &str) -> Result<Identity> {
		self.db
			.find_token(token)
			.await?
			.ok_or_else(|| {
				Error::BadRequest(
					ErrorKind::UnknownToken { soft_logout: false },
					"Unrecognised access token.",
				)
			})
	}

	/// Resolve the identity behind a request's access token. When the client
	/// address is known an access row is recorded in the background; failing
	/// to record it never fails the request.
	#[tracing::instrument(level = "debug", skip_all, fields(ip = ?request.ip))]
	pub async fn find_from_request(&self, request: &ClientRequest) -> Result<Identity> {
		let Some(token) = request.access_token.as_deref() else {
			return Err!(Request(MissingToken("Missing access token.")));
		};

		let identity = self.find_from_token(token).await?;
		if let Some(ip) = request.ip {
			self.record_client_ip(ClientIp {
				user_id: identity.user_id.clone(),
				access_token: token.to_owned(),
				device_id: identity.device_id.clone(),
				ip,
				user_agent: request.user_agent.clone(),
			});
		}

		Ok(identity)
	}

	fn record_client_ip(&self, row: ClientIp) {
		let Ok(handle) = Handle::try_current() else {
			debug_warn!(user_id = %row.user_id, "No runtime to record client ip on");
			return;
		};

		let db = self.db.clone();
		handle.spawn(async move {
			debug!(user_id = %row.user_id, ip = %row.ip, "Recording client ip");
			db.insert_client_ip(row).await.log_debug_err().ok();
		});
	}

	#[inline]
	pub async fn is_server_admin(&self, user_id: &UserId) -> Result<bool> {
		self.db.is_server_admin(user_id).await
	}
}
