use std::{fmt, path::Path, sync::Arc};

use serde::de::DeserializeOwned;
use warden_core::{
	Config, Error, Event, PduEvent, Result, debug, info,
	state_res::{Allowance, AuthMode},
};
use warden_service::{
	Backends, Services,
	rooms::state::MemoryState,
	users::MemoryUsers,
};

/// What `warden check` reports.
#[derive(Debug)]
pub(crate) enum Outcome {
	Allowed(Allowance),

	/// Denied in lenient mode; the reason only reaches the log.
	Denied,

	/// Denied in strict mode.
	Rejected(Error),
}

impl Outcome {
	#[must_use]
	pub(crate) fn is_allowed(&self) -> bool { matches!(self, Self::Allowed(_)) }
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			| Self::Allowed(allowance) => write!(f, "allowed ({allowance})"),
			| Self::Denied => write!(f, "denied"),
			| Self::Rejected(error) =>
				write!(f, "denied {}: {}", error.status_code().as_u16(), error.message()),
		}
	}
}

pub(crate) async fn run(
	config: Arc<Config>,
	event: &Path,
	state: Option<&Path>,
	strict: bool,
) -> Result<Outcome> {
	let event: PduEvent = read_json(event).await?;
	let state: Option<Vec<PduEvent>> = match state {
		| Some(path) => Some(read_json(path).await?),
		| None => None,
	};

	decide(config, event, state, strict.then_some(AuthMode::Strict)).await
}

/// Authorize `event` through the services against `state`, the state events
/// before it. `None` state is unknown state. `mode` overrides the configured
/// one.
pub(crate) async fn decide(
	config: Arc<Config>,
	event: PduEvent,
	state: Option<Vec<PduEvent>>,
	mode: Option<AuthMode>,
) -> Result<Outcome> {
	let store = Arc::new(MemoryState::new());
	if let Some(state) = state {
		if let Some(room_id) = event.room_id() {
			store.create_room(room_id).await;
		}

		debug!(len = state.len(), "Loading state");
		store.extend(state).await?;
	}

	let backends = Backends {
		state: store,
		users: Arc::new(MemoryUsers::new()),
	};

	let services = Services::build(config, backends)?;
	let mode = mode.unwrap_or_else(|| services.auth.mode());

	let verdict = services.auth.verdict(&event).await?;
	let allowance = match verdict.into_result() {
		| Ok(allowance) => allowance,
		| Err(error) => {
			info!(event_id = %event.event_id, ?mode, "Denied");
			return Ok(match mode {
				| AuthMode::Lenient => Outcome::Denied,
				| AuthMode::Strict => Outcome::Rejected(error),
			});
		},
	};

	Ok(Outcome::Allowed(allowance))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let bytes = tokio::fs::read(path).await?;

	Ok(serde_json::from_slice(&bytes)?)
}
