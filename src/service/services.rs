use std::{
	ops::Deref,
	sync::{Arc, OnceLock},
};

use warden_core::{Config, Result, debug_info, err, trace};

use crate::{
	auth, rooms,
	service::{Args, Service},
	users,
};

pub struct Services {
	pub auth: Arc<auth::Service>,
	pub state: Arc<rooms::state::Service>,
	pub users: Arc<users::Service>,

	pub config: Arc<Config>,
}

/// The stores the services are built over.
#[derive(Clone)]
pub struct Backends {
	pub state: Arc<dyn rooms::state::Data>,
	pub users: Arc<dyn users::Data>,
}

pub struct OnceServices {
	lock: OnceLock<Arc<Services>>,
}

impl OnceServices {
	pub fn get_services(&self) -> &Arc<Services> {
		self.lock
			.get()
			.expect("services must be initialized")
	}
}

impl Deref for OnceServices {
	type Target = Arc<Services>;

	fn deref(&self) -> &Self::Target { self.get_services() }
}

impl Services {
	pub fn build(config: Arc<Config>, backends: Backends) -> Result<Arc<Self>> {
		let services = Arc::new(OnceServices { lock: OnceLock::new() });
		macro_rules! build {
			($tyname:ty) => {
				<$tyname>::build(Args {
					config: &config,
					backends: &backends,
					services: &services,
				})?
			};
		}

		let res = Arc::new(Self {
			auth: build!(auth::Service),
			state: build!(rooms::state::Service),
			users: build!(users::Service),

			config,
		});

		services
			.lock
			.set(res.clone())
			.map_err(|_| err!("couldn't set services lock"))?;

		for service in res.services() {
			trace!("Built {}", service.name());
		}

		debug_info!("Services built.");

		Ok(res)
	}

	pub(crate) fn services(&self) -> [Arc<dyn Service>; 3] {
		[self.auth.clone(), self.state.clone(), self.users.clone()]
	}
}
