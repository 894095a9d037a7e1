use std::{any::Any, sync::Arc};

use warden_core::{Config, Result};

use crate::services::{Backends, OnceServices};

/// Abstract interface for a Service
pub(crate) trait Service: Any + Send + Sync {
	/// Implement the construction of the service instance. Services are
	/// singletons so expect this to only be called once for a service type.
	/// Failure aborts startup with an error.
	fn build(args: Args<'_>) -> Result<Arc<impl Service>>
	where
		Self: Sized;

	/// Return the name of the service.
	/// i.e. `crate::service::make_name(std::module_path!())`
	fn name(&self) -> &str;
}

/// Args are passed to `Service::build` when a service is constructed. This
/// allows for arguments to change with limited impact to the many services.
pub(crate) struct Args<'a> {
	pub(crate) config: &'a Arc<Config>,
	pub(crate) backends: &'a Backends,
	pub(crate) services: &'a Arc<OnceServices>,
}

/// Utility for service implementations; see Service::name() in the trait.
#[inline]
pub(crate) fn make_name(module_path: &str) -> &str {
	module_path
		.split_once("::")
		.map_or(module_path, |(_, name)| name)
}
