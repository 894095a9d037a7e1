use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use warden_core::{Config, Result, err};

/// Install the global subscriber. `RUST_LOG` takes precedence over the `log`
/// option. Output goes to stderr; stdout carries results.
pub(crate) fn init(config: &Config) -> Result {
	let filter = match EnvFilter::try_from_default_env() {
		| Ok(filter) => filter,
		| Err(_) => EnvFilter::try_new(&config.log)
			.map_err(|e| err!(Config("log", "{e}")))?,
	};

	let layer = fmt::layer()
		.with_ansi(config.log_colors)
		.with_writer(io::stderr);

	tracing_subscriber::registry()
		.with(filter)
		.with(layer)
		.try_init()
		.map_err(|e| err!("Failed to install the log subscriber: {e}"))
}
