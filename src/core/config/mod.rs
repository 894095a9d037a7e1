use std::{collections::BTreeMap, path::Path};

use figment::{
	Figment,
	providers::{Env, Format, Toml},
};
use serde::{Deserialize, de::IgnoredAny};

use crate::{Err, Result, err, warn};

/// All the config options for warden.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	/// Tracing filter directives, e.g. `warn,warden_core=debug`. The
	/// `RUST_LOG` environment variable takes precedence when set.
	///
	/// default: "info"
	#[serde(default = "default_log")]
	pub log: String,

	/// Whether log output uses ANSI colours.
	///
	/// default: true
	#[serde(default = "true_fn")]
	pub log_colors: bool,

	/// Whether event authorization surfaces denials as errors rather than as
	/// `false`. Callers may still choose either mode per call.
	///
	/// default: false
	#[serde(default)]
	pub strict_auth: bool,

	#[serde(flatten)]
	#[allow(clippy::zero_sized_map_values)]
	catchall: BTreeMap<String, IgnoredAny>,
}

const ENV_CONFIG: &str = "WARDEN_CONFIG";
const ENV_PREFIX: &str = "WARDEN_";

impl Config {
	/// Pre-initialize config
	pub fn load<'a, I>(paths: I) -> Result<Figment>
	where
		I: Iterator<Item = &'a Path>,
	{
		let envs = [Env::var(ENV_CONFIG)];

		let config = envs
			.into_iter()
			.flatten()
			.map(Toml::file)
			.chain(paths.map(Toml::file))
			.fold(Figment::new(), |config, file| config.merge(file))
			.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

		Ok(config)
	}

	/// Finalize config
	pub fn new(raw_config: &Figment) -> Result<Self> {
		let config = raw_config
			.extract::<Self>()
			.map_err(|e| err!("There was a problem with your configuration file: {e}"))?;

		config.check()?;

		Ok(config)
	}

	fn check(&self) -> Result {
		if self.log.trim().is_empty() {
			return Err!(Config("log", "The log filter must not be empty."));
		}

		for key in self.catchall.keys() {
			warn!("Config parameter \"{key}\" is unknown to warden, ignoring.");
		}

		Ok(())
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log: default_log(),
			log_colors: true,
			strict_auth: false,
			catchall: BTreeMap::new(),
		}
	}
}

fn default_log() -> String { "info".to_owned() }

fn true_fn() -> bool { true }
