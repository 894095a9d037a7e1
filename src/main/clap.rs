//! Integration with `clap`

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use figment::{
	Figment,
	providers::{Format, Toml},
};
use warden_core::{Err, Result, err};

/// Commandline arguments
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None, name = "warden")]
pub(crate) struct Args {
	/// Path to the config TOML file (optional)
	#[arg(short, long, global = true)]
	pub(crate) config: Option<Vec<PathBuf>>,

	/// Override a configuration variable using TOML 'key=value' syntax
	#[arg(long, short('O'), global = true)]
	pub(crate) option: Vec<String>,

	#[command(subcommand)]
	pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
	/// Authorize an event against the room state before it.
	Check {
		/// JSON file holding the event.
		#[arg(long)]
		event: PathBuf,

		/// JSON file holding the list of state events before the event. When
		/// omitted the state is unknown and the event is trusted.
		#[arg(long)]
		state: Option<PathBuf>,

		/// Report why an event is denied instead of only that it is.
		#[arg(long)]
		strict: bool,
	},
}

/// Parse commandline arguments into structured data
#[must_use]
pub(crate) fn parse() -> Args { Args::parse() }

/// Synthesize any command line options with configuration file options.
pub(crate) fn update(mut config: Figment, args: &Args) -> Result<Figment> {
	for option in &args.option {
		let (key, val) = option
			.split_once('=')
			.ok_or_else(|| err!("Missing '=' in -O/--option: {option:?}"))?;

		if key.trim().is_empty() {
			return Err!("Missing key= in -O/--option: {option:?}");
		}

		if val.trim().is_empty() {
			return Err!("Missing =val in -O/--option: {option:?}");
		}

		// The value has to pass for what would appear as a line in the TOML file.
		config = config.merge(Toml::string(option));
	}

	Ok(config)
}
