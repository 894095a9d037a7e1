mod check;
mod clap;
mod logging;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use warden_core::{Config, Result, debug};

use crate::clap::Command;

#[tokio::main]
async fn main() -> ExitCode {
	match run().await {
		| Ok(true) => ExitCode::SUCCESS,
		| Ok(false) => ExitCode::FAILURE,
		| Err(error) => {
			eprintln!("error: {error}");
			ExitCode::from(2)
		},
	}
}

async fn run() -> Result<bool> {
	let args = clap::parse();
	let paths = args.config.iter().flatten().map(PathBuf::as_path);
	let raw_config = clap::update(Config::load(paths)?, &args)?;
	let config = Arc::new(Config::new(&raw_config)?);

	logging::init(&config)?;
	debug!(?config, "Configuration loaded");

	match args.command {
		| Command::Check { event, state, strict } => {
			let outcome = check::run(config, &event, state.as_deref(), strict).await?;
			println!("{outcome}");

			Ok(outcome.is_allowed())
		},
	}
}
