use std::{collections::BTreeMap, fs, path::Path};

use serde_json::from_str as from_json_str;
use tracing_subscriber::EnvFilter;
use warden_core::{
	Event, EventTypeExt, Pdu, StateMap,
	http::StatusCode,
	state_res::{Allowance, Verdict, check},
};

/// Create a new authorization test.
///
/// # Arguments
///
/// * The test function's name.
/// * The fixture holding the prior state, relative to `tests/it/fixtures`, or
///   `None` for unknown state.
/// * The name of the event in `tests/it/fixtures/events.json`.
/// * The expected outcome.
macro_rules! auth_test {
	($name:ident, $state:expr, $event:literal, $expected:expr $(,)?) => {
		#[test]
		fn $name() {
			let (state, event) = crate::event_auth::prelude($state, $event);
			let outcome = crate::event_auth::outcome(&event, state.as_ref());
			assert_eq!(outcome, $expected, "{}", $event);
		}
	};
}

#[derive(Debug, Eq, PartialEq)]
enum Outcome {
	Allowed(Allowance),
	Denied(StatusCode),
}

fn prelude(state: Option<&str>, event: &str) -> (Option<StateMap<Pdu>>, Pdu) {
	// Run `cargo test -- --show-output` to view traces, set `RUST_LOG` to control
	// filtering.
	let subscriber = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.finish();

	tracing::subscriber::set_global_default(subscriber).ok();

	let fixtures_path = Path::new("tests/it/fixtures");

	let state = state.map(|path| {
		let pdus: Vec<Pdu> = from_json_str(
			&fs::read_to_string(fixtures_path.join(path))
				.expect("should be able to read JSON file of PDUs"),
		)
		.expect("should be able to deserialize JSON file of PDUs");

		pdus.into_iter()
			.map(|pdu| {
				let state_key = pdu
					.state_key()
					.expect("state fixtures contain only state events");

				(pdu.event_type().with_state_key(state_key), pdu)
			})
			.collect()
	});

	let mut events: BTreeMap<String, Pdu> = from_json_str(
		&fs::read_to_string(fixtures_path.join("events.json"))
			.expect("should be able to read JSON file of events"),
	)
	.expect("should be able to deserialize JSON file of events");

	let event = events
		.remove(event)
		.expect("event should be in events.json");

	(state, event)
}

fn outcome(event: &Pdu, state: Option<&StateMap<Pdu>>) -> Outcome {
	match check(event, state) {
		| Verdict::Allowed(allowance) => Outcome::Allowed(allowance),
		| Verdict::Denied(error) => Outcome::Denied(error.status_code()),
	}
}

auth_test!(
	room_admin_bans,
	Some("public-room.json"),
	"alice-bans-bob",
	Outcome::Allowed(Allowance::Policy),
);

auth_test!(
	default_level_cannot_ban,
	Some("public-room.json"),
	"carol-bans-bob",
	Outcome::Denied(StatusCode::FORBIDDEN),
);

auth_test!(
	public_room_admits_stranger,
	Some("public-room.json"),
	"dave-joins-public",
	Outcome::Allowed(Allowance::Policy),
);

auth_test!(
	invite_room_refuses_stranger,
	Some("invite-room.json"),
	"dave-joins-invite",
	Outcome::Denied(StatusCode::FORBIDDEN),
);

auth_test!(
	power_above_own_level_is_refused,
	Some("levels-room.json"),
	"eve-raises-events-default",
	Outcome::Denied(StatusCode::FORBIDDEN),
);

auth_test!(
	power_within_own_level_is_granted,
	Some("levels-room.json"),
	"frank-raises-events-default",
	Outcome::Allowed(Allowance::Policy),
);

auth_test!(
	unchanged_power_levels_are_granted,
	Some("levels-room.json"),
	"eve-resubmits-power-levels",
	Outcome::Allowed(Allowance::Policy),
);

auth_test!(
	unknown_state_is_trusted,
	None,
	"dave-joins-invite",
	Outcome::Allowed(Allowance::Trusted),
);

auth_test!(
	outlier_is_not_judged,
	Some("invite-room.json"),
	"dave-joins-invite-as-outlier",
	Outcome::Allowed(Allowance::Outlier),
);

auth_test!(
	redaction_below_redact_level_is_refused,
	Some("public-room.json"),
	"bob-redacts",
	Outcome::Denied(StatusCode::FORBIDDEN),
);

auth_test!(
	event_without_room_is_structural,
	None,
	"roomless",
	Outcome::Denied(StatusCode::INTERNAL_SERVER_ERROR),
);
