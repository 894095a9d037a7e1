use std::sync::Arc;

use figment::{
	Figment,
	providers::{Format, Toml},
};
use http::StatusCode;
use ruma::{room_id, user_id};
use serde_json::{Value as JsonValue, json};
use warden_core::{
	Config, PduEvent,
	state_res::{Allowance, AuthMode, Verdict},
};

use crate::{
	Backends, Services,
	rooms::state::MemoryState,
	users::{ClientRequest, Identity, MemoryUsers},
};

fn pdu(value: JsonValue) -> PduEvent {
	serde_json::from_str(&value.to_string()).expect("valid event")
}

fn state_event(id: &str, sender: &str, kind: &str, state_key: &str, content: JsonValue) -> PduEvent {
	pdu(json!({
		"event_id": format!("${id}:foo"),
		"room_id": "!room:foo",
		"sender": sender,
		"type": kind,
		"state_key": state_key,
		"content": content,
	}))
}

fn message(id: &str, sender: &str) -> PduEvent {
	pdu(json!({
		"event_id": format!("${id}:foo"),
		"room_id": "!room:foo",
		"sender": sender,
		"type": "m.room.message",
		"content": { "msgtype": "m.text", "body": "hi" },
	}))
}

/// `!room:foo`: public, alice joined at level 100, bob invited, sending
/// anyone may change their membership, sending messages needs level 10.
async fn services(strict: bool) -> (Arc<Services>, Arc<MemoryUsers>) {
	let state = Arc::new(MemoryState::new());
	state
		.extend([
			state_event("alice", "@alice:foo", "m.room.member", "@alice:foo", json!({ "membership": "join" })),
			state_event("bob", "@alice:foo", "m.room.member", "@bob:foo", json!({ "membership": "invite" })),
			state_event("rules", "@alice:foo", "m.room.join_rules", "", json!({ "join_rule": "public" })),
			state_event(
				"levels",
				"@alice:foo",
				"m.room.power_levels",
				"",
				json!({
					"users": { "@alice:foo": 100 },
					"events": { "m.room.member": 0, "m.room.message": 10 },
				}),
			),
		])
		.await
		.expect("state loaded");

	let users = Arc::new(MemoryUsers::new());
	let raw = Figment::new().merge(Toml::string(&format!("strict_auth = {strict}")));
	let config = Arc::new(Config::new(&raw).expect("valid config"));
	let backends = Backends { state, users: users.clone() };
	let services = Services::build(config, backends).expect("services built");

	(services, users)
}

#[tokio::test]
async fn verdict_uses_stored_state() {
	let (services, _) = services(false).await;

	let verdict = services
		.auth
		.verdict(&message("m1", "@alice:foo"))
		.await
		.expect("state store ok");

	assert!(
		matches!(verdict, Verdict::Allowed(Allowance::Policy)),
		"{verdict:?}"
	);
}

#[tokio::test]
async fn unknown_room_is_trusted() {
	let (services, _) = services(false).await;
	let mut event = message("m2", "@mallory:evil");
	event.room_id = Some(room_id!("!elsewhere:foo").to_owned());

	let verdict = services
		.auth
		.verdict(&event)
		.await
		.expect("state store ok");

	assert!(
		matches!(verdict, Verdict::Allowed(Allowance::Trusted)),
		"{verdict:?}"
	);
}

#[tokio::test]
async fn lenient_mode_denies_with_false() {
	let (services, _) = services(false).await;
	assert_eq!(services.auth.mode(), AuthMode::Lenient);

	let allowed = services
		.auth
		.check_event(&message("m3", "@bob:foo"))
		.await
		.expect("lenient mode never errors on denial");

	assert!(!allowed, "bob is below the send level");
}

#[tokio::test]
async fn strict_mode_denies_with_error() {
	let (services, _) = services(true).await;
	assert_eq!(services.auth.mode(), AuthMode::Strict);

	let error = services
		.auth
		.check_event(&message("m4", "@bob:foo"))
		.await
		.expect_err("strict mode surfaces the denial");

	assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
	assert!(error.message().contains("send_level (10)"), "{error:?}");

	let allowed = services
		.auth
		.check_event_with_mode(&message("m5", "@bob:foo"), AuthMode::Lenient)
		.await
		.expect("mode chosen per call");

	assert!(!allowed, "still denied");
}

#[tokio::test]
async fn batch_preserves_order() {
	let (services, _) = services(false).await;
	let events = [
		message("b1", "@alice:foo"),
		message("b2", "@bob:foo"),
		state_event("b3", "@bob:foo", "m.room.member", "@bob:foo", json!({ "membership": "join" })),
	];

	let results: Vec<bool> = services
		.auth
		.check_events(&events)
		.await
		.into_iter()
		.map(|result| result.expect("lenient"))
		.collect();

	assert_eq!(results, [true, false, true]);
}

#[tokio::test]
async fn joined_room_membership() {
	let (services, _) = services(false).await;
	let room_id = room_id!("!room:foo");

	let member = services
		.auth
		.check_joined_room(room_id, user_id!("@alice:foo"))
		.await
		.expect("alice is joined");

	assert_eq!(member.state_key.as_deref(), Some("@alice:foo"));

	let error = services
		.auth
		.check_joined_room(room_id, user_id!("@bob:foo"))
		.await
		.expect_err("bob is only invited");

	assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
	assert_eq!(error.message(), "User @bob:foo not in room !room:foo (invite)");

	let error = services
		.auth
		.check_joined_room(room_id, user_id!("@ella:foo"))
		.await
		.expect_err("ella never joined");

	assert!(error.message().ends_with("(none)"), "{error:?}");
}

#[tokio::test]
async fn sender_in_room() {
	let (services, _) = services(false).await;

	services
		.auth
		.check_event_sender_in_room(&message("s1", "@alice:foo"))
		.await
		.expect("alice is joined");

	let error = services
		.auth
		.check_event_sender_in_room(&message("s2", "@bob:foo"))
		.await
		.expect_err("bob is not joined");

	assert!(error.is_forbidden(), "{error:?}");
}

#[tokio::test]
async fn identify_and_admin() {
	let (services, users) = services(false).await;
	users
		.set_token("secret", Identity {
			user_id: user_id!("@alice:foo").to_owned(),
			device_id: None,
			is_admin: true,
		})
		.await;

	let request = ClientRequest {
		access_token: Some("secret".to_owned()),
		..ClientRequest::default()
	};

	let identity = services
		.auth
		.identify(&request)
		.await
		.expect("known token");

	assert_eq!(identity.user_id, user_id!("@alice:foo"));
	assert!(
		services
			.auth
			.is_server_admin(&identity.user_id)
			.await
			.expect("lookup"),
		"alice is an admin"
	);
}

#[tokio::test]
async fn service_names() {
	let (services, _) = services(false).await;
	let names: Vec<String> = services
		.services()
		.iter()
		.map(|service| service.name().to_owned())
		.collect();

	assert_eq!(names, ["auth", "rooms::state", "users"]);
}
