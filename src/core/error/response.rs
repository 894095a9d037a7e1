use http::StatusCode;
use ruma::api::client::error::ErrorKind;

pub(super) fn status_code(kind: &ErrorKind, hint: StatusCode) -> StatusCode {
	if hint == StatusCode::BAD_REQUEST {
		bad_request_code(kind)
	} else {
		hint
	}
}

pub(super) fn bad_request_code(kind: &ErrorKind) -> StatusCode {
	match kind {
		// 403
		| ErrorKind::Forbidden { .. }
		| ErrorKind::UnknownToken { .. }
		| ErrorKind::MissingToken => StatusCode::FORBIDDEN,

		// 404
		| ErrorKind::NotFound => StatusCode::NOT_FOUND,

		// 500
		| ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

		// 400
		| _ => StatusCode::BAD_REQUEST,
	}
}
