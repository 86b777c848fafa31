use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        malformed_response_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        config_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn voice_unsupported_error() -> Error {
    Error {
        code: 102,
        message: "Voice recognition not supported in this browser.".into(),
    }
}

pub fn incomplete_route_error() -> Error {
    Error {
        code: 103,
        message: "route needs an origin and a destination".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: format!("reqwest error: {}", err),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn config_error<T: Debug>(err: T) -> Error {
    Error {
        code: 6,
        message: format!("configuration error: {:?}", err),
    }
}

pub fn malformed_response_error<T: Display>(err: T) -> Error {
    Error {
        code: 7,
        message: format!("malformed response: {}", err),
    }
}

#[test]
fn internal_errors_hide_their_message() {
    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = config_error("missing token").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn user_errors_are_bad_requests() {
    let response = invalid_input_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = voice_unsupported_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn serde_errors_map_to_malformed_response() {
    let err: Error = serde_json::from_str::<serde_json::Value>("{not json")
        .unwrap_err()
        .into();
    assert_eq!(err.code, 7);
}

#[test]
fn io_errors_map_to_config_error() {
    let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "presets.json").into();
    assert_eq!(err.code, 6);
}
