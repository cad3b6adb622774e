//! Response envelope
//!
//! Every handler result is rendered through [`Envelope`]: a status code, the
//! JSON and CORS headers, and the JSON text of the body.

use crate::error::Error;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::error;

const INTERNAL_ERROR: &str = "Internal Server Error";

/// A rendered response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON text
    pub body: String,
}

impl Envelope {
    fn new(status_code: u16, body: String) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);

        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Serialize `data` as the body
    pub fn success<T: Serialize>(status_code: u16, data: &T) -> Self {
        match serde_json::to_string(data) {
            Ok(body) => Self::new(status_code, body),
            Err(e) => {
                error!("Failed to serialize response body: {e}");
                Self::error(500, INTERNAL_ERROR)
            }
        }
    }

    /// `{"error": true, "message": ..., "status_code": ...}`
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = json!({
            "error": true,
            "message": message.into(),
            "status_code": status_code,
        });
        Self::new(status_code, body.to_string())
    }

    /// Taxonomy errors keep their message and status; anything else is
    /// logged and hidden behind a generic 500.
    pub fn from_error(err: &Error) -> Self {
        if err.is_client_facing() {
            Self::error(err.status_code(), err.to_string())
        } else {
            error!("Unhandled error: {err}");
            Self::error(500, INTERNAL_ERROR)
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        if !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        response
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        Envelope::from_error(&self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    #[test]
    fn test_success_envelope() {
        let envelope = Envelope::success(201, &json!({"application_id": "c_1"}));

        assert_eq!(envelope.status_code, 201);
        assert_eq!(envelope.headers["Content-Type"], "application/json");
        assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(envelope.body, r#"{"application_id":"c_1"}"#);
    }

    #[test]
    fn test_error_envelope_body() {
        let envelope = Envelope::error(400, "Missing required field: name");
        let body: Value = serde_json::from_str(&envelope.body).unwrap();

        assert_eq!(
            body,
            json!({"error": true, "message": "Missing required field: name", "status_code": 400})
        );
    }

    #[test]
    fn test_envelope_serializes_status_code_key() {
        let value = serde_json::to_value(Envelope::error(404, "x")).unwrap();
        assert_eq!(value["statusCode"], 404);
    }

    #[test]
    fn test_from_error_hides_internal_errors() {
        let envelope = Envelope::from_error(&Error::http_status(502, "secret upstream detail"));
        let body: Value = serde_json::from_str(&envelope.body).unwrap();

        assert_eq!(envelope.status_code, 500);
        assert_eq!(body["message"], "Internal Server Error");

        let envelope = Envelope::from_error(&Error::authentication("Failed to get access token: x"));
        assert_eq!(envelope.status_code, 401);
    }

    #[test]
    fn test_into_response_headers() {
        let response = Error::not_found("missing").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
