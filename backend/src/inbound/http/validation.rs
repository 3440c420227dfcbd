//! Shared validation helpers for inbound HTTP adapters.

use actix_web::error::JsonPayloadError;
use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, UserId, map_validation_error};

/// Parse the `userId` path segment into a domain identifier.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(map_validation_error)
}

fn payload_error(err: &JsonPayloadError) -> Error {
    let message = match err {
        JsonPayloadError::ContentType => "request body must be JSON".to_owned(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "request body is too large".to_owned()
        }
        other => format!("invalid JSON body: {other}"),
    };
    Error::invalid_request(message).with_details(json!({ "code": "invalid_body" }))
}

/// JSON extractor configuration turning payload failures into
/// `InvalidRequest` errors rendered through the shared envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected JSON payload");
        payload_error(&err).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn parse_user_id_accepts_uuid() {
        let id = parse_user_id("11111111-1111-1111-1111-111111111111").expect("valid id");
        assert_eq!(id.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[rstest]
    #[case("")]
    #[case("42")]
    #[case("not-a-uuid")]
    fn parse_user_id_rejects_malformed_values(#[case] raw: &str) {
        let err = parse_user_id(raw).expect_err("malformed id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details present");
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some("userId"));
    }

    #[rstest]
    fn content_type_error_mentions_json() {
        let err = payload_error(&JsonPayloadError::ContentType);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "request body must be JSON");
    }
}
