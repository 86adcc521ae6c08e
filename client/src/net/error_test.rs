use super::*;

use crate::net::types::{ErrorBody, TokenPair};

fn error_envelope(code: u16, message: &str) -> String {
    serde_json::json!({
        "code": code,
        "status": "Error",
        "data": { "message": message }
    })
    .to_string()
}

// =============================================================================
// classify_response
// =============================================================================

#[test]
fn classify_401_as_auth_rejected() {
    let err = classify_response(401, &error_envelope(401, "token expired"));
    assert_eq!(err, ApiError::AuthRejected { message: "token expired".into() });
}

#[test]
fn classify_403_as_forbidden() {
    let err = classify_response(403, &error_envelope(403, "admins only"));
    assert_eq!(err, ApiError::Forbidden { message: "admins only".into() });
}

#[test]
fn classify_404_as_not_found() {
    let err = classify_response(404, &error_envelope(404, "no such post"));
    assert_eq!(err, ApiError::NotFound { message: "no such post".into() });
}

#[test]
fn classify_503_as_upstream_unavailable() {
    let err = classify_response(503, &error_envelope(503, "backend down"));
    assert_eq!(err, ApiError::UpstreamUnavailable { message: "backend down".into() });
}

#[test]
fn classify_other_5xx_as_server_error() {
    let err = classify_response(500, &error_envelope(500, "boom"));
    assert_eq!(err, ApiError::ServerError { status: 500, message: "boom".into() });

    let err = classify_response(502, &error_envelope(502, "bad gateway"));
    assert_eq!(err, ApiError::ServerError { status: 502, message: "bad gateway".into() });
}

#[test]
fn classify_status_zero_as_network_error() {
    let err = classify_response(0, "");
    assert_eq!(err, ApiError::NetworkError { message: "empty response body".into() });
}

#[test]
fn classify_other_4xx_as_rejected() {
    let err = classify_response(422, &error_envelope(422, "email already taken"));
    assert_eq!(err, ApiError::Rejected { status: 422, message: "email already taken".into() });
}

// =============================================================================
// error_message
// =============================================================================

#[test]
fn error_message_reads_envelope() {
    assert_eq!(error_message(&error_envelope(401, "token expired")), "token expired");
}

#[test]
fn error_message_falls_back_to_raw_body() {
    assert_eq!(error_message("upstream said no"), "upstream said no");
}

#[test]
fn error_message_handles_empty_body() {
    assert_eq!(error_message(""), "empty response body");
    assert_eq!(error_message("   "), "empty response body");
}

#[test]
fn error_message_truncates_long_raw_bodies() {
    let raw = "x".repeat(500);
    assert_eq!(error_message(&raw).len(), 200);
}

// =============================================================================
// decode_data
// =============================================================================

#[test]
fn decode_data_unwraps_success_envelope() {
    let body = serde_json::json!({
        "code": 200,
        "status": "OK",
        "data": { "message": "signed out" }
    })
    .to_string();
    let data: ErrorBody = decode_data(&body).unwrap();
    assert_eq!(data.message, "signed out");
}

#[test]
fn decode_data_rejects_malformed_body() {
    let err = decode_data::<TokenPair>("not json").unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[test]
fn decode_data_rejects_envelope_with_wrong_shape() {
    let body = serde_json::json!({ "code": 200, "status": "OK", "data": { "nope": 1 } }).to_string();
    let err = decode_data::<TokenPair>(&body).unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

// =============================================================================
// is_auth_fatal
// =============================================================================

#[test]
fn auth_fatal_kinds() {
    assert!(ApiError::NoRefreshToken.is_auth_fatal());
    assert!(ApiError::AuthRejected { message: String::new() }.is_auth_fatal());
}

#[test]
fn transient_kinds_are_not_auth_fatal() {
    assert!(!ApiError::NetworkError { message: String::new() }.is_auth_fatal());
    assert!(!ApiError::UpstreamUnavailable { message: String::new() }.is_auth_fatal());
    assert!(!ApiError::ServerError { status: 500, message: String::new() }.is_auth_fatal());
    assert!(!ApiError::Forbidden { message: String::new() }.is_auth_fatal());
}
