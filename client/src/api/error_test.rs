use super::*;
use serde_json::json;

#[test]
fn classify_maps_statuses() {
    let empty = Value::Null;
    assert!(matches!(classify(401, &empty), ApiError::Unauthorized(_)));
    assert!(matches!(classify(403, &empty), ApiError::Forbidden(_)));
    assert!(matches!(classify(422, &empty), ApiError::InvalidToken(_)));
    assert!(matches!(classify(404, &empty), ApiError::NotFound(_)));
    assert!(matches!(classify(409, &empty), ApiError::Conflict(_)));
    assert!(matches!(classify(500, &empty), ApiError::Generic { status: Some(500), .. }));
    assert!(matches!(classify(400, &empty), ApiError::Generic { status: Some(400), .. }));
}

#[test]
fn classify_uses_default_messages() {
    assert_eq!(classify(401, &Value::Null).to_string(), "Unauthorized - Please log in again");
    assert_eq!(classify(403, &json!({})).to_string(), "Forbidden - Access denied");
    assert_eq!(classify(422, &json!({})).to_string(), "Invalid token - Please log in again");
    assert_eq!(classify(404, &json!({})).to_string(), "Resource not found");
    assert_eq!(classify(409, &json!({})).to_string(), "Conflict - Resource already exists");
    assert_eq!(classify(502, &json!({})).to_string(), "API error: 502");
}

#[test]
fn classify_prefers_body_message() {
    let err = classify(404, &json!({ "message": "Invoice not found or you don't have permission" }));
    assert_eq!(err.to_string(), "Invoice not found or you don't have permission");
}

#[test]
fn classify_accepts_msg_field() {
    let err = classify(400, &json!({ "msg": "Invoice amount cannot be negative" }));
    assert_eq!(err.to_string(), "Invoice amount cannot be negative");
}

#[test]
fn classify_ignores_blank_message() {
    assert_eq!(classify(409, &json!({ "message": "  " })).to_string(), "Conflict - Resource already exists");
}

#[test]
fn forces_logout_only_for_authorization_class() {
    assert!(classify(401, &Value::Null).forces_logout());
    assert!(classify(403, &Value::Null).forces_logout());
    assert!(classify(422, &Value::Null).forces_logout());
    assert!(!classify(404, &Value::Null).forces_logout());
    assert!(!classify(409, &Value::Null).forces_logout());
    assert!(!classify(500, &Value::Null).forces_logout());
    assert!(!ApiError::Network("refused".into()).forces_logout());
}

#[test]
fn status_round_trips_classification() {
    for code in [401, 403, 404, 409, 422, 418] {
        assert_eq!(classify(code, &Value::Null).status(), Some(code));
    }
    assert_eq!(ApiError::Network("x".into()).status(), None);
}
