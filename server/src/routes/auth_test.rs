use axum::http::HeaderValue;

use super::*;

// =============================================================================
// bearer_token
// =============================================================================

fn headers_with_auth(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn bearer_token_extracts_value() {
    let headers = headers_with_auth("Bearer abc123");
    assert_eq!(bearer_token(&headers), Some("abc123"));
}

#[test]
fn bearer_token_trims_whitespace() {
    let headers = headers_with_auth("Bearer   abc123  ");
    assert_eq!(bearer_token(&headers), Some("abc123"));
}

#[test]
fn bearer_token_missing_header() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
}

#[test]
fn bearer_token_wrong_scheme() {
    let headers = headers_with_auth("Basic abc123");
    assert_eq!(bearer_token(&headers), None);
}

#[test]
fn bearer_token_empty_token() {
    let headers = headers_with_auth("Bearer ");
    assert_eq!(bearer_token(&headers), None);
}

#[test]
fn bearer_token_scheme_is_case_sensitive() {
    let headers = headers_with_auth("bearer abc123");
    assert_eq!(bearer_token(&headers), None);
}

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Ana@Example.COM "), Some("ana@example.com".to_owned()));
}

#[test]
fn normalize_email_rejects_missing_at() {
    assert_eq!(normalize_email("ana.example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_local_part() {
    assert_eq!(normalize_email("@example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_domain() {
    assert_eq!(normalize_email("ana@"), None);
}

#[test]
fn normalize_email_rejects_double_at() {
    assert_eq!(normalize_email("ana@b@c.com"), None);
}

#[test]
fn normalize_email_rejects_empty() {
    assert_eq!(normalize_email("   "), None);
}

// =============================================================================
// Payload serialization
// =============================================================================

#[test]
fn auth_payload_serializes_user_and_token() {
    let user = UserRecord {
        id: uuid::Uuid::nil(),
        username: "ana".into(),
        email: "ana@example.com".into(),
        role: "user".into(),
        profile: crate::services::session::ProfileRecord {
            first_name: None,
            last_name: None,
            phone: None,
        },
        is_active: true,
        created_at: "2026-01-01T00:00:00Z".into(),
        updated_at: "2026-01-01T00:00:00Z".into(),
    };
    let payload = AuthPayload { user, token: "tok".into() };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["token"], "tok");
    assert_eq!(value["user"]["username"], "ana");
    assert_eq!(value["user"]["role"], "user");
}

#[test]
fn profile_body_accepts_partial_camel_case_fields() {
    let body: ProfileBody = serde_json::from_str(r#"{ "firstName": "Ana" }"#).unwrap();
    assert_eq!(body.first_name.as_deref(), Some("Ana"));
    assert_eq!(body.last_name, None);
    assert_eq!(body.phone, None);
}
