use super::*;

fn sample_user_json() -> &'static str {
    r#"{
        "id": "7c0bfd12-96c8-4a7e-9b5f-0d8a2f9f3a11",
        "username": "ana",
        "email": "ana@example.com",
        "role": "admin",
        "profile": { "firstName": "Ana", "lastName": "Bell" },
        "isActive": true,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-02T00:00:00Z"
    }"#
}

// =============================================================================
// User
// =============================================================================

#[test]
fn user_deserializes_camel_case() {
    let user: User = serde_json::from_str(sample_user_json()).unwrap();
    assert_eq!(user.username, "ana");
    assert_eq!(user.role, Role::Admin);
    assert!(user.is_active);
    assert_eq!(user.profile.first_name.as_deref(), Some("Ana"));
    assert_eq!(user.profile.phone, None);
}

#[test]
fn user_serializes_camel_case_keys() {
    let user: User = serde_json::from_str(sample_user_json()).unwrap();
    let value: serde_json::Value = serde_json::to_value(&user).unwrap();
    assert!(value.get("isActive").is_some());
    assert!(value.get("createdAt").is_some());
    assert!(value.get("is_active").is_none());
}

#[test]
fn user_missing_profile_defaults_to_empty() {
    let json = r#"{
        "id": "7c0bfd12-96c8-4a7e-9b5f-0d8a2f9f3a11",
        "username": "bo",
        "email": "bo@example.com",
        "role": "user",
        "isActive": true,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    }"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert_eq!(user.profile, Profile::default());
}

#[test]
fn user_round_trips_through_snapshot_serialization() {
    let user: User = serde_json::from_str(sample_user_json()).unwrap();
    let stored = serde_json::to_string(&user).unwrap();
    let restored: User = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored, user);
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_wire_values_are_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
}

#[test]
fn role_default_is_user() {
    assert_eq!(Role::default(), Role::User);
}

// =============================================================================
// Envelope
// =============================================================================

#[test]
fn envelope_failure_without_data() {
    let json = r#"{ "success": false, "message": "Invalid email or password" }"#;
    let env: Envelope<AuthData> = serde_json::from_str(json).unwrap();
    assert!(!env.success);
    assert_eq!(env.message, "Invalid email or password");
    assert!(env.data.is_none());
}

#[test]
fn envelope_missing_message_defaults_empty() {
    let json = r#"{ "success": true }"#;
    let env: Envelope<ProfileData> = serde_json::from_str(json).unwrap();
    assert!(env.success);
    assert!(env.message.is_empty());
}

#[test]
fn envelope_omits_absent_data_when_serialized() {
    let env = Envelope::<AuthData> { success: false, message: "nope".into(), data: None };
    let value = serde_json::to_value(&env).unwrap();
    assert!(value.get("data").is_none());
}

// =============================================================================
// ProfileUpdate
// =============================================================================

#[test]
fn profile_update_skips_unset_fields() {
    let update = ProfileUpdate { first_name: Some("Ana".into()), ..ProfileUpdate::default() };
    let value = serde_json::to_value(&update).unwrap();
    assert_eq!(value.get("firstName").and_then(serde_json::Value::as_str), Some("Ana"));
    assert!(value.get("lastName").is_none());
    assert!(value.get("phone").is_none());
}

// =============================================================================
// TicketStatus
// =============================================================================

#[test]
fn ticket_status_wire_values() {
    assert_eq!(serde_json::to_string(&TicketStatus::Booked).unwrap(), "\"booked\"");
    assert_eq!(serde_json::to_string(&TicketStatus::Cancelled).unwrap(), "\"cancelled\"");
}
