use super::*;

// =============================================================================
// hash_password / verify_password
// =============================================================================

#[test]
fn correct_password_verifies() {
    let stored = hash_password("s3cret-pw");
    assert!(verify_password("s3cret-pw", &stored));
}

#[test]
fn wrong_password_rejected() {
    let stored = hash_password("s3cret-pw");
    assert!(!verify_password("S3cret-pw", &stored));
    assert!(!verify_password("", &stored));
}

#[test]
fn equal_passwords_get_distinct_digests() {
    let a = hash_password("same");
    let b = hash_password("same");
    assert_ne!(a, b);
    assert!(verify_password("same", &a));
    assert!(verify_password("same", &b));
}

#[test]
fn stored_format_has_scheme_salt_digest() {
    let stored = hash_password("pw");
    let parts: Vec<&str> = stored.split('$').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "sha256");
    assert_eq!(parts[1].len(), 32);
    assert_eq!(parts[2].len(), 64);
}

#[test]
fn malformed_stored_values_never_verify() {
    for stored in ["", "sha256", "sha256$salt", "md5$ab$cd", "plaintext-pw"] {
        assert!(!verify_password("pw", stored), "verified against {stored:?}");
    }
}
