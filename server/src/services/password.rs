//! Password digests.
//!
//! Stored as `sha256$<salt>$<digest>` with a random per-user salt, so equal
//! passwords never share a digest and the scheme tag leaves room for a
//! future algorithm migration.

use rand::Rng;
use sha2::{Digest, Sha256};

use super::session::bytes_to_hex;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt_bytes: [u8; SALT_LEN] = rand::rng().random();
    let salt = bytes_to_hex(&salt_bytes);
    let digest = salted_digest(&salt, password);
    format!("{SCHEME}${salt}${digest}")
}

/// Check a password against a stored digest. Malformed stored values never
/// verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(scheme), Some(salt), Some(digest)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    salted_digest(salt, password) == digest
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
