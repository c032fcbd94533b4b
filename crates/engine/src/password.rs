//! Password and session token hashing.
//!
//! Stored password format: `sha256$<rounds>$<salt>$<base64 digest>`.
//! Session tokens are random and only their SHA-256 digest is persisted.

use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const SCHEME: &str = "sha256";
const ROUNDS: u32 = 10_000;

/// Well-formed hash no password matches; verified against when the user does
/// not exist so both failure paths cost the same.
pub(crate) const DUMMY_HASH: &str =
    "sha256$10000$00000000000000000000000000000000$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

fn stretch(salt: &str, password: &str, rounds: u32) -> [u8; 32] {
    let mut digest: [u8; 32] = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize()
        .into();
    for _ in 1..rounds {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt.as_bytes())
            .finalize()
            .into();
    }
    digest
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Hash `password` with a fresh random salt.
pub(crate) fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = stretch(&salt, password, ROUNDS);
    format!(
        "{SCHEME}${ROUNDS}${salt}${}",
        STANDARD_NO_PAD.encode(digest)
    )
}

/// Check `password` against a value produced by [`hash_password`].
///
/// Malformed stored values never verify.
pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(rounds), Some(salt), Some(encoded), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    if rounds == 0 {
        return false;
    }
    let Ok(expected) = STANDARD_NO_PAD.decode(encoded) else {
        return false;
    };

    constant_time_eq(&stretch(salt, password, rounds), &expected)
}

/// Generate a new opaque bearer token.
pub(crate) fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Digest under which a bearer token is stored.
pub(crate) fn hash_token(token: &str) -> String {
    STANDARD_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}
