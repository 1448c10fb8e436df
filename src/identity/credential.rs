//! Salted password credentials.
//!
//! A credential is stored as a single string `"<salt>,<hex sha256(name ++ password ++ salt)>"`.
//! The salt is five ASCII letters; the username is mixed into the digest so identical
//! passwords of different users never share a hash even with a colliding salt.

use rand::Rng;
use sha2::{Digest, Sha256};

pub const SALT_LEN: usize = 5;

const SALT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Draw a fresh salt uniformly from upper/lower-case letters.
pub fn make_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LEN)
        .map(|_| SALT_ALPHABET[rng.gen_range(0..SALT_ALPHABET.len())] as char)
        .collect()
}

/// Produce the stored credential string for `name`/`password`.
/// Passing `None` draws a new random salt; passing a salt reproduces an existing credential.
pub fn hash(name: &str, password: &str, salt: Option<&str>) -> String {
    let salt = match salt {
        Some(s) => s.to_string(),
        None => make_salt(),
    };
    let mut h = Sha256::new();
    h.update(name.as_bytes());
    h.update(password.as_bytes());
    h.update(salt.as_bytes());
    format!("{},{}", salt, hex::encode(h.finalize()))
}

/// Check `password` against a stored credential. Malformed credentials fail closed.
pub fn verify(name: &str, password: &str, credential: &str) -> bool {
    let Some((salt, _digest)) = credential.split_once(',') else { return false; };
    let recomputed = hash(name, password, Some(salt));
    constant_time_eq(recomputed.as_bytes(), credential.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_is_five_letters() {
        for _ in 0..50 {
            let s = make_salt();
            assert_eq!(s.len(), SALT_LEN);
            assert!(s.chars().all(|c| c.is_ascii_alphabetic()), "unexpected salt {s}");
        }
    }

    #[test]
    fn hash_layout_is_salt_comma_hex() {
        let cred = hash("alice", "secret", Some("abcde"));
        let (salt, digest) = cred.split_once(',').unwrap();
        assert_eq!(salt, "abcde");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_matches_known_digest() {
        // sha256("alicesecretabcde")
        let mut h = Sha256::new();
        h.update(b"alicesecretabcde");
        let expected = format!("abcde,{}", hex::encode(h.finalize()));
        assert_eq!(hash("alice", "secret", Some("abcde")), expected);
    }

    #[test]
    fn verify_accepts_own_hash() {
        for (name, pw) in [("alice", "secret"), ("bob_99", "p@ss word"), ("x-y", "")] {
            let cred = hash(name, pw, None);
            assert!(verify(name, pw, &cred), "failed for {name}");
        }
    }

    #[test]
    fn verify_rejects_wrong_password_or_name() {
        let cred = hash("alice", "secret", None);
        assert!(!verify("alice", "wrongpw", &cred));
        assert!(!verify("alicf", "secret", &cred));
        assert!(!verify("alice", "Secret", &cred));
    }

    #[test]
    fn malformed_credential_fails_closed() {
        assert!(!verify("alice", "secret", ""));
        assert!(!verify("alice", "secret", "no-comma-here"));
        assert!(!verify("alice", "secret", "abcde,"));
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
    }
}
