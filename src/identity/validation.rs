//! Signup field rules.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

static USER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").expect("static regex"));
static PASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.{3,20}$").expect("static regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\S]+@[\S]+\.[\S]+$").expect("static regex"));

pub const BAD_USERNAME: &str = "That's not a valid username.";
pub const BAD_PASSWORD: &str = "That wasn't a valid password.";
pub const BAD_VERIFY: &str = "Your passwords didn't match.";
pub const BAD_EMAIL: &str = "That's not a valid email.";

pub fn valid_username(name: &str) -> bool { USER_RE.is_match(name) }
pub fn valid_password(password: &str) -> bool { PASS_RE.is_match(password) }
/// Email is optional: empty passes.
pub fn valid_email(email: &str) -> bool { email.is_empty() || EMAIL_RE.is_match(email) }

/// Check every registration field, reporting all failures at once.
pub fn validate_registration(name: &str, password: &str, verify: Option<&str>, email: Option<&str>) -> AppResult<()> {
    let mut fields = BTreeMap::new();
    if !valid_username(name) {
        fields.insert("username".to_string(), BAD_USERNAME.to_string());
    }
    if !valid_password(password) {
        fields.insert("password".to_string(), BAD_PASSWORD.to_string());
    } else if let Some(v) = verify {
        if v != password { fields.insert("verify".to_string(), BAD_VERIFY.to_string()); }
    }
    if !valid_email(email.unwrap_or("")) {
        fields.insert("email".to_string(), BAD_EMAIL.to_string());
    }
    if fields.is_empty() { Ok(()) } else { Err(AppError::Validation { fields }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        for ok in ["abc", "alice", "a_b-c", "ABCDEFGHIJKLMNOPQRST"] { assert!(valid_username(ok), "{ok}"); }
        for bad in ["ab", "", "has space", "ABCDEFGHIJKLMNOPQRSTU", "pipe|name", "semi;colon", "ünï"] {
            assert!(!valid_username(bad), "{bad}");
        }
    }

    #[test]
    fn password_and_email_rules() {
        assert!(valid_password("abc"));
        assert!(!valid_password("ab"));
        assert!(!valid_password(&"x".repeat(21)));
        assert!(valid_email(""));
        assert!(valid_email("a@b.co"));
        assert!(!valid_email("not an email"));
        assert!(!valid_email("a@b"));
    }

    #[test]
    fn registration_collects_all_field_errors() {
        let err = validate_registration("x", "y", None, Some("bad")).unwrap_err();
        let fields = err.field_messages();
        assert_eq!(fields.get("username").map(String::as_str), Some(BAD_USERNAME));
        assert_eq!(fields.get("password").map(String::as_str), Some(BAD_PASSWORD));
        assert_eq!(fields.get("email").map(String::as_str), Some(BAD_EMAIL));
    }

    #[test]
    fn verify_mismatch_is_reported() {
        let err = validate_registration("alice", "secret", Some("secreT"), None).unwrap_err();
        assert_eq!(err.field_messages().get("verify").map(String::as_str), Some(BAD_VERIFY));
        assert!(validate_registration("alice", "secret", Some("secret"), Some("")).is_ok());
    }
}
