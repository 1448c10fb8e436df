use super::*;

fn manager() -> SessionManager { SessionManager::from_secret("session test secret") }

fn alice() -> Identity {
    Identity { id: Some(7), name: "alice".into(), password: "abcde,00".into(), email: None }
}

fn headers_with(cookie: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    h
}

fn cookie_header(cookies: &[SetCookie]) -> HeaderMap {
    let joined = cookies.iter().map(|c| format!("{}={}", c.name, c.value)).collect::<Vec<_>>().join("; ");
    headers_with(&joined)
}

#[test]
fn login_issues_both_cookies_scoped_to_root() {
    let cookies = manager().login(&alice());
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].name, USER_ID_COOKIE);
    assert_eq!(cookies[1].name, USER_NAME_COOKIE);
    assert!(cookies[0].value.starts_with("7|"));
    assert!(cookies[1].value.starts_with("alice|"));
    for c in &cookies {
        assert!(c.header_string().ends_with("; Path=/"));
        assert!(c.to_header().is_some());
    }
}

#[test]
fn login_cookies_authenticate_next_request() {
    let sm = manager();
    let headers = cookie_header(&sm.login(&alice()));
    assert_eq!(sm.current_user_name(&headers).as_deref(), Some("alice"));
    assert_eq!(sm.current_user_id(&headers), Some(7));
    assert_eq!(sm.state(&headers), SessionState::Authenticated("alice".into()));
}

#[test]
fn logout_empties_both_cookies() {
    let sm = manager();
    let cookies = sm.logout();
    assert_eq!(cookies.len(), 2);
    for c in &cookies {
        assert!(c.value.is_empty());
        assert_eq!(c.header_string(), format!("{}=; Path=/", c.name));
    }
    let headers = cookie_header(&cookies);
    assert_eq!(sm.state(&headers), SessionState::Anonymous);
    assert_eq!(sm.current_user_name_unverified(&headers), None);
}

#[test]
fn tampered_signature_is_anonymous() {
    let sm = manager();
    let name_cookie = sm.login(&alice()).remove(1);
    let mut value = name_cookie.value.into_bytes();
    let last = value.len() - 1;
    value[last] = if value[last] == b'a' { b'b' } else { b'a' };
    let headers = headers_with(&format!("user_name={}", String::from_utf8(value).unwrap()));
    assert_eq!(sm.state(&headers), SessionState::Anonymous);
}

#[test]
fn unverified_accessor_accepts_forged_cookie() {
    // Documents the weakness of the legacy accessor: no signature needed.
    let sm = manager();
    let headers = headers_with("user_name=alice|forged");
    assert_eq!(sm.current_user_name(&headers), None);
    assert_eq!(sm.current_user_name_unverified(&headers).as_deref(), Some("alice"));
}

#[test]
fn unsaved_identity_yields_unverifiable_id() {
    let sm = manager();
    let mut ident = alice();
    ident.id = None;
    let headers = cookie_header(&sm.login(&ident));
    assert_eq!(sm.current_user_id(&headers), None);
    assert_eq!(sm.current_user_name(&headers).as_deref(), Some("alice"));
}

#[test]
fn parse_cookie_handles_multiple_pairs_and_headers() {
    let mut h = HeaderMap::new();
    h.append(header::COOKIE, HeaderValue::from_static("theme=dark; user_id=1|ab"));
    h.append(header::COOKIE, HeaderValue::from_static("user_name=bob|cd; user_id=2|ef"));
    assert_eq!(parse_cookie(&h, "theme").as_deref(), Some("dark"));
    assert_eq!(parse_cookie(&h, "user_id").as_deref(), Some("1|ab"));
    assert_eq!(parse_cookie(&h, "user_name").as_deref(), Some("bob|cd"));
    assert_eq!(parse_cookie(&h, "missing"), None);
    assert_eq!(parse_cookie(&HeaderMap::new(), "user_name"), None);
}
