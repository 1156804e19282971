use serde_json::json;

use super::*;

fn jwt(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

// =============================================================
// TokenService
// =============================================================

#[test]
fn set_tokens_stores_present_values_only() {
    let tokens = TokenService::in_memory();
    tokens.set_tokens(Some("a1"), Some("r1"));
    tokens.set_tokens(Some("a2"), None);
    assert_eq!(tokens.access_token().as_deref(), Some("a2"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("r1"));
    assert!(tokens.is_authenticated());
}

#[test]
fn empty_tokens_are_ignored() {
    let tokens = TokenService::in_memory();
    tokens.set_tokens(Some(""), Some(""));
    assert!(tokens.access_token().is_none());
    assert!(!tokens.is_authenticated());
}

#[test]
fn clear_removes_tokens_and_user() {
    let tokens = TokenService::in_memory();
    tokens.set_tokens(Some("a"), Some("r"));
    tokens.set_user_info(&StoredUser { role: "Doctor".to_owned(), user_id: "7".to_owned(), email: "d@x.io".to_owned() });
    tokens.clear();
    assert!(tokens.access_token().is_none());
    assert!(tokens.refresh_token().is_none());
    assert!(tokens.user_info().is_none());
}

#[test]
fn user_info_round_trips_under_user_info_key() {
    let store = Arc::new(MemoryTokenStore::new());
    let tokens = TokenService::new(store.clone());
    let user = StoredUser { role: "Staff".to_owned(), user_id: "12".to_owned(), email: "s@x.io".to_owned() };
    tokens.set_user_info(&user);
    assert!(store.get(USER_INFO_KEY).is_some());
    assert_eq!(tokens.user_info(), Some(user));
}

#[test]
fn user_info_accepts_numeric_ids_and_ignores_garbage() {
    let store = Arc::new(MemoryTokenStore::new());
    let tokens = TokenService::new(store.clone());
    store.set(USER_INFO_KEY, r#"{"role":"Patient","user_id":42,"email":"p@x.io"}"#);
    assert_eq!(tokens.user_info().map(|u| u.user_id), Some("42".to_owned()));
    store.set(USER_INFO_KEY, "not json");
    assert!(tokens.user_info().is_none());
}

// =============================================================
// Claims
// =============================================================

#[test]
fn token_claims_reads_payload() {
    let token = jwt(&json!({ "exp": 1_700_000_000, "user_id": 5, "role": "Doctor", "email": "doc@clinic.io" }));
    let claims = token_claims(&token).unwrap();
    assert_eq!(claims.exp, Some(1_700_000_000));
    assert_eq!(claims.user_id.as_deref(), Some("5"));
    assert_eq!(claims.role.as_deref(), Some("Doctor"));
}

#[test]
fn token_claims_rejects_malformed_tokens() {
    assert!(matches!(token_claims("no-dots"), Err(TokenError::Malformed)));
    assert!(matches!(token_claims("a..c"), Err(TokenError::Malformed)));
    assert!(matches!(token_claims("a.!!!.c"), Err(TokenError::Base64(_))));
    let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("hello"));
    assert!(matches!(token_claims(&not_json), Err(TokenError::Json(_))));
}

#[test]
fn token_claims_tolerates_padding() {
    let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":12}"#);
    assert!(body.ends_with('='));
    let token = format!("h.{body}.s");
    assert_eq!(token_claims(&token).unwrap().exp, Some(12));
}

#[test]
fn expiry_checks() {
    let token = jwt(&json!({ "exp": 1000 }));
    assert!(!is_token_expired(Some(&token), 999));
    assert!(!is_token_expired(Some(&token), 1000));
    assert!(is_token_expired(Some(&token), 1001));
    assert!(is_token_expired(None, 0));
    assert!(is_token_expired(Some("garbage"), 0));
}

#[test]
fn token_without_exp_never_expires() {
    let token = jwt(&json!({ "role": "Staff" }));
    assert!(!is_token_expired(Some(&token), i64::MAX));
    assert_eq!(token_expiration_ms(&token), None);
}

#[test]
fn needs_refresh_inside_buffer() {
    let token = jwt(&json!({ "exp": 1000 }));
    assert!(needs_refresh(Some(&token), 800, 300));
    assert!(!needs_refresh(Some(&token), 600, 300));
}

#[test]
fn expiration_in_millis() {
    let token = jwt(&json!({ "exp": 1_700_000_000 }));
    assert_eq!(token_expiration_ms(&token), Some(1_700_000_000_000));
}

#[test]
fn user_from_token_extracts_fields() {
    let token = jwt(&json!({ "user_id": "u-9", "role": "SuperAdmin", "email": "root@clinic.io" }));
    let user = user_from_token(&token).unwrap();
    assert_eq!(user.user_id.as_deref(), Some("u-9"));
    assert_eq!(user.role.as_deref(), Some("SuperAdmin"));
    assert_eq!(user.email.as_deref(), Some("root@clinic.io"));
    assert!(user_from_token("bad").is_none());
}

#[test]
fn now_secs_is_after_2020() {
    assert!(now_secs() > 1_577_836_800);
}
