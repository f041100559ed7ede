// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token codec tests.
//!
//! A token must round-trip its claims unchanged, reject any single-byte
//! tampering, and expire exactly once `now` passes `exp`.

use quantboard::session::{issue, verify, SESSION_TTL_SECS};

const SECRET: &[u8] = b"test_session_key_32_bytes_long!!";
const NOW: i64 = 1_760_000_000;

fn issue_full() -> quantboard::session::IssuedSession {
    issue(
        "u1",
        Some("a@b.com".to_string()),
        Some("Ada".to_string()),
        Some("https://example.com/a.png".to_string()),
        SECRET,
        NOW,
    )
    .expect("issue")
}

#[test]
fn test_roundtrip_preserves_claims() {
    let issued = issue_full();

    let claims = verify(&issued.token, SECRET, NOW + 1).expect("valid token");
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.email.as_deref(), Some("a@b.com"));
    assert_eq!(claims.name.as_deref(), Some("Ada"));
    assert_eq!(claims.picture.as_deref(), Some("https://example.com/a.png"));
    assert_eq!(claims.iat, NOW);
    assert_eq!(claims.exp, NOW + SESSION_TTL_SECS);
}

#[test]
fn test_optional_claims_roundtrip_as_none() {
    let issued = issue("u2", None, None, None, SECRET, NOW).expect("issue");
    let claims = verify(&issued.token, SECRET, NOW).expect("valid token");
    assert_eq!(claims.sub, "u2");
    assert!(claims.email.is_none());
    assert!(claims.name.is_none());
    assert!(claims.picture.is_none());
}

#[test]
fn test_valid_until_expiry_instant_then_invalid() {
    let issued = issue_full();
    let exp = issued.claims.exp;

    // now == exp is still valid; one second later is not.
    assert!(verify(&issued.token, SECRET, exp).is_some());
    assert!(verify(&issued.token, SECRET, exp + 1).is_none());
}

/// Flip one base64 character at `index` within the given token segment.
fn tamper_segment(token: &str, segment: usize, index: usize) -> String {
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut chars: Vec<char> = parts[segment].chars().collect();
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    parts[segment] = chars.into_iter().collect();
    parts.join(".")
}

#[test]
fn test_tampering_payload_invalidates_token() {
    let issued = issue_full();
    let payload_len = issued.token.split('.').next().unwrap().len();

    for index in [0, payload_len / 2, payload_len - 1] {
        let tampered = tamper_segment(&issued.token, 0, index);
        assert!(
            verify(&tampered, SECRET, NOW).is_none(),
            "payload byte {index} tampering must invalidate the token"
        );
    }
}

#[test]
fn test_tampering_tag_invalidates_token() {
    let issued = issue_full();
    let tag_len = issued.token.split('.').nth(1).unwrap().len();

    for index in [0, tag_len / 2, tag_len - 1] {
        let tampered = tamper_segment(&issued.token, 1, index);
        assert!(
            verify(&tampered, SECRET, NOW).is_none(),
            "tag byte {index} tampering must invalidate the token"
        );
    }
}

#[test]
fn test_truncated_tag_invalidates_token() {
    let issued = issue_full();
    let (payload, tag) = issued.token.split_once('.').unwrap();
    let truncated = format!("{payload}.{}", &tag[..tag.len() - 4]);
    assert!(verify(&truncated, SECRET, NOW).is_none());
}

#[test]
fn test_garbage_base64_is_invalid() {
    assert!(verify("!!!.???", SECRET, NOW).is_none());
}
