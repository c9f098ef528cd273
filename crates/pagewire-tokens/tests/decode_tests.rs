//! Integration tests for token decoding

use pagewire_tokens::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

const HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
const EXP_PAYLOAD: &str = "eyJleHAiOjE3MDAwMDAwMDB9";
const SIGNATURE: &str = "c2ln";

fn token(parts: &[&str]) -> String {
    parts.join(".")
}

#[test]
fn test_decode_full_token() {
    let jwt = decode_token(&token(&[HEADER, EXP_PAYLOAD, SIGNATURE])).unwrap();
    assert_eq!(jwt.header.alg, "HS256");
    assert_eq!(jwt.header.typ.as_deref(), Some("JWT"));
    assert_eq!(jwt.signature, b"sig".to_vec());
}

#[test]
fn test_exp_claim_reads_as_time() {
    let jwt = decode_token(&token(&[HEADER, EXP_PAYLOAD, SIGNATURE])).unwrap();
    let exp = jwt.payload.get_time("exp").unwrap();
    assert_eq!(exp.timestamp(), 1_700_000_000);
    assert_eq!(jwt.payload.expires_at(), Some(exp));
}

#[rstest]
#[case(&[HEADER, EXP_PAYLOAD], 2)]
#[case(&[HEADER], 1)]
#[case(&[HEADER, EXP_PAYLOAD, SIGNATURE, SIGNATURE], 4)]
fn test_wrong_segment_count(#[case] parts: &[&str], #[case] expected: usize) {
    let err = decode_token(&token(parts)).unwrap_err();
    assert!(matches!(err, TokenError::SegmentCount(n) if n == expected));
    assert!(err.to_string().starts_with("invalid token format"));
}

#[test]
fn test_invalid_base64_names_part() {
    let err = decode_token(&token(&[HEADER, "not*base64", SIGNATURE])).unwrap_err();
    assert!(matches!(err, TokenError::Base64 { .. }));
    assert_eq!(err.part(), Some(TokenPart::Payload));
}

#[rstest]
#[case("bm90IGpzb24")] // "not json"
#[case("WzEsMl0")] // [1,2]
fn test_invalid_json_payload(#[case] payload: &str) {
    let err = decode_token(&token(&[HEADER, payload, SIGNATURE])).unwrap_err();
    assert!(matches!(err, TokenError::Json { part: TokenPart::Payload, .. }));
}

#[test]
fn test_padded_segments_are_accepted() {
    let jwt = decode_token(&token(&["eyJhbGciOiJub25lIn0=", EXP_PAYLOAD, ""])).unwrap();
    assert_eq!(jwt.header.alg, "none");
    assert_eq!(jwt.header.typ, None);
    assert!(jwt.signature.is_empty());
}

#[test]
fn test_from_str() {
    let jwt: JwtToken = token(&[HEADER, EXP_PAYLOAD, SIGNATURE]).parse().unwrap();
    assert_eq!(jwt.payload.len(), 1);
}
