//! # Pagewire Tokens
//!
//! Decodes JSON Web Tokens into their header, claims and raw signature.
//! Signatures are **not** verified; this is for reading claims such as the
//! expiry of a session token already trusted by the server.
//!
//! ## Example
//!
//! ```
//! use pagewire_tokens::decode_token;
//!
//! // {"alg":"HS256","typ":"JWT"} . {"sub":"42","exp":1700000000} . "sig"
//! let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
//!              eyJzdWIiOiI0MiIsImV4cCI6MTcwMDAwMDAwMH0.\
//!              c2ln";
//! let jwt = decode_token(token).unwrap();
//! assert_eq!(jwt.header.alg, "HS256");
//! assert_eq!(jwt.payload.subject(), Some("42"));
//! assert_eq!(jwt.payload.expires_at().unwrap().timestamp(), 1_700_000_000);
//! assert_eq!(jwt.signature, b"sig");
//! ```

mod claims;
mod error;

use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use claims::{Header, Payload};
pub use error::{TokenError, TokenPart};

/// A decoded, unverified JSON Web Token
#[derive(Debug, Clone, PartialEq)]
pub struct JwtToken {
    pub header: Header,
    pub payload: Payload,
    /// Raw signature bytes
    pub signature: Vec<u8>,
}

impl FromStr for JwtToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_token(s)
    }
}

fn decode_part(part: TokenPart, segment: &str) -> Result<Vec<u8>, TokenError> {
    // Some issuers pad their segments even though base64url omits padding
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|source| TokenError::Base64 { part, source })
}

fn parse_part<T: DeserializeOwned>(part: TokenPart, segment: &str) -> Result<T, TokenError> {
    let bytes = decode_part(part, segment)?;
    serde_json::from_slice(&bytes).map_err(|source| TokenError::Json { part, source })
}

/// Splits a compact token into its three parts and decodes each
///
/// Fails with [`TokenError::SegmentCount`] unless there are exactly three
/// dot-separated segments, and with `Base64`/`Json` naming the offending part.
pub fn decode_token(token: &str) -> Result<JwtToken, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [header, payload, signature] = segments[..] else {
        debug!(segments = segments.len(), "rejected token");
        return Err(TokenError::SegmentCount(segments.len()));
    };

    Ok(JwtToken {
        header: parse_part(TokenPart::Header, header)?,
        payload: parse_part(TokenPart::Payload, payload)?,
        signature: decode_part(TokenPart::Signature, signature)?,
    })
}
