use std::fmt;

use thiserror::Error;

/// Which dot-separated part of a token failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPart {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for TokenPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPart::Header => write!(f, "header"),
            TokenPart::Payload => write!(f, "payload"),
            TokenPart::Signature => write!(f, "signature"),
        }
    }
}

/// Invalid token format
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token format: expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("invalid token format: {part} is not base64url: {source}")]
    Base64 {
        part: TokenPart,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid token format: {part} is not a JSON object: {source}")]
    Json {
        part: TokenPart,
        #[source]
        source: serde_json::Error,
    },
}

impl TokenError {
    /// The part that failed, if the segment count was right
    pub fn part(&self) -> Option<TokenPart> {
        match self {
            TokenError::SegmentCount(_) => None,
            TokenError::Base64 { part, .. } | TokenError::Json { part, .. } => Some(*part),
        }
    }
}
