use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded token header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm, e.g. `HS256`
    pub alg: String,
    /// Media type, usually `JWT`
    #[serde(default)]
    pub typ: Option<String>,
    /// Any other header parameters (`kid`, `cty`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoded token claims
///
/// Claims are kept as loosely typed JSON; the accessors convert on read and
/// return `None` when a claim is absent or has the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        let value = self.get(key)?;
        value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
    }

    /// Reads a NumericDate claim (seconds since the Unix epoch)
    pub fn get_time(&self, key: &str) -> Option<DateTime<Utc>> {
        let seconds = self.get_i64(key)?;
        Utc.timestamp_opt(seconds, 0).single()
    }

    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.get_time("iat")
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.get_time("nbf")
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.get_time("exp")
    }

    /// True once `now` reaches the `exp` claim; tokens without one never expire
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_time_accepts_integers_and_floats() {
        let claims = payload(json!({"exp": 1700000000, "iat": 1600000000.0}));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(claims.issued_at().unwrap().timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_wrong_types_read_as_none() {
        let claims = payload(json!({"exp": "tomorrow", "sub": 7}));
        assert_eq!(claims.expires_at(), None);
        assert_eq!(claims.subject(), None);
    }

    #[test]
    fn test_is_expired() {
        let claims = payload(json!({"exp": 100}));
        let before = Utc.timestamp_opt(99, 0).unwrap();
        let at = Utc.timestamp_opt(100, 0).unwrap();
        assert!(!claims.is_expired(before));
        assert!(claims.is_expired(at));
        assert!(!Payload::default().is_expired(at));
    }
}
