use serde_json::{Map, Value};
use thiserror::Error;

use crate::jwk::Jwk;

/// A protected or unprotected JOSE header, members kept in input order.
pub type Header = Map<String, Value>;

const KEY_ID: &str = "kid";
const JWK: &str = "jwk";
const ALGORITHM: &str = "alg";
const NONCE: &str = "nonce";
const RESERVED: [&str; 4] = [KEY_ID, JWK, ALGORITHM, NONCE];

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("error parsing jwk json: {0}")]
    MalformedKey(#[source] serde_json::Error),
    #[error("\"{name}\" is not a string: {value}")]
    NotAString { name: &'static str, value: Value },
}

/// The outcome of looking up one reserved header member.
#[derive(Debug)]
pub enum Slot<T> {
    Absent,
    Present(T),
    Invalid(FieldError),
}

/// An embedded key after a successful round trip through [`Jwk`].
#[derive(Debug)]
pub struct EmbeddedKey {
    pub json: String,
    pub private: bool,
}

/// Everything a header dump prints, none of it verified.
#[derive(Debug)]
pub struct DisplayFields {
    pub key_id: Slot<String>,
    pub jwk: Slot<EmbeddedKey>,
    pub algorithm: Slot<String>,
    pub nonce: Slot<String>,
    pub extra: Vec<(String, Value)>,
}

fn string_slot(header: &Header, name: &'static str) -> Slot<String> {
    match header.get(name) {
        None => Slot::Absent,
        Some(Value::String(s)) => Slot::Present(s.clone()),
        Some(other) => Slot::Invalid(FieldError::NotAString {
            name,
            value: other.clone(),
        }),
    }
}

fn key_slot(header: &Header) -> Slot<EmbeddedKey> {
    let Some(value) = header.get(JWK) else {
        return Slot::Absent;
    };

    let jwk = match Jwk::from_value(value.clone()) {
        Ok(jwk) => jwk,
        Err(e) => return Slot::Invalid(FieldError::MalformedKey(e)),
    };

    match serde_json::to_string(&jwk) {
        Ok(json) => Slot::Present(EmbeddedKey {
            json,
            private: jwk.is_private(),
        }),
        Err(e) => Slot::Invalid(FieldError::MalformedKey(e)),
    }
}

/// Pulls the display slots out of a header. A missing header reports every
/// slot absent.
pub fn extract(header: Option<&Header>) -> DisplayFields {
    let Some(header) = header else {
        return DisplayFields {
            key_id: Slot::Absent,
            jwk: Slot::Absent,
            algorithm: Slot::Absent,
            nonce: Slot::Absent,
            extra: Vec::new(),
        };
    };

    DisplayFields {
        key_id: string_slot(header, KEY_ID),
        jwk: key_slot(header),
        algorithm: string_slot(header, ALGORITHM),
        nonce: string_slot(header, NONCE),
        extra: header
            .iter()
            .filter(|(name, _)| !RESERVED.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    }
}

/// Renders an extra member's value quoted: strings as-is, anything else as
/// its compact JSON text.
pub fn quote_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        other => format!("{:?}", other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn header(value: Value) -> Header {
        match value {
            Value::Object(map) => map,
            _ => panic!("test header must be an object"),
        }
    }

    fn present<T>(slot: &Slot<T>) -> Option<&T> {
        match slot {
            Slot::Present(v) => Some(v),
            _ => None,
        }
    }

    fn present_str(slot: &Slot<String>) -> Option<&str> {
        present(slot).map(String::as_str)
    }

    fn assert_all_absent(fields: &DisplayFields) {
        assert!(matches!(fields.key_id, Slot::Absent));
        assert!(matches!(fields.jwk, Slot::Absent));
        assert!(matches!(fields.algorithm, Slot::Absent));
        assert!(matches!(fields.nonce, Slot::Absent));
        assert!(fields.extra.is_empty());
    }

    #[test]
    fn missing_header_is_all_absent() {
        assert_all_absent(&extract(None));
    }

    #[test]
    fn empty_header_is_all_absent() {
        assert_all_absent(&extract(Some(&Header::new())));
    }

    #[test]
    fn extracts_reserved_fields() {
        let h = header(json!({"alg": "ES256", "kid": "k1", "nonce": "n-0S6_WzA2Mj"}));
        let fields = extract(Some(&h));

        assert_eq!(present_str(&fields.key_id), Some("k1"));
        assert_eq!(present_str(&fields.algorithm), Some("ES256"));
        assert_eq!(present_str(&fields.nonce), Some("n-0S6_WzA2Mj"));
        assert!(matches!(fields.jwk, Slot::Absent));
        assert!(fields.extra.is_empty());
    }

    #[test]
    fn custom_member_goes_to_extra_only() {
        let h = header(json!({"x-custom": "value"}));
        let fields = extract(Some(&h));

        assert_eq!(fields.extra, vec![("x-custom".to_string(), json!("value"))]);
        assert!(matches!(fields.key_id, Slot::Absent));
        assert!(matches!(fields.jwk, Slot::Absent));
        assert!(matches!(fields.algorithm, Slot::Absent));
        assert!(matches!(fields.nonce, Slot::Absent));
    }

    #[test]
    fn extra_keeps_discovery_order() {
        let h = header(json!({"typ": "JWT", "alg": "HS256", "crit": ["b64"], "b64": false}));
        let names: Vec<String> = extract(Some(&h)).extra.into_iter().map(|(n, _)| n).collect();

        assert_eq!(names, vec!["typ", "crit", "b64"]);
    }

    #[test]
    fn reserializes_embedded_key() {
        let h = header(json!({
            "alg": "EdDSA",
            "jwk": {
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"
            }
        }));
        let fields = extract(Some(&h));
        let key = present(&fields.jwk).unwrap();

        assert_eq!(
            serde_json::from_str::<Value>(&key.json).unwrap(),
            json!({
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"
            })
        );
        assert!(!key.private);
    }

    #[test]
    fn malformed_key_leaves_other_slots_intact() {
        let h = header(json!({
            "alg": "ES256",
            "kid": "k1",
            "nonce": "abc",
            "jwk": {"kty": "EC", "crv": "P-256"}
        }));
        let fields = extract(Some(&h));

        assert!(matches!(fields.jwk, Slot::Invalid(FieldError::MalformedKey(_))));
        assert_eq!(present_str(&fields.key_id), Some("k1"));
        assert_eq!(present_str(&fields.algorithm), Some("ES256"));
        assert_eq!(present_str(&fields.nonce), Some("abc"));
    }

    #[test]
    fn non_string_reserved_field_is_invalid() {
        let h = header(json!({"kid": 7}));

        assert!(matches!(
            extract(Some(&h)).key_id,
            Slot::Invalid(FieldError::NotAString { name: "kid", .. })
        ));
    }

    #[test]
    fn quotes_extra_values() {
        assert_eq!(quote_value(&json!("value")), "\"value\"");
        assert_eq!(quote_value(&json!(["b64"])), "\"[\\\"b64\\\"]\"");
        assert_eq!(quote_value(&json!(false)), "\"false\"");
    }
}
