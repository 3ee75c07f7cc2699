//! `application/x-www-form-urlencoded` bodies.
//!
//! Every POST parameter travels as a flat key/value pair. Lists are
//! comma-joined and nested objects are JSON-encoded before they become a
//! single form value.

use serde::Serialize;

use crate::error::ApiError;

pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encode a flat struct (or a slice of pairs) as a form body, in field order.
pub fn encode<T: Serialize + ?Sized>(fields: &T) -> Result<String, ApiError> {
    serde_urlencoded::to_string(fields).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Decode a form body into ordered pairs.
pub fn decode(body: &str) -> Result<Vec<(String, String)>, ApiError> {
    serde_urlencoded::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

/// Compact JSON text of `value`, for embedding as one form field.
pub fn embed_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AirConSettings, InfraredSignal};

    #[test]
    fn encodes_spaces_and_reserved_characters() {
        let body = encode(&[("nickname", "Remo & me"), ("image", "ico_a/c")]).unwrap();
        assert_eq!(body, "nickname=Remo+%26+me&image=ico_a%2Fc");
    }

    #[test]
    fn skips_absent_optional_fields() {
        let settings = AirConSettings {
            temperature: Some("26".to_string()),
            button: Some("power-off".to_string()),
            ..Default::default()
        };
        assert_eq!(encode(&settings).unwrap(), "temperature=26&button=power-off");
        assert_eq!(encode(&AirConSettings::default()).unwrap(), "");
    }

    #[test]
    fn joined_list_becomes_one_field() {
        let ids = join_list(&["a1", "b2", "c3"]);
        assert_eq!(ids, "a1,b2,c3");
        assert_eq!(encode(&[("appliances", ids.as_str())]).unwrap(), "appliances=a1%2Cb2%2Cc3");
        assert_eq!(join_list::<&str>(&[]), "");
    }

    #[test]
    fn embedded_json_survives_a_form_roundtrip() {
        let signal = InfraredSignal {
            format: "us".to_string(),
            freq: 38,
            data: vec![3400, 1700, 450],
        };
        let message = embed_json(&signal).unwrap();
        assert_eq!(message, r#"{"format":"us","freq":38,"data":[3400,1700,450]}"#);

        let body = encode(&[("message", message.as_str())]).unwrap();
        let pairs = decode(&body).unwrap();
        assert_eq!(pairs, vec![("message".to_string(), message)]);
    }
}
