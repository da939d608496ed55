//! Tolerant field decoding for third-party JSON.
//!
//! Remote services occasionally send `null` or a differently typed value in
//! a field we only read opportunistically. Such a field decodes as `None`
//! instead of failing the whole document.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// `deserialize_with` target: any value that does not fit `T` becomes `None`.
///
/// Use together with `#[serde(default)]` so an absent key is `None` too.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Reading {
        #[serde(default, deserialize_with = "lenient")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        unit: Option<String>,
    }

    fn read(json: &str) -> Reading {
        serde_json::from_str(json).expect("well-formed JSON should decode")
    }

    #[test]
    fn fitting_values_are_kept() {
        let r = read(r#"{"value": 15.2, "unit": "°C"}"#);
        assert_eq!(r.value, Some(15.2));
        assert_eq!(r.unit.as_deref(), Some("°C"));
    }

    #[test]
    fn absent_null_and_mistyped_values_are_unset() {
        let r = read(r#"{"unit": null}"#);
        assert_eq!(r.value, None);
        assert_eq!(r.unit, None);

        let r = read(r#"{"value": "15.2", "unit": 7}"#);
        assert_eq!(r.value, None);
        assert_eq!(r.unit, None);
    }
}
