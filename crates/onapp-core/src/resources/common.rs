//! Nested values and decode helpers shared by the resource models

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Per-disk or per-data-store IO throttling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoLimits {
    pub read_iops: Option<i64>,
    pub write_iops: Option<i64>,
    pub read_throughput: Option<i64>,
    pub write_throughput: Option<i64>,
    pub limits_override: Option<bool>,
}

/// Integrated storage cache tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratedStorageCacheSettings {
    pub ratio: Option<i64>,
    pub mode: Option<String>,
    pub policy: Option<String>,
}

/// Integer that some endpoints echo back as a string
///
/// An empty string decodes as absent.
pub(crate) fn int_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(n)) => Ok(Some(n)),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid integer '{}': {}", s, e))),
    }
}

/// Explicit `null` decodes the same as a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "int_or_string")]
        size: Option<i64>,
        #[serde(deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_int_or_string() {
        let sample: Sample = serde_json::from_value(json!({"size": 500})).unwrap();
        assert_eq!(sample.size, Some(500));

        let sample: Sample = serde_json::from_value(json!({"size": "500"})).unwrap();
        assert_eq!(sample.size, Some(500));

        let sample: Sample = serde_json::from_value(json!({"size": ""})).unwrap();
        assert_eq!(sample.size, None);

        let sample: Sample = serde_json::from_value(json!({"size": null})).unwrap();
        assert_eq!(sample.size, None);

        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample.size, None);

        assert!(serde_json::from_value::<Sample>(json!({"size": "lots"})).is_err());
    }

    #[test]
    fn test_null_as_default() {
        let sample: Sample = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(sample.tags.is_empty());

        let sample: Sample = serde_json::from_value(json!({"tags": ["a"]})).unwrap();
        assert_eq!(sample.tags, vec!["a".to_string()]);
    }
}
