//! Hashing - SHA-256 digests for build reports
//!
//! Identifies exactly which bytes were written and which profile produced them.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

use crate::profile::ProfileInput;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// profile_hash = sha256(canonical_profile + ":" + engine_version)
pub fn compute_profile_hash(
    profile: &ProfileInput,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(profile)?;
    let combined = format!("{}:{}", canonical, engine_version);
    Ok(sha256_hex(combined.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_profile_hash_tracks_content() {
        let a = ProfileInput::from_form("Ada", "1", "a@b.co", "BSc", "Rust");
        let b = ProfileInput::from_form("Ada", "2", "a@b.co", "BSc", "Rust");
        let h1 = compute_profile_hash(&a, "1.0.0").unwrap();
        assert_eq!(h1, compute_profile_hash(&a.clone(), "1.0.0").unwrap());
        assert_ne!(h1, compute_profile_hash(&b, "1.0.0").unwrap());
        assert_ne!(h1, compute_profile_hash(&a, "2.0.0").unwrap());
    }
}
