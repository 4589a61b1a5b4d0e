// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic JSON codec for all consensus-critical data.
//!
//! Every replica must produce byte-identical signing preimages and state
//! digests, so all serialization for hashing goes through this module. The
//! rules are fixed: primitives in standard JSON literal form, arrays with no
//! separators other than commas, object keys sorted by the bytewise order of
//! their UTF-8 encoding, and no whitespace anywhere. Centralizing the codec
//! here in the base `types` crate ensures that all components use the exact
//! same serialization, preventing consensus failures due to different textual
//! representations of the same value.

use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Encodes a value into its canonical byte representation.
///
/// The value is first converted to a `serde_json::Value` (which statically
/// rules out non-string keys and non-finite numbers, the two producer-side
/// programming errors) and then written with the canonical rules.
pub fn to_bytes_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    let value = serde_json::to_value(v).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(canonical_bytes(&value))
}

/// Decodes a value from a canonical (or any valid JSON) byte representation.
///
/// This function fails fast on any decoding error. Malformed data must never
/// be half-processed in a consensus context.
pub fn from_bytes_canonical<T: DeserializeOwned>(b: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(b).map_err(|e| CodecError::Decode(format!("canonical decode failed: {e}")))
}

/// Writes a `serde_json::Value` with the canonical rules. Infallible: the
/// `Value` type cannot represent NaN/Infinity or non-string keys.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    write_value(&mut out, value);
    out
}

/// SHA-256 over the canonical bytes of `v`, rendered as 64 lowercase hex chars.
///
/// This single digest function serves three purposes: the signing preimage of
/// every authenticated operation, the whole-state digest used for replica
/// cross-checks, and (via [`digest_str`]) identifier derivation.
pub fn digest_value<T: Serialize>(v: &T) -> Result<String, CodecError> {
    Ok(hex::encode(Sha256::digest(to_bytes_canonical(v)?)))
}

/// SHA-256 over the literal UTF-8 bytes of `s`, as 64 lowercase hex chars.
///
/// Used where the preimage is a plain string concatenation rather than a
/// canonical-encoded value: the vault id (`owner + ":" + salt`), simulated
/// token ids, and error ids.
pub fn digest_str(s: &str) -> String {
    hex::encode(Sha256::digest(s.as_bytes()))
}

/// SHA-256 over raw bytes, as the 32-byte digest.
pub fn sha256_raw(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        // serde_json renders numbers deterministically (integers without a
        // decimal point, floats via the shortest round-trippable form).
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item);
            }
            out.push(b']');
        }
        Value::Object(map) => {
            // Keys are sorted bytewise regardless of the map's own iteration
            // order, so the output is stable even if a downstream crate turns
            // on serde_json's `preserve_order` feature.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(out, key);
                out.push(b':');
                if let Some(v) = map.get(key) {
                    write_value(out, v);
                }
            }
            out.push(b'}');
        }
    }
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    // Delegate escaping to serde_json so the literal form matches standard
    // JSON output exactly.
    match serde_json::to_vec(s) {
        Ok(bytes) => out.extend_from_slice(&bytes),
        // Unreachable for a plain string; keep the codec total.
        Err(_) => out.extend_from_slice(b"\"\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_output_has_sorted_keys_and_no_whitespace() {
        let v = json!({"zeta": 1, "alpha": {"b": [1, 2, 3], "a": null}, "mid": true});
        let bytes = canonical_bytes(&v);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"alpha":{"a":null,"b":[1,2,3]},"mid":true,"zeta":1}"#
        );
    }

    #[test]
    fn canonical_output_is_construction_order_independent() {
        let a = json!({"owner": "rXXX", "salt": "aabb", "type": "individual"});
        let mut b = serde_json::Map::new();
        b.insert("type".to_string(), json!("individual"));
        b.insert("salt".to_string(), json!("aabb"));
        b.insert("owner".to_string(), json!("rXXX"));
        assert_eq!(canonical_bytes(&a), canonical_bytes(&Value::Object(b)));
    }

    #[test]
    fn digest_is_idempotent_over_reparse() {
        let v = json!({"vaultId": "abc", "entryIndex": 0, "tokenId": null});
        let bytes = canonical_bytes(&v);
        let reparsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(digest_value(&v).unwrap(), digest_value(&reparsed).unwrap());
    }

    #[test]
    fn digest_str_matches_known_sha256_vectors() {
        assert_eq!(
            digest_str("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest_str(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn string_escaping_matches_standard_json() {
        let v = json!({"k\"ey": "line\nbreak\t\"quote\""});
        let bytes = canonical_bytes(&v);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"k\"ey":"line\nbreak\t\"quote\""}"#
        );
    }

    #[test]
    fn numbers_keep_integer_and_decimal_forms() {
        let v = json!([0, -7, 42, 1.5]);
        assert_eq!(String::from_utf8(canonical_bytes(&v)).unwrap(), "[0,-7,42,1.5]");
    }

    #[test]
    fn typed_roundtrip_through_canonical_bytes() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Probe {
            id: u32,
            name: String,
            tags: Vec<u8>,
        }
        let original = Probe {
            id: 42,
            name: "test-data".to_string(),
            tags: vec![1, 2, 3],
        };
        let encoded = to_bytes_canonical(&original).unwrap();
        let decoded: Probe = from_bytes_canonical(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn decode_failure_is_reported() {
        let mut encoded = canonical_bytes(&json!({"id": 99}));
        encoded.pop();
        let result: Result<Value, _> = from_bytes_canonical(&encoded);
        assert!(result.unwrap_err().to_string().contains("canonical decode failed"));
    }
}
