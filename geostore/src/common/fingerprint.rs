use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::GeoStoreResult;

/// Computes the fingerprint of a structured value.
///
/// The value is encoded as compact JSON with object keys sorted at every
/// level, and the encoding is hashed with SHA-256. The result is the
/// lowercase hex digest. Key order never changes the fingerprint; values
/// and array order always do.
///
/// # Examples
///
/// ```rust
/// use geostore::common::fingerprint;
/// use serde_json::json;
///
/// let a = fingerprint(&json!({"iso": "BRA", "kind": "country"})).unwrap();
/// let b = fingerprint(&json!({"kind": "country", "iso": "BRA"})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn fingerprint(value: &Value) -> GeoStoreResult<String> {
    let bytes = canonical_bytes(value)?;
    Ok(hex::encode(Sha256::digest(bytes)))
}

/// Fingerprints any serializable value through its JSON form.
pub fn fingerprint_of<T: serde::Serialize>(value: &T) -> GeoStoreResult<String> {
    let json = serde_json::to_value(value)?;
    fingerprint(&json)
}

fn canonical_bytes(value: &Value) -> GeoStoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(&Canonical(value))?)
}

/// Serializes a JSON value with object keys in sorted order regardless of
/// how the map was built.
struct Canonical<'a>(&'a Value);

impl serde::Serialize for Canonical<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self.0 {
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Canonical(item))?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let sorted: BTreeMap<&String, &Value> = map.iter().collect();
                let mut out = serializer.serialize_map(Some(sorted.len()))?;
                for (k, v) in sorted {
                    out.serialize_entry(k, &Canonical(v))?;
                }
                out.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}
