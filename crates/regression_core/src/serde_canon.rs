//! Canonical JSON encoding for fitted predictor state
//!
//! - Object keys sorted recursively
//! - No whitespace
//! - Floats written in shortest round-trip form
//! - BLAKE3 fingerprint over the canonical bytes

use serde::Serialize;

/// Serialize a value to canonical JSON (sorted keys, no whitespace)
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    // Without `preserve_order`, serde_json maps are BTreeMaps: keys come out sorted
    serde_json::to_string(&serde_json::to_value(value)?)
}

/// Compute Blake3 hash of canonical JSON representation
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<[u8; 32], serde_json::Error> {
    let json = to_canonical_json(value)?;
    Ok(*blake3::hash(json.as_bytes()).as_bytes())
}

/// Compute Blake3 hash and return as hex string
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(hex::encode(hash_canonical(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Noise {
        partial: f64,
        full: f64,
        columns: Vec<&'static str>,
    }

    fn sample() -> Noise {
        Noise {
            partial: 0.125,
            full: 0.1,
            columns: vec!["period", "apogee"],
        }
    }

    #[test]
    fn test_keys_sorted_without_whitespace() {
        let json = to_canonical_json(&sample()).unwrap();
        assert_eq!(json, r#"{"columns":["period","apogee"],"full":0.1,"partial":0.125}"#);
    }

    #[test]
    fn test_nested_map_keys_sorted() {
        let mut inner = std::collections::HashMap::new();
        inner.insert("zeta", 1);
        inner.insert("alpha", 2);
        let mut outer = std::collections::HashMap::new();
        outer.insert("orbit", inner);
        outer.insert("apogee", std::collections::HashMap::new());
        let json = to_canonical_json(&outer).unwrap();
        assert_eq!(json, r#"{"apogee":{},"orbit":{"alpha":2,"zeta":1}}"#);
    }

    #[test]
    fn test_floats_round_trip_exactly() {
        let awkward: [f64; 4] = [0.1 + 0.2, 1.0 / 3.0, -2.5e-300, 123456789.123456789];
        let json = to_canonical_json(&awkward.to_vec()).unwrap();
        let restored: Vec<f64> = serde_json::from_str(&json).unwrap();
        for (a, b) in awkward.iter().zip(&restored) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        let h1 = hash_canonical_hex(&sample()).unwrap();
        let h2 = hash_canonical_hex(&sample()).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);

        let mut changed = sample();
        changed.full = 0.2;
        assert_ne!(h1, hash_canonical_hex(&changed).unwrap());
    }
}
