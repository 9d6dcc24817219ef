//! `serde` helpers for `num_bigint::BigUint`, which has no `Serialize`/`Deserialize` impl of its
//! own that round-trips through a human-readable wire format. Values are encoded as decimal
//! strings so the payloads stay readable and transport-agnostic (JSON, logs, REPL output), the
//! same way this codebase's other crates wrap a foreign numeric type at a crate boundary.

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `#[serde(with = "biguint_serde")]` for a single `BigUint` field.
pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
    deserializer.deserialize_str(DecimalVisitor)
}

struct DecimalVisitor;

impl serde::de::Visitor<'_> for DecimalVisitor {
    type Value = BigUint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal-encoded unsigned big integer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<BigUint>()
            .map_err(|e| E::custom(format!("invalid decimal BigUint {v:?}: {e}")))
    }
}

/// `#[serde(with = "biguint_serde::vec")]` for a `Vec<BigUint>` field, used by the commitment
/// vectors in the stage-1 and stage-2 payloads.
pub mod vec {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        let as_strings: Vec<String> = values.iter().map(|v| v.to_str_radix(10)).collect();
        as_strings.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<BigUint>, D::Error> {
        let as_strings = Vec::<String>::deserialize(deserializer)?;
        as_strings
            .into_iter()
            .map(|s| {
                s.parse::<BigUint>()
                    .map_err(|e| serde::de::Error::custom(format!("invalid decimal BigUint {s:?}: {e}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Wrapper {
        #[serde(with = "crate::biguint_serde")]
        value: BigUint,
        #[serde(with = "crate::biguint_serde::vec")]
        values: Vec<BigUint>,
    }

    #[test]
    fn round_trips_through_json() {
        let original = Wrapper {
            value: BigUint::from(123456789u64),
            values: vec![BigUint::from(1u32), BigUint::from(2u32), BigUint::from(3u32)],
        };
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"123456789\""));
        let round_tripped: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(original, round_tripped);
    }

    #[test]
    fn rejects_non_decimal_strings() {
        let err = serde_json::from_str::<Wrapper>(r#"{"value":"not-a-number","values":[]}"#);
        assert!(err.is_err());
    }
}
