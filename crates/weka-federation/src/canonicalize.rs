//!
//! Canonical JSON rendering of activity documents
//!

use miette::Diagnostic;
use serde_json::{Map, Value};
use thiserror::Error;

/// Canonicalization error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Document failed to re-serialise
    #[error(transparent)]
    Serialisation(#[from] serde_json::Error),
}

/// A document in its canonical form
///
/// Holds both the structured value and the canonical byte rendering so
/// later pipeline stages don't have to re-serialise.
#[derive(Clone, Debug)]
pub struct CanonicalDocument {
    value: Value,
    bytes: Vec<u8>,
}

impl CanonicalDocument {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Deterministic rendering of a parsed document
pub trait Canonicalize {
    /// Canonicalize a document
    fn canonicalize(&self, document: &Value) -> Result<CanonicalDocument, Error>;
}

/// Canonicalizer that sorts object keys recursively and serialises
/// without insignificant whitespace
///
/// Two structurally equal documents always render to the same bytes,
/// and canonicalizing an already canonical document is a no-op.
#[derive(Clone, Copy, Default)]
pub struct JsonCanonicalizer;

impl JsonCanonicalizer {
    fn sort_keys(value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut sorted = map
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::sort_keys(value)))
                    .collect::<Vec<_>>();
                sorted.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

                Value::Object(Map::from_iter(sorted))
            }
            Value::Array(items) => Value::Array(items.iter().map(Self::sort_keys).collect()),
            value => value.clone(),
        }
    }
}

impl Canonicalize for JsonCanonicalizer {
    fn canonicalize(&self, document: &Value) -> Result<CanonicalDocument, Error> {
        let value = Self::sort_keys(document);
        let bytes = serde_json::to_vec(&value)?;

        Ok(CanonicalDocument { value, bytes })
    }
}

#[cfg(test)]
mod test {
    use super::{Canonicalize, JsonCanonicalizer};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z0-9]{0,8}".prop_map(Value::from),
        ];

        leaf.prop_recursive(4, 32, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("[a-z0-9]{1,8}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    #[test]
    fn key_order_is_irrelevant() {
        let first = json!({"b": 1, "a": {"d": 2, "c": 3}});
        let second = json!({"a": {"c": 3, "d": 2}, "b": 1});

        let first = JsonCanonicalizer.canonicalize(&first).unwrap();
        let second = JsonCanonicalizer.canonicalize(&second).unwrap();

        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    proptest! {
        #[test]
        fn canonicalization_is_idempotent(document in arb_json()) {
            let once = JsonCanonicalizer.canonicalize(&document).unwrap();
            let twice = JsonCanonicalizer.canonicalize(once.value()).unwrap();

            prop_assert_eq!(once.as_bytes(), twice.as_bytes());
        }
    }
}
