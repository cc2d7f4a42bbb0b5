//! Typed builder for declarative ledger queries.
//!
//! The query engine consumes a JSON document of the form
//! `{"selector": {field: value | {"$gte": n, "$lte": n}}, "sort":
//! [{field: "asc"|"desc"}]}`. [`Selector`] builds exactly that shape
//! through serde, so the stores never concatenate query strings by hand.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sort direction for a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// A single condition on one document field.
///
/// `Between` must precede `Eq` in the untagged ordering: an equality match
/// against an arbitrary JSON value would otherwise swallow range objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Inclusive numeric range match.
    Between {
        /// Lower bound, inclusive.
        #[serde(rename = "$gte")]
        gte: i64,
        /// Upper bound, inclusive.
        #[serde(rename = "$lte")]
        lte: i64,
    },
    /// Exact equality match.
    Eq(serde_json::Value),
}

/// One sort instruction, serialized as a single-entry map like
/// `{"timestamp": "desc"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.direction)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SortSpecVisitor;

        impl<'de> Visitor<'de> for SortSpecVisitor {
            type Value = SortSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-entry map of field name to sort direction")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let (field, direction): (String, SortDirection) = access
                    .next_entry()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                Ok(SortSpec { field, direction })
            }
        }

        deserializer.deserialize_map(SortSpecVisitor)
    }
}

/// A declarative query over the ledger's JSON documents.
///
/// # Examples
///
/// ```rust
/// use custodia_ledger::Selector;
///
/// let selector = Selector::new()
///     .field_eq("userId", "user-alice")
///     .sort_desc("timestamp");
///
/// let json = serde_json::to_value(&selector).unwrap();
/// assert_eq!(json["selector"]["userId"], "user-alice");
/// assert_eq!(json["sort"][0]["timestamp"], "desc");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selector {
    /// Field conditions, all of which must match.
    pub selector: BTreeMap<String, Condition>,

    /// Sort instructions, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
}

impl Selector {
    /// Creates an empty selector matching every document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact equality condition on a field.
    #[must_use]
    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.selector.insert(field.into(), Condition::Eq(value.into()));
        self
    }

    /// Adds an inclusive numeric range condition on a field.
    #[must_use]
    pub fn field_between(mut self, field: impl Into<String>, gte: i64, lte: i64) -> Self {
        self.selector
            .insert(field.into(), Condition::Between { gte, lte });
        self
    }

    /// Adds an ascending sort on a field.
    #[must_use]
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort.push(SortSpec {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    /// Adds a descending sort on a field.
    #[must_use]
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort.push(SortSpec {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_selector_shape() {
        let selector = Selector::new()
            .field_eq("action", "CREATE")
            .sort_desc("timestamp");

        let value = serde_json::to_value(&selector).unwrap();
        assert_eq!(
            value,
            json!({
                "selector": {"action": "CREATE"},
                "sort": [{"timestamp": "desc"}]
            })
        );
    }

    #[test]
    fn test_range_selector_shape() {
        let selector = Selector::new()
            .field_between("timestamp", 100, 500)
            .sort_desc("timestamp");

        let value = serde_json::to_value(&selector).unwrap();
        assert_eq!(
            value,
            json!({
                "selector": {"timestamp": {"$gte": 100, "$lte": 500}},
                "sort": [{"timestamp": "desc"}]
            })
        );
    }

    #[test]
    fn test_empty_sort_omitted() {
        let selector = Selector::new().field_eq("userId", "u-1");
        let value = serde_json::to_value(&selector).unwrap();
        assert!(value.get("sort").is_none());
    }

    #[test]
    fn test_selector_roundtrip() {
        let selector = Selector::new()
            .field_eq("userId", "u-1")
            .field_between("timestamp", 1, 2)
            .sort_asc("timestamp");

        let json = serde_json::to_string(&selector).unwrap();
        let decoded: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(selector, decoded);
    }

    #[test]
    fn test_range_not_parsed_as_equality() {
        let decoded: Selector =
            serde_json::from_str(r#"{"selector":{"timestamp":{"$gte":1,"$lte":9}}}"#).unwrap();
        assert_eq!(
            decoded.selector["timestamp"],
            Condition::Between { gte: 1, lte: 9 }
        );
    }
}
