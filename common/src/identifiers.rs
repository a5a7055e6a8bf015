//! Identifier types for QuoteStack entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted quote.
///
/// Assigned by the persistence layer; valid identifiers are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(i64);

impl QuoteId {
    /// Create a quote ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }

    /// Persisted identifiers are positive integers.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuoteId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(i64);

impl DealId {
    /// Create a deal ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DealId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Reference to a quote row inside one comparison.
///
/// Persisted quotes are referenced by their [`QuoteId`] and serialize as the
/// bare integer. Rows that are active but not yet saved have no identifier,
/// so they are referenced by their position in the snapshot the comparison
/// was run over and serialize as `{"draft": index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "QuoteKeyRepr", into = "QuoteKeyRepr")]
pub enum QuoteKey {
    /// A persisted quote.
    Id(QuoteId),
    /// An unsaved row, by index in the input snapshot.
    Draft(usize),
}

impl QuoteKey {
    /// Key for the row at `index`, preferring its persisted ID.
    pub fn for_row(id: Option<QuoteId>, index: usize) -> Self {
        match id {
            Some(id) => QuoteKey::Id(id),
            None => QuoteKey::Draft(index),
        }
    }

    /// The persisted ID, if this key refers to a saved quote.
    pub fn quote_id(&self) -> Option<QuoteId> {
        match self {
            QuoteKey::Id(id) => Some(*id),
            QuoteKey::Draft(_) => None,
        }
    }
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteKey::Id(id) => write!(f, "quote:{}", id),
            QuoteKey::Draft(index) => write!(f, "draft:{}", index),
        }
    }
}

impl From<QuoteId> for QuoteKey {
    fn from(id: QuoteId) -> Self {
        QuoteKey::Id(id)
    }
}

/// Wire shape of [`QuoteKey`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum QuoteKeyRepr {
    Id(QuoteId),
    Draft { draft: usize },
}

impl From<QuoteKeyRepr> for QuoteKey {
    fn from(repr: QuoteKeyRepr) -> Self {
        match repr {
            QuoteKeyRepr::Id(id) => QuoteKey::Id(id),
            QuoteKeyRepr::Draft { draft } => QuoteKey::Draft(draft),
        }
    }
}

impl From<QuoteKey> for QuoteKeyRepr {
    fn from(key: QuoteKey) -> Self {
        match key {
            QuoteKey::Id(id) => QuoteKeyRepr::Id(id),
            QuoteKey::Draft(draft) => QuoteKeyRepr::Draft { draft },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_id_validity() {
        assert!(QuoteId::new(1).is_valid());
        assert!(!QuoteId::new(0).is_valid());
        assert!(!QuoteId::new(-4).is_valid());
    }

    #[test]
    fn test_quote_key_prefers_id() {
        assert_eq!(QuoteKey::for_row(Some(QuoteId::new(7)), 3), QuoteKey::Id(QuoteId::new(7)));
        assert_eq!(QuoteKey::for_row(None, 3), QuoteKey::Draft(3));
        assert_eq!(QuoteKey::Draft(3).quote_id(), None);
    }

    #[test]
    fn test_quote_key_serialization() {
        let json = serde_json::to_string(&QuoteKey::Id(QuoteId::new(12))).unwrap();
        assert_eq!(json, "12");

        let json = serde_json::to_string(&QuoteKey::Draft(0)).unwrap();
        assert_eq!(json, r#"{"draft":0}"#);
    }

    #[test]
    fn test_quote_key_deserialization() {
        let keys: Vec<QuoteKey> = serde_json::from_str(r#"[3, {"draft": 1}]"#).unwrap();
        assert_eq!(keys, vec![QuoteKey::Id(QuoteId::new(3)), QuoteKey::Draft(1)]);
    }
}
