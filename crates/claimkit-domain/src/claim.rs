//! Claim module - typed, confidence-scored assertions about a document

use crate::{AmountUnit, Confidence, DomainError, Identifier, TimePrecision, Timestamp};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Discriminant of a claim, used to group claims inside a [`ClaimSet`]
///
/// The declaration order is the order kinds are listed in a claim set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimKind {
    /// Opaque external identifier
    Identifier,
    /// Plain string
    String,
    /// Sanitized HTML per language
    Text,
    /// Link to another document
    Relation,
    /// Link to an external resource by IRI
    Reference,
    /// Point in time
    Time,
    /// Time interval
    TimeRange,
    /// Numeric amount with a unit
    Amount,
    /// File reference
    File,
    /// Known to be absent
    NoValue,
    /// Exists but undetermined
    UnknownValue,
}

impl ClaimKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::Identifier => "identifier",
            ClaimKind::String => "string",
            ClaimKind::Text => "text",
            ClaimKind::Relation => "relation",
            ClaimKind::Reference => "reference",
            ClaimKind::Time => "time",
            ClaimKind::TimeRange => "timeRange",
            ClaimKind::Amount => "amount",
            ClaimKind::File => "file",
            ClaimKind::NoValue => "noValue",
            ClaimKind::UnknownValue => "unknownValue",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind payload of a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClaimValue {
    /// Opaque identifier string
    Identifier {
        /// Identifier value
        value: String,
    },
    /// Plain string
    String {
        /// String value
        value: String,
    },
    /// HTML text keyed by language
    Text {
        /// Language → sanitized HTML
        html: BTreeMap<String, String>,
    },
    /// Relation to another document
    Relation {
        /// Target document
        to: Identifier,
    },
    /// Reference to an external resource
    Reference {
        /// Target IRI
        iri: String,
    },
    /// Point in time
    Time {
        /// Timestamp
        timestamp: Timestamp,
        /// Precision of the timestamp
        precision: TimePrecision,
    },
    /// Interval of time
    #[serde(rename_all = "camelCase")]
    TimeRange {
        /// Lower bound
        lower: Timestamp,
        /// Upper bound
        upper: Timestamp,
        /// Precision of both bounds
        precision: TimePrecision,
    },
    /// Numeric amount
    Amount {
        /// Amount
        amount: f64,
        /// Unit of the amount
        unit: AmountUnit,
    },
    /// File reference
    #[serde(rename_all = "camelCase")]
    File {
        /// Media type of the file
        media_type: String,
        /// Where the file can be fetched
        url: String,
        /// Preview image URLs
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        preview: Vec<String>,
    },
    /// Known to be absent
    NoValue,
    /// Exists but undetermined
    UnknownValue,
}

impl ClaimValue {
    /// The kind this payload belongs to
    pub fn kind(&self) -> ClaimKind {
        match self {
            ClaimValue::Identifier { .. } => ClaimKind::Identifier,
            ClaimValue::String { .. } => ClaimKind::String,
            ClaimValue::Text { .. } => ClaimKind::Text,
            ClaimValue::Relation { .. } => ClaimKind::Relation,
            ClaimValue::Reference { .. } => ClaimKind::Reference,
            ClaimValue::Time { .. } => ClaimKind::Time,
            ClaimValue::TimeRange { .. } => ClaimKind::TimeRange,
            ClaimValue::Amount { .. } => ClaimKind::Amount,
            ClaimValue::File { .. } => ClaimKind::File,
            ClaimValue::NoValue => ClaimKind::NoValue,
            ClaimValue::UnknownValue => ClaimKind::UnknownValue,
        }
    }
}

/// A claim - one typed assertion about a document
///
/// Claims are immutable once a document is returned; they may carry meta
/// claims qualifying themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Deterministic identifier
    pub id: Identifier,

    /// Property the claim is about
    pub property: Identifier,

    /// Confidence in the claim
    pub confidence: Confidence,

    /// Claims qualifying this claim
    #[serde(default, skip_serializing_if = "ClaimSet::is_empty")]
    pub meta: ClaimSet,

    /// Kind-specific payload
    #[serde(flatten)]
    pub value: ClaimValue,
}

impl Claim {
    /// Create a claim without meta claims
    pub fn new(id: Identifier, property: Identifier, confidence: Confidence, value: ClaimValue) -> Self {
        Self {
            id,
            property,
            confidence,
            meta: ClaimSet::new(),
            value,
        }
    }

    /// Attach meta claims
    pub fn with_meta(mut self, meta: ClaimSet) -> Self {
        self.meta = meta;
        self
    }

    /// Kind of this claim
    pub fn kind(&self) -> ClaimKind {
        self.value.kind()
    }
}

/// Claims grouped by kind, each group in creation order
///
/// Serializes as a map from kind to claims.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    groups: BTreeMap<ClaimKind, Vec<Claim>>,
    ids: HashSet<Identifier>,
}

impl ClaimSet {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim
    ///
    /// # Errors
    /// Fails if a claim with the same identifier is already in the set
    pub fn add(&mut self, claim: Claim) -> Result<(), DomainError> {
        if !self.ids.insert(claim.id) {
            return Err(DomainError::DuplicateClaim(claim.id));
        }
        self.groups.entry(claim.kind()).or_default().push(claim);
        Ok(())
    }

    /// Whether a claim of this set (not of its meta claims) has the identifier
    pub fn contains(&self, id: &Identifier) -> bool {
        self.ids.contains(id)
    }

    /// Find a claim of this set (not of its meta claims) by identifier
    pub fn get(&self, id: &Identifier) -> Option<&Claim> {
        if !self.contains(id) {
            return None;
        }
        self.iter().find(|c| c.id == *id)
    }

    /// Claims of one kind, in creation order
    pub fn by_kind(&self, kind: ClaimKind) -> &[Claim] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Claims with the given property, in kind order
    pub fn by_property<'a>(&'a self, property: &'a Identifier) -> impl Iterator<Item = &'a Claim> + 'a {
        self.iter().filter(move |c| c.property == *property)
    }

    /// Iterate top-level claims: kind order, then creation order
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.groups.values().flatten()
    }

    /// Depth-first walk over claims and their meta claims
    pub fn walk(&self) -> Walk<'_> {
        let mut stack: Vec<&Claim> = self.iter().collect();
        stack.reverse();
        Walk { stack }
    }

    /// Number of top-level claims
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether the set holds no claims
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for ClaimSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.groups.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let groups = BTreeMap::<ClaimKind, Vec<Claim>>::deserialize(deserializer)?;
        let mut set = ClaimSet::new();
        for claim in groups.into_values().flatten() {
            set.add(claim).map_err(D::Error::custom)?;
        }
        Ok(set)
    }
}

/// Depth-first iterator returned by [`ClaimSet::walk`]
pub struct Walk<'a> {
    stack: Vec<&'a Claim>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Claim;

    fn next(&mut self) -> Option<Self::Item> {
        let claim = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(claim.meta.iter());
        self.stack[start..].reverse();
        Some(claim)
    }
}
