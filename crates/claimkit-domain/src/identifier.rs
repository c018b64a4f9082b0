//! Deterministic identifiers for documents, claims and properties

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Root namespace every identifier path is hashed under.
///
/// Changing this value changes every identifier ever produced, so it is fixed.
pub const ROOT_NAMESPACE: Uuid = Uuid::from_bytes([
    0x8e, 0x1c, 0x6b, 0x52, 0x3f, 0x0a, 0x4d, 0x91, 0xb7, 0x26, 0x5e, 0x4f, 0xa0, 0x93, 0xc1, 0x7d,
]);

/// Segment prefix used for the identifiers of core properties
pub const CORE_PROPERTY_SEGMENT: &str = "CORE_PROPERTY";

/// One element of an identifier path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A textual segment, hashed as its UTF-8 bytes
    Text(String),
    /// A numeric segment, hashed as its base-10 rendering
    Number(i64),
}

impl Segment {
    /// Bytes fed into the hash for this segment
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Segment::Text(s) => s.as_bytes().to_vec(),
            Segment::Number(n) => n.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Text(s) => f.write_str(s),
            Segment::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Segment::Text(s.to_string())
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Segment::Text(s)
    }
}

impl From<&String> for Segment {
    fn from(s: &String) -> Self {
        Segment::Text(s.clone())
    }
}

impl From<i64> for Segment {
    fn from(n: i64) -> Self {
        Segment::Number(n)
    }
}

impl From<usize> for Segment {
    fn from(n: usize) -> Self {
        // Claim sequence indices never approach i64::MAX.
        Segment::Number(n as i64)
    }
}

/// Opaque, fixed-size identifier derived from an ordered segment path
///
/// The same segment path always yields the same identifier, across processes
/// and implementations: starting from [`ROOT_NAMESPACE`], each segment is folded
/// in with a UUIDv5 (SHA-1, name-based) step that uses the previous identifier
/// as its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(Uuid);

impl Identifier {
    /// Generate the identifier for an ordered segment path
    ///
    /// # Examples
    ///
    /// ```
    /// use claimkit_domain::Identifier;
    ///
    /// let a = Identifier::generate(["example", "source", "42"]);
    /// let b = Identifier::generate(["example", "source", "42"]);
    /// assert_eq!(a, b);
    /// assert_ne!(a, Identifier::generate(["example", "source", "43"]));
    /// ```
    pub fn generate<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        let uuid = segments.into_iter().fold(ROOT_NAMESPACE, |namespace, segment| {
            Uuid::new_v5(&namespace, &segment.into().to_bytes())
        });
        Self(uuid)
    }

    /// Identifier of the empty path
    pub fn root() -> Self {
        Self(ROOT_NAMESPACE)
    }

    /// Identifier of a core property, derived from its mnemonic
    pub fn core_property(mnemonic: &str) -> Self {
        Self::generate([CORE_PROPERTY_SEGMENT, mnemonic])
    }

    /// Wrap a raw UUID (storage deserialization)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an identifier from its textual form
    pub fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid identifier string: {}", e))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for Identifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Append segments to an identifier path, returning the extended path
pub fn extend_path<I, S>(path: &[Segment], segments: I) -> Vec<Segment>
where
    I: IntoIterator<Item = S>,
    S: Into<Segment>,
{
    let mut extended = path.to_vec();
    extended.extend(segments.into_iter().map(Into::into));
    extended
}

/// Render a segment path as `a/b/c` for diagnostics
pub fn display_path(path: &[Segment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
