use serde::{Deserialize, Serialize};

// ============ Zone Types ============

/// A hosted zone visible to the provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostedZone {
    /// Provider-assigned zone identifier.
    pub id: String,
    /// Zone apex name (e.g., `"example.com"`).
    pub name: String,
}

// ============ Record Types ============

/// DNS record type of a record set.
///
/// Only [`RecordType::A`] is ever written by this crate's consumers. The other
/// variants exist so that listing a zone with mixed content never fails;
/// anything unrecognised lands in [`RecordType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Srv,
    Caa,
    Other(String),
}

impl RecordType {
    /// Upper-case wire name (`"A"`, `"AAAA"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "NS" => Self::Ns,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record set: every value published under one (name, type) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSet {
    /// Fully-qualified record name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// TTL in seconds.
    pub ttl: u32,
    /// Raw record values as published by the provider.
    pub values: Vec<String>,
}

// ============ Change Types ============

/// Mutation applied to a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create the record set, or replace all of its values.
    Upsert,
    /// Remove the given values from the record set (the whole set for single-value sets).
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upsert => write!(f, "UPSERT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single record-set change request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordChange {
    /// UPSERT or DELETE.
    pub action: ChangeAction,
    /// Fully-qualified record name.
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// TTL in seconds.
    pub ttl: u32,
    /// Values carried by the change. Order is not significant.
    pub values: Vec<String>,
    /// Optional human-readable summary attached to the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordChange {
    /// Build an UPSERT of an A record set.
    #[must_use]
    pub fn upsert_a(name: impl Into<String>, ttl: u32, values: Vec<String>) -> Self {
        Self {
            action: ChangeAction::Upsert,
            name: name.into(),
            record_type: RecordType::A,
            ttl,
            values,
            comment: None,
        }
    }

    /// Build a DELETE of values from an A record set.
    #[must_use]
    pub fn delete_a(name: impl Into<String>, ttl: u32, values: Vec<String>) -> Self {
        Self {
            action: ChangeAction::Delete,
            name: name.into(),
            record_type: RecordType::A,
            ttl,
            values,
            comment: None,
        }
    }

    /// Attach a comment to the change.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
