//! Findings reported by the validator and the locators that point at them.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// What class of problem a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Duplicate identifiers, missing required fields, misplaced variant fields.
    Structural,
    /// Dangling graph link endpoints.
    Referential,
    /// Value outside a closed set.
    Enum,
    /// Number outside its declared scale.
    Range,
    /// Likely authoring mistake that does not block acceptance.
    Advisory,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingKind::Structural => "structural",
            FindingKind::Referential => "referential",
            FindingKind::Enum => "enum",
            FindingKind::Range => "range",
            FindingKind::Advisory => "advisory",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Field(&'static str),
    Index(usize),
    /// Position plus the entity's identifier, e.g. `sections[2](economy)`.
    Keyed(usize, String),
}

/// Stable path to an entity inside a dataset.
///
/// Renders as `sections[3](key-contacts).tabs[1](government).keyContacts[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locator(Vec<Segment>);

impl Locator {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &'static str) -> Self {
        self.push(Segment::Field(name))
    }

    pub fn index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    /// Index an entity that carries an identifier. Blank ids fall back to the bare index.
    pub fn keyed(&self, index: usize, id: &str) -> Self {
        if id.is_empty() {
            self.index(index)
        } else {
            self.push(Segment::Keyed(index, id.to_string()))
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` equals `prefix` or lies beneath it.
    pub fn starts_with(&self, prefix: &Locator) -> bool {
        self.0.starts_with(&prefix.0)
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Locator(segments)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
                Segment::Keyed(idx, id) => write!(f, "[{}]({})", idx, id)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One validator-reported issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub locator: Locator,
    pub message: String,
}

impl Finding {
    pub fn error(kind: FindingKind, locator: Locator, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            locator,
            message: message.into(),
        }
    }

    pub fn warning(locator: Locator, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind: FindingKind::Advisory,
            locator,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}: {}", self.severity, self.kind, self.locator, self.message)
    }
}
