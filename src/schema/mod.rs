//! Content schema for a relations knowledge base.
//!
//! Two layers live here: [`raw`] mirrors the authoring document exactly as it is
//! written (every field optional, enum tags as free strings) so the validator
//! can describe any mistake in it, while the types in this module are the
//! validated, renderer-facing model with closed enums and tagged blocks.
//!
//! Both layers serialize to the same camelCase JSON shape.

pub mod raw;
mod normalization;

pub use normalization::normalize;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated knowledge base: an ordered sequence of sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sections: Vec<Section>,
}

/// One thematic unit of the knowledge base.
///
/// Optional facets stay `None` when the author left them out; `Some(vec![])`
/// means the facet exists but is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_dimensions: Option<Vec<RelationshipDimension>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<GraphData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<Tab>>,
}

/// One prose/media unit, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph {
        content: String,
    },
    Heading {
        content: String,
    },
    Subheading {
        content: String,
    },
    List {
        content: String,
        items: Vec<String>,
    },
    Image {
        content: String,
        #[serde(rename = "imageUrl")]
        image_url: String,
        #[serde(rename = "imageCaption", default, skip_serializing_if = "Option::is_none")]
        image_caption: Option<String>,
    },
    Quote {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    ParagraphHtml {
        content: String,
    },
}

impl ContentBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Paragraph { .. } => BlockKind::Paragraph,
            ContentBlock::Heading { .. } => BlockKind::Heading,
            ContentBlock::Subheading { .. } => BlockKind::Subheading,
            ContentBlock::List { .. } => BlockKind::List,
            ContentBlock::Image { .. } => BlockKind::Image,
            ContentBlock::Quote { .. } => BlockKind::Quote,
            ContentBlock::ParagraphHtml { .. } => BlockKind::ParagraphHtml,
        }
    }

    /// Primary text payload, present on every kind.
    pub fn content(&self) -> &str {
        match self {
            ContentBlock::Paragraph { content }
            | ContentBlock::Heading { content }
            | ContentBlock::Subheading { content }
            | ContentBlock::List { content, .. }
            | ContentBlock::Image { content, .. }
            | ContentBlock::Quote { content, .. }
            | ContentBlock::ParagraphHtml { content } => content,
        }
    }
}

/// Closed set of content block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading,
    Subheading,
    List,
    Image,
    Quote,
    ParagraphHtml,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Paragraph,
        BlockKind::Heading,
        BlockKind::Subheading,
        BlockKind::List,
        BlockKind::Image,
        BlockKind::Quote,
        BlockKind::ParagraphHtml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading => "heading",
            BlockKind::Subheading => "subheading",
            BlockKind::List => "list",
            BlockKind::Image => "image",
            BlockKind::Quote => "quote",
            BlockKind::ParagraphHtml => "paragraph_html",
        }
    }
}

/// Presentational polarity of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub const ALL: [Polarity; 3] = [Polarity::Positive, Polarity::Negative, Polarity::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
        }
    }
}

/// Ordinal influence of a key contact. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Influence {
    Low,
    Medium,
    High,
}

impl Influence {
    pub const ALL: [Influence; 3] = [Influence::High, Influence::Medium, Influence::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Influence::Low => "low",
            Influence::Medium => "medium",
            Influence::High => "high",
        }
    }
}

/// Error returned when a tag is not a member of its closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub tag: String,
    pub expected: Vec<&'static str>,
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized value '{}' (expected one of: {})",
            self.tag,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownTag {}

macro_rules! closed_set {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownTag {
                        tag: s.to_string(),
                        expected: <$ty>::ALL.iter().map(|v| v.as_str()).collect(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_set!(BlockKind);
closed_set!(Polarity);
closed_set!(Influence);

/// A dated (or undated, when `year` is empty) entry in a section timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub polarity: Polarity,
}

impl TimelineEvent {
    /// Undated entries render as unordered highlights.
    pub fn is_thematic(&self) -> bool {
        self.year.is_empty()
    }
}

/// A scored aspect of the relationship, rendered as a gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDimension {
    pub name: String,
    pub value: f64,
    pub description: String,
}

/// Relationship graph of a section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<NetworkLink>,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    pub group: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkLink {
    pub source: String,
    pub target: String,
    pub value: f64,
    /// Indirect or inferred relationship.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dashed: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A named sub-view nested inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_contacts: Option<Vec<KeyContact>>,
}

/// Profile of a named individual relevant to the relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyContact {
    pub name: String,
    pub title: String,
    pub description: String,
    pub influence: Influence,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
}
