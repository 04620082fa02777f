//! Authoring document: the dataset exactly as it is written.
//!
//! Every field is optional and every enum tag is a plain string, so a document
//! that breaks the schema still reads and the validator can report each problem
//! with a locator instead of failing on the first one. Documents are read from a
//! parsed [`Value`]: a value of the wrong JSON type is recorded as a
//! [`TypeMismatch`] and the field reads as absent. Unknown keys are ignored.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::validate::Locator;

type Object = Map<String, Value>;

/// A value whose JSON type does not match the schema, e.g. a string score.
/// The field itself reads as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatch {
    pub locator: Locator,
    pub expected: &'static str,
    pub found: &'static str,
}

/// A candidate dataset handed to the validator.
///
/// The top level is either a bare array of sections or an envelope object
/// `{ "title": ..., "sections": [...] }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub title: Option<String>,
    pub sections: Vec<RawSection>,
    /// Wrongly typed values found while reading, in document order.
    pub mismatches: Vec<TypeMismatch>,
}

impl RawDataset {
    /// Read a parsed document. Fails only when the top level is not a dataset.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let root = Locator::root();
        let mut mismatches = Vec::new();

        let (title, items) = match value {
            Value::Array(items) => (None, items),
            Value::Object(map) => match map.get("sections") {
                Some(Value::Array(items)) => (string(map, "title", &root, &mut mismatches), items),
                Some(other) => {
                    return Err(format!("'sections' must be an array, found {}", type_name(other)));
                }
                None => return Err("missing top-level 'sections' array".to_string()),
            },
            other => {
                return Err(format!(
                    "expected an array of sections or an object with a 'sections' array, found {}",
                    type_name(other)
                ));
            }
        };

        let sections = read_items(items, &root.field("sections"), true, &mut mismatches, section);
        Ok(RawDataset {
            title,
            sections,
            mismatches,
        })
    }
}

impl<'de> Deserialize<'de> for RawDataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RawDataset::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSection {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<Vec<RawContentBlock>>,
    pub timeline: Option<Vec<RawTimelineEvent>>,
    pub relationship_dimensions: Option<Vec<RawDimension>>,
    pub graph_data: Option<RawGraph>,
    pub tabs: Option<Vec<RawTab>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawContentBlock {
    /// The `type` tag.
    pub kind: Option<String>,
    pub content: Option<String>,
    pub items: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub image_caption: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTimelineEvent {
    pub year: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// The `type` tag.
    pub polarity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDimension {
    pub name: Option<String>,
    pub value: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub links: Vec<RawLink>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNode {
    pub id: Option<String>,
    pub label: Option<String>,
    pub group: Option<String>,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLink {
    pub source: Option<String>,
    pub target: Option<String>,
    pub value: Option<f64>,
    pub dashed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTab {
    pub id: Option<String>,
    pub label: Option<String>,
    pub content: Option<Vec<RawContentBlock>>,
    pub key_contacts: Option<Vec<RawContact>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawContact {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub influence: Option<String>,
    pub image_url: Option<String>,
    pub highlighted_note: Option<String>,
    pub pdf_link: Option<String>,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn mismatch(out: &mut Vec<TypeMismatch>, locator: Locator, expected: &'static str, found: &Value) {
    out.push(TypeMismatch {
        locator,
        expected,
        found: type_name(found),
    });
}

fn id_of(map: &Object) -> &str {
    map.get("id").and_then(Value::as_str).map(str::trim).unwrap_or("")
}

// Absent keys and explicit nulls both read as `None`.

fn string(map: &Object, key: &'static str, loc: &Locator, out: &mut Vec<TypeMismatch>) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => {
            mismatch(out, loc.field(key), "a string", other);
            None
        }
    }
}

fn number(map: &Object, key: &'static str, loc: &Locator, out: &mut Vec<TypeMismatch>) -> Option<f64> {
    match map.get(key)? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        other => {
            mismatch(out, loc.field(key), "a number", other);
            None
        }
    }
}

fn boolean(map: &Object, key: &'static str, loc: &Locator, out: &mut Vec<TypeMismatch>) -> Option<bool> {
    match map.get(key)? {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        other => {
            mismatch(out, loc.field(key), "a boolean", other);
            None
        }
    }
}

fn strings(
    map: &Object,
    key: &'static str,
    loc: &Locator,
    out: &mut Vec<TypeMismatch>,
) -> Option<Vec<String>> {
    let list_loc = loc.field(key);
    match map.get(key)? {
        Value::Null => None,
        Value::Array(items) => {
            let mut strings = Vec::with_capacity(items.len());
            for (k, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => strings.push(s.clone()),
                    other => mismatch(out, list_loc.index(k), "a string", other),
                }
            }
            Some(strings)
        }
        other => {
            mismatch(out, list_loc, "an array", other);
            None
        }
    }
}

fn object<'m>(
    map: &'m Object,
    key: &'static str,
    loc: &Locator,
    out: &mut Vec<TypeMismatch>,
) -> Option<&'m Object> {
    match map.get(key)? {
        Value::Null => None,
        Value::Object(inner) => Some(inner),
        other => {
            mismatch(out, loc.field(key), "an object", other);
            None
        }
    }
}

type ReadFn<T> = fn(&Object, &Locator, &mut Vec<TypeMismatch>) -> T;

/// Read an array of entities. Items that are not objects are reported and kept
/// as empty entries so later indexes still match the document.
fn read_items<T: Default>(
    items: &[Value],
    list_loc: &Locator,
    keyed: bool,
    out: &mut Vec<TypeMismatch>,
    read: ReadFn<T>,
) -> Vec<T> {
    let mut entities = Vec::with_capacity(items.len());
    for (k, item) in items.iter().enumerate() {
        match item {
            Value::Object(map) => {
                let loc = if keyed {
                    list_loc.keyed(k, id_of(map))
                } else {
                    list_loc.index(k)
                };
                entities.push(read(map, &loc, out));
            }
            other => {
                mismatch(out, list_loc.index(k), "an object", other);
                entities.push(T::default());
            }
        }
    }
    entities
}

fn objects<T: Default>(
    map: &Object,
    key: &'static str,
    loc: &Locator,
    keyed: bool,
    out: &mut Vec<TypeMismatch>,
    read: ReadFn<T>,
) -> Option<Vec<T>> {
    match map.get(key)? {
        Value::Null => None,
        Value::Array(items) => Some(read_items(items, &loc.field(key), keyed, out, read)),
        other => {
            mismatch(out, loc.field(key), "an array", other);
            None
        }
    }
}

fn section(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawSection {
    let id = string(map, "id", loc, out);
    let title = string(map, "title", loc, out);
    let content = objects(map, "content", loc, false, out, block);
    let timeline = objects(map, "timeline", loc, false, out, event);
    let relationship_dimensions = objects(map, "relationshipDimensions", loc, false, out, dimension);
    let graph_data = object(map, "graphData", loc, out).map(|g| graph(g, &loc.field("graphData"), out));
    let tabs = objects(map, "tabs", loc, true, out, tab);
    RawSection {
        id,
        title,
        content,
        timeline,
        relationship_dimensions,
        graph_data,
        tabs,
    }
}

fn block(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawContentBlock {
    RawContentBlock {
        kind: string(map, "type", loc, out),
        content: string(map, "content", loc, out),
        items: strings(map, "items", loc, out),
        image_url: string(map, "imageUrl", loc, out),
        image_caption: string(map, "imageCaption", loc, out),
        author: string(map, "author", loc, out),
    }
}

fn event(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawTimelineEvent {
    RawTimelineEvent {
        year: string(map, "year", loc, out),
        title: string(map, "title", loc, out),
        description: string(map, "description", loc, out),
        polarity: string(map, "type", loc, out),
    }
}

fn dimension(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawDimension {
    RawDimension {
        name: string(map, "name", loc, out),
        value: number(map, "value", loc, out),
        description: string(map, "description", loc, out),
    }
}

fn graph(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawGraph {
    RawGraph {
        nodes: objects(map, "nodes", loc, true, out, node).unwrap_or_default(),
        links: objects(map, "links", loc, false, out, link).unwrap_or_default(),
    }
}

fn node(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawNode {
    RawNode {
        id: string(map, "id", loc, out),
        label: string(map, "label", loc, out),
        group: string(map, "group", loc, out),
        size: number(map, "size", loc, out),
    }
}

fn link(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawLink {
    RawLink {
        source: string(map, "source", loc, out),
        target: string(map, "target", loc, out),
        value: number(map, "value", loc, out),
        dashed: boolean(map, "dashed", loc, out),
    }
}

fn tab(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawTab {
    RawTab {
        id: string(map, "id", loc, out),
        label: string(map, "label", loc, out),
        content: objects(map, "content", loc, false, out, block),
        key_contacts: objects(map, "keyContacts", loc, false, out, contact),
    }
}

fn contact(map: &Object, loc: &Locator, out: &mut Vec<TypeMismatch>) -> RawContact {
    RawContact {
        name: string(map, "name", loc, out),
        title: string(map, "title", loc, out),
        description: string(map, "description", loc, out),
        influence: string(map, "influence", loc, out),
        image_url: string(map, "imageUrl", loc, out),
        highlighted_note: string(map, "highlightedNote", loc, out),
        pdf_link: string(map, "pdfLink", loc, out),
    }
}

/// Trimmed view of an optional identifier, `""` when absent.
pub(crate) fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}
