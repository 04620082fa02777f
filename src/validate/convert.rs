//! Conversion of a checked authoring document into the typed model.
//!
//! Only called once every check passed without errors, so each required field
//! is present and every tag parses. Any gap still yields `None` rather than a
//! panic.

use crate::schema::raw::{
    RawContact, RawContentBlock, RawDataset, RawDimension, RawGraph, RawSection, RawTab,
    RawTimelineEvent,
};
use crate::schema::{
    BlockKind, ContentBlock, Dataset, GraphData, KeyContact, NetworkLink, NetworkNode,
    RelationshipDimension, Section, Tab, TimelineEvent,
};

pub(super) fn to_dataset(raw: &RawDataset) -> Option<Dataset> {
    Some(Dataset {
        title: raw.title.clone(),
        sections: raw.sections.iter().map(section).collect::<Option<_>>()?,
    })
}

fn section(raw: &RawSection) -> Option<Section> {
    Some(Section {
        id: raw.id.clone()?,
        title: raw.title.clone()?,
        content: blocks(raw.content.as_deref()?)?,
        timeline: match &raw.timeline {
            Some(events) => Some(events.iter().map(event).collect::<Option<_>>()?),
            None => None,
        },
        relationship_dimensions: match &raw.relationship_dimensions {
            Some(dims) => Some(dims.iter().map(dimension).collect::<Option<_>>()?),
            None => None,
        },
        graph_data: match &raw.graph_data {
            Some(g) => Some(graph(g)?),
            None => None,
        },
        tabs: match &raw.tabs {
            Some(tabs) => Some(tabs.iter().map(tab).collect::<Option<_>>()?),
            None => None,
        },
    })
}

fn blocks(raw: &[RawContentBlock]) -> Option<Vec<ContentBlock>> {
    raw.iter().map(block).collect()
}

fn block(raw: &RawContentBlock) -> Option<ContentBlock> {
    let content = raw.content.clone()?;
    let kind: BlockKind = raw.kind.as_deref()?.trim().parse().ok()?;
    Some(match kind {
        BlockKind::Paragraph => ContentBlock::Paragraph { content },
        BlockKind::Heading => ContentBlock::Heading { content },
        BlockKind::Subheading => ContentBlock::Subheading { content },
        BlockKind::List => ContentBlock::List {
            content,
            items: raw.items.clone().unwrap_or_default(),
        },
        BlockKind::Image => ContentBlock::Image {
            content,
            image_url: raw.image_url.clone()?,
            image_caption: raw.image_caption.clone(),
        },
        BlockKind::Quote => ContentBlock::Quote {
            content,
            author: raw.author.clone(),
        },
        BlockKind::ParagraphHtml => ContentBlock::ParagraphHtml { content },
    })
}

fn event(raw: &RawTimelineEvent) -> Option<TimelineEvent> {
    Some(TimelineEvent {
        year: raw.year.clone()?,
        title: raw.title.clone()?,
        description: raw.description.clone()?,
        polarity: raw.polarity.as_deref()?.trim().parse().ok()?,
    })
}

fn dimension(raw: &RawDimension) -> Option<RelationshipDimension> {
    Some(RelationshipDimension {
        name: raw.name.clone()?,
        value: raw.value?,
        description: raw.description.clone()?,
    })
}

fn graph(raw: &RawGraph) -> Option<GraphData> {
    let nodes = raw
        .nodes
        .iter()
        .map(|n| {
            Some(NetworkNode {
                id: n.id.clone()?,
                label: n.label.clone()?,
                group: n.group.clone()?,
                size: n.size?,
            })
        })
        .collect::<Option<_>>()?;
    let links = raw
        .links
        .iter()
        .map(|l| {
            Some(NetworkLink {
                source: l.source.clone()?,
                target: l.target.clone()?,
                value: l.value?,
                dashed: l.dashed.unwrap_or(false),
            })
        })
        .collect::<Option<_>>()?;
    Some(GraphData { nodes, links })
}

fn tab(raw: &RawTab) -> Option<Tab> {
    Some(Tab {
        id: raw.id.clone()?,
        label: raw.label.clone()?,
        content: blocks(raw.content.as_deref()?)?,
        key_contacts: match &raw.key_contacts {
            Some(contacts) => Some(contacts.iter().map(contact).collect::<Option<_>>()?),
            None => None,
        },
    })
}

fn contact(raw: &RawContact) -> Option<KeyContact> {
    Some(KeyContact {
        name: raw.name.clone()?,
        title: raw.title.clone()?,
        description: raw.description.clone()?,
        influence: raw.influence.as_deref()?.trim().parse().ok()?,
        image_url: raw.image_url.clone()?,
        highlighted_note: raw.highlighted_note.clone(),
        pdf_link: raw.pdf_link.clone(),
    })
}
