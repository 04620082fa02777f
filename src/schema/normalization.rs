//! Whitespace normalization of a validated dataset.
//!
//! Returns a new value; the input is left untouched. Trimming is idempotent, so
//! `normalize(&normalize(d)) == normalize(d)`.

use super::{
    ContentBlock, Dataset, GraphData, KeyContact, NetworkLink, NetworkNode, RelationshipDimension,
    Section, Tab, TimelineEvent,
};

/// Normalize a dataset: trim every string field, drop blank optional notes.
pub fn normalize(dataset: &Dataset) -> Dataset {
    Dataset {
        title: dataset.title.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(String::from),
        sections: dataset.sections.iter().map(normalize_section).collect(),
    }
}

fn text(s: &str) -> String {
    s.trim().to_string()
}

fn optional_text(s: &Option<String>) -> Option<String> {
    s.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(String::from)
}

fn normalize_section(section: &Section) -> Section {
    Section {
        id: text(&section.id),
        title: text(&section.title),
        content: section.content.iter().map(normalize_block).collect(),
        timeline: section
            .timeline
            .as_ref()
            .map(|events| events.iter().map(normalize_event).collect()),
        relationship_dimensions: section
            .relationship_dimensions
            .as_ref()
            .map(|dims| dims.iter().map(normalize_dimension).collect()),
        graph_data: section.graph_data.as_ref().map(normalize_graph),
        tabs: section
            .tabs
            .as_ref()
            .map(|tabs| tabs.iter().map(normalize_tab).collect()),
    }
}

fn normalize_block(block: &ContentBlock) -> ContentBlock {
    match block {
        ContentBlock::Paragraph { content } => ContentBlock::Paragraph {
            content: text(content),
        },
        ContentBlock::Heading { content } => ContentBlock::Heading {
            content: text(content),
        },
        ContentBlock::Subheading { content } => ContentBlock::Subheading {
            content: text(content),
        },
        ContentBlock::List { content, items } => ContentBlock::List {
            content: text(content),
            items: items.iter().map(|i| text(i)).collect(),
        },
        ContentBlock::Image {
            content,
            image_url,
            image_caption,
        } => ContentBlock::Image {
            content: text(content),
            image_url: text(image_url),
            image_caption: optional_text(image_caption),
        },
        ContentBlock::Quote { content, author } => ContentBlock::Quote {
            content: text(content),
            author: optional_text(author),
        },
        ContentBlock::ParagraphHtml { content } => ContentBlock::ParagraphHtml {
            content: text(content),
        },
    }
}

fn normalize_event(event: &TimelineEvent) -> TimelineEvent {
    TimelineEvent {
        year: text(&event.year),
        title: text(&event.title),
        description: text(&event.description),
        polarity: event.polarity,
    }
}

fn normalize_dimension(dim: &RelationshipDimension) -> RelationshipDimension {
    RelationshipDimension {
        name: text(&dim.name),
        value: dim.value,
        description: text(&dim.description),
    }
}

fn normalize_graph(graph: &GraphData) -> GraphData {
    GraphData {
        nodes: graph
            .nodes
            .iter()
            .map(|n| NetworkNode {
                id: text(&n.id),
                label: text(&n.label),
                group: text(&n.group),
                size: n.size,
            })
            .collect(),
        links: graph
            .links
            .iter()
            .map(|l| NetworkLink {
                source: text(&l.source),
                target: text(&l.target),
                value: l.value,
                dashed: l.dashed,
            })
            .collect(),
    }
}

fn normalize_tab(tab: &Tab) -> Tab {
    Tab {
        id: text(&tab.id),
        label: text(&tab.label),
        content: tab.content.iter().map(normalize_block).collect(),
        key_contacts: tab
            .key_contacts
            .as_ref()
            .map(|contacts| contacts.iter().map(normalize_contact).collect()),
    }
}

fn normalize_contact(contact: &KeyContact) -> KeyContact {
    KeyContact {
        name: text(&contact.name),
        title: text(&contact.title),
        description: text(&contact.description),
        influence: contact.influence,
        image_url: text(&contact.image_url),
        highlighted_note: optional_text(&contact.highlighted_note),
        pdf_link: optional_text(&contact.pdf_link),
    }
}
