//! Summary counts for a validated dataset.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::schema::{Dataset, Influence};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KbStats {
    pub sections: usize,
    pub tabs: usize,
    pub content_blocks: usize,
    pub timeline_events: usize,
    pub undated_events: usize,
    pub dimensions: usize,
    pub graph_nodes: usize,
    pub graph_links: usize,
    pub dashed_links: usize,
    pub contacts: usize,
    pub contacts_by_influence: BTreeMap<Influence, usize>,
}

impl KbStats {
    pub fn collect(dataset: &Dataset) -> Self {
        let mut stats = KbStats {
            sections: dataset.sections.len(),
            ..Default::default()
        };

        for section in &dataset.sections {
            stats.content_blocks += section.content.len();

            for event in section.timeline.iter().flatten() {
                stats.timeline_events += 1;
                if event.is_thematic() {
                    stats.undated_events += 1;
                }
            }
            stats.dimensions += section.relationship_dimensions.as_ref().map_or(0, Vec::len);

            if let Some(graph) = &section.graph_data {
                stats.graph_nodes += graph.nodes.len();
                stats.graph_links += graph.links.len();
                stats.dashed_links += graph.links.iter().filter(|l| l.dashed).count();
            }

            for tab in section.tabs.iter().flatten() {
                stats.tabs += 1;
                stats.content_blocks += tab.content.len();
                for contact in tab.key_contacts.iter().flatten() {
                    stats.contacts += 1;
                    *stats.contacts_by_influence.entry(contact.influence).or_insert(0) += 1;
                }
            }
        }

        stats
    }
}

impl fmt::Display for KbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:-<40}", "")?;
        writeln!(f, "{:<24} {:>15}", "Sections", self.sections)?;
        writeln!(f, "{:<24} {:>15}", "Tabs", self.tabs)?;
        writeln!(f, "{:<24} {:>15}", "Content blocks", self.content_blocks)?;
        writeln!(
            f,
            "{:<24} {:>15}",
            "Timeline events",
            format!("{} ({} undated)", self.timeline_events, self.undated_events)
        )?;
        writeln!(f, "{:<24} {:>15}", "Dimensions", self.dimensions)?;
        writeln!(f, "{:<24} {:>15}", "Graph nodes", self.graph_nodes)?;
        writeln!(
            f,
            "{:<24} {:>15}",
            "Graph links",
            format!("{} ({} dashed)", self.graph_links, self.dashed_links)
        )?;
        writeln!(f, "{:<24} {:>15}", "Key contacts", self.contacts)?;
        for (influence, count) in self.contacts_by_influence.iter().rev() {
            writeln!(f, "{:<24} {:>15}", format!("  influence {}", influence), count)?;
        }
        write!(f, "{:-<40}", "")
    }
}
