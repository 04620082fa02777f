//! Read-only lookup facade over a validated dataset.
//!
//! A [`KnowledgeBase`] can only be built from a valid [`ValidationResult`], so a
//! renderer holding one never sees a dataset that produced an error. Every
//! lookup is total and returns `None` for unknown identifiers.

mod stats;

pub use stats::KbStats;

use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::schema::{Dataset, KeyContact, NetworkNode, Section, Tab};
use crate::validate::{Finding, FindingKind, Locator, ValidationResult};

/// A contact together with the section and tab it was declared in.
#[derive(Debug, Clone, Copy)]
pub struct ContactRef<'a> {
    pub section: &'a Section,
    pub tab: &'a Tab,
    pub contact: &'a KeyContact,
}

/// Immutable, validated snapshot of one knowledge-base revision.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    dataset: Dataset,
    section_index: HashMap<String, usize>,
    revision: String,
    warnings: Vec<Finding>,
}

impl KnowledgeBase {
    /// Build from a validation result. Invalid results hand back their findings.
    pub fn from_result(result: ValidationResult) -> Result<Self, Vec<Finding>> {
        match result {
            ValidationResult::Valid { dataset, warnings } => Self::build(dataset, warnings),
            ValidationResult::Invalid { findings } => Err(findings),
        }
    }

    fn build(dataset: Dataset, warnings: Vec<Finding>) -> Result<Self, Vec<Finding>> {
        let mut section_index = HashMap::new();
        for (i, section) in dataset.sections.iter().enumerate() {
            section_index.entry(section.id.clone()).or_insert(i);
        }
        let revision = compute_revision(&dataset).map_err(|e| {
            log::error!("Failed to serialize dataset for its revision hash: {}", e);
            vec![Finding::error(
                FindingKind::Structural,
                Locator::root(),
                format!("dataset could not be serialized: {}", e),
            )]
        })?;
        log::info!(
            "Loaded knowledge base revision {} ({} sections)",
            &revision[..12.min(revision.len())],
            dataset.sections.len()
        );
        Ok(Self {
            dataset,
            section_index,
            revision,
            warnings,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn sections(&self) -> &[Section] {
        &self.dataset.sections
    }

    /// Warnings raised while validating this revision.
    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    /// Hex SHA-256 of the canonical JSON form of the dataset.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.section_index
            .get(id)
            .and_then(|&i| self.dataset.sections.get(i))
    }

    pub fn tab(&self, section_id: &str, tab_id: &str) -> Option<&Tab> {
        self.section(section_id)?
            .tabs
            .as_ref()?
            .iter()
            .find(|t| t.id == tab_id)
    }

    pub fn node(&self, section_id: &str, node_id: &str) -> Option<&NetworkNode> {
        self.section(section_id)?.graph_data.as_ref()?.node(node_id)
    }

    /// Every key contact in document order.
    pub fn contacts(&self) -> impl Iterator<Item = ContactRef<'_>> {
        self.dataset.sections.iter().flat_map(|section| {
            section.tabs.iter().flatten().flat_map(move |tab| {
                tab.key_contacts
                    .iter()
                    .flatten()
                    .map(move |contact| ContactRef {
                        section,
                        tab,
                        contact,
                    })
            })
        })
    }

    pub fn stats(&self) -> KbStats {
        KbStats::collect(&self.dataset)
    }
}

fn compute_revision(dataset: &Dataset) -> serde_json::Result<String> {
    let bytes = serde_json::to_vec(dataset)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
