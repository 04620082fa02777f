//! Dataset validator.
//!
//! `validate` is a pure function of its input: it runs every check over the
//! whole document, collects all findings in a fixed order and, when no error
//! was found, returns a normalized typed [`Dataset`]. Checks run in this order
//! so locators and finding order stay stable between runs:
//!
//! 1. value types, section ids and required section fields
//! 2. tab ids (scoped to their section) and required tab fields
//! 3. content-block kind/field consistency
//! 4. relationship-dimension score bounds
//! 5. graph integrity
//! 6. influence and polarity membership, contact and event fields
//! 7. timeline chronology (warnings only)

mod convert;
mod finding;
mod graph;
mod locator;
mod structure;
mod timeline;
mod values;

pub use finding::{Finding, FindingKind, Locator, Severity};
pub use locator::check_locator;
pub use timeline::{parse_period, Period, YearMonth};

use crate::schema::raw::{trimmed, RawDataset, RawSection, TypeMismatch};
use crate::schema::{normalize, Dataset};

/// Tunables for a validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorOptions {
    /// Lower bound of the dimension scale (inclusive).
    pub score_min: f64,
    /// Upper bound of the dimension scale (inclusive).
    pub score_max: f64,
    /// Check the shape of image and document locators.
    pub check_locators: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            score_min: 0.0,
            score_max: 100.0,
            check_locators: true,
        }
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// No error-severity findings. Warnings are still surfaced to the author.
    Valid {
        dataset: Dataset,
        warnings: Vec<Finding>,
    },
    /// At least one error. `findings` holds every finding, warnings included.
    Invalid { findings: Vec<Finding> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    /// All findings in check order.
    pub fn findings(&self) -> &[Finding] {
        match self {
            ValidationResult::Valid { warnings, .. } => warnings,
            ValidationResult::Invalid { findings } => findings,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings().iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings().iter().filter(|f| !f.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Whether a revision should be rejected. In strict mode warnings block too.
    pub fn blocks(&self, strict: bool) -> bool {
        !self.is_valid() || (strict && self.warning_count() > 0)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            ValidationResult::Valid { dataset, .. } => Some(dataset),
            ValidationResult::Invalid { .. } => None,
        }
    }

    pub fn into_dataset(self) -> Option<Dataset> {
        match self {
            ValidationResult::Valid { dataset, .. } => Some(dataset),
            ValidationResult::Invalid { .. } => None,
        }
    }
}

/// Validator configured with a scale and locator policy.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate a candidate dataset. Never panics on malformed content.
    pub fn validate(&self, dataset: &RawDataset) -> ValidationResult {
        let sections = dataset.sections.as_slice();
        let mut checker = Checker::new(&self.options);

        for mismatch in &dataset.mismatches {
            checker.report_mismatch(mismatch);
        }
        structure::check_sections(&mut checker, sections);
        structure::check_tabs(&mut checker, sections);
        structure::check_blocks(&mut checker, sections);
        values::check_dimensions(&mut checker, sections);
        graph::check_graphs(&mut checker, sections);
        values::check_tags(&mut checker, sections);
        timeline::check_chronology(&mut checker, sections);

        let mut findings = checker.into_findings();
        let errors = findings.iter().filter(|f| f.is_error()).count();
        log::debug!(
            "Validated {} sections: {} errors, {} warnings",
            sections.len(),
            errors,
            findings.len() - errors
        );

        if errors > 0 {
            return ValidationResult::Invalid { findings };
        }

        match convert::to_dataset(dataset) {
            Some(typed) => ValidationResult::Valid {
                dataset: normalize(&typed),
                warnings: findings,
            },
            None => {
                log::error!("Dataset passed every check but could not be converted");
                findings.push(Finding::error(
                    FindingKind::Structural,
                    Locator::root(),
                    "dataset could not be converted to the typed model",
                ));
                ValidationResult::Invalid { findings }
            }
        }
    }
}

/// Validate with the default 0–100 scale.
pub fn validate(dataset: &RawDataset) -> ValidationResult {
    Validator::new().validate(dataset)
}

/// Finding collector shared by the individual checks.
pub(crate) struct Checker<'a> {
    options: &'a ValidatorOptions,
    findings: Vec<Finding>,
    /// Values already reported with the wrong type. Nothing beneath them is
    /// reported again as missing.
    mistyped: Vec<Locator>,
}

impl<'a> Checker<'a> {
    fn new(options: &'a ValidatorOptions) -> Self {
        Self {
            options,
            findings: Vec::new(),
            mistyped: Vec::new(),
        }
    }

    pub(crate) fn options(&self) -> &ValidatorOptions {
        self.options
    }

    pub(crate) fn error(&mut self, kind: FindingKind, locator: Locator, message: impl Into<String>) {
        self.findings.push(Finding::error(kind, locator, message));
    }

    pub(crate) fn warn(&mut self, locator: Locator, message: impl Into<String>) {
        self.findings.push(Finding::warning(locator, message));
    }

    /// Required text that must not be blank. Returns the trimmed value.
    pub(crate) fn required<'v>(
        &mut self,
        value: &'v Option<String>,
        parent: &Locator,
        field: &'static str,
    ) -> Option<&'v str> {
        match value.as_deref().map(str::trim) {
            None => {
                self.missing(parent, field);
                None
            }
            Some("") => {
                self.error(
                    FindingKind::Structural,
                    parent.field(field),
                    format!("field '{}' must not be blank", field),
                );
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Required text that may be empty.
    pub(crate) fn present<'v>(
        &mut self,
        value: &'v Option<String>,
        parent: &Locator,
        field: &'static str,
    ) -> Option<&'v str> {
        let v = value.as_deref().map(str::trim);
        if v.is_none() {
            self.missing(parent, field);
        }
        v
    }

    pub(crate) fn report_mismatch(&mut self, mismatch: &TypeMismatch) {
        self.error(
            FindingKind::Structural,
            mismatch.locator.clone(),
            format!("expected {}, found {}", mismatch.expected, mismatch.found),
        );
        self.mistyped.push(mismatch.locator.clone());
    }

    pub(crate) fn missing(&mut self, parent: &Locator, field: &'static str) {
        let at = parent.field(field);
        if self.mistyped.iter().any(|m| at.starts_with(m)) {
            return;
        }
        self.error(
            FindingKind::Structural,
            parent.clone(),
            format!("missing required field '{}'", field),
        );
    }

    /// A locator must not be blank. Its shape is checked when enabled.
    pub(crate) fn locator(&mut self, value: &str, parent: &Locator, field: &'static str) {
        if value.trim().is_empty() {
            self.error(
                FindingKind::Structural,
                parent.field(field),
                format!("field '{}' must not be blank", field),
            );
            return;
        }
        if !self.options.check_locators {
            return;
        }
        if let Err(reason) = check_locator(value) {
            self.error(
                FindingKind::Structural,
                parent.field(field),
                format!("malformed locator '{}': {}", value, reason),
            );
        }
    }

    fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

pub(crate) fn section_locator(index: usize, section: &RawSection) -> Locator {
    Locator::root().field("sections").keyed(index, trimmed(&section.id))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::schema::{ContentBlock, Influence};

    const SAMPLE: &str = include_str!("../../data/sample_relations.json");

    fn sample() -> RawDataset {
        serde_json::from_str(SAMPLE).unwrap()
    }

    fn dataset(sections: Value) -> RawDataset {
        RawDataset::from_value(&sections).unwrap()
    }

    fn section(id: &str) -> Value {
        json!({ "id": id, "title": format!("Section {}", id), "content": [] })
    }

    fn errors_of(result: &ValidationResult, kind: FindingKind) -> Vec<&Finding> {
        result.errors().filter(|f| f.kind == kind).collect()
    }

    #[test]
    fn test_sample_dataset_is_valid() {
        let result = validate(&sample());
        assert!(result.is_valid(), "unexpected findings: {:?}", result.findings());
        assert_eq!(result.warning_count(), 0);
        let dataset = result.dataset().unwrap();
        assert_eq!(dataset.sections.len(), 4);
        assert_eq!(dataset.sections[0].id, "intro");
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut raw = sample();
        raw.sections.push(raw.sections[1].clone());
        raw.sections[0].content.as_mut().unwrap()[0].items = Some(vec![]);
        let first = validate(&raw);
        let second = validate(&raw);
        assert_eq!(first, second);
        assert!(!first.is_valid());
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let raw = dataset(json!([
            { "id": "  padded ", "title": "T", "content": [ { "type": "paragraph", "content": " x " } ] }
        ]));
        let before = raw.clone();
        let result = validate(&raw);
        assert_eq!(raw, before);
        let normalized = result.into_dataset().unwrap();
        assert_eq!(normalized.sections[0].id, "padded");
        assert_eq!(
            normalized.sections[0].content[0],
            ContentBlock::Paragraph { content: "x".to_string() }
        );
    }

    #[test]
    fn test_normalized_output_is_a_fixed_point() {
        let normalized = validate(&sample()).into_dataset().unwrap();
        assert_eq!(normalize(&normalized), normalized);
    }

    #[test]
    fn test_duplicate_section_id_adds_error_at_duplicate() {
        let baseline = validate(&sample());
        let mut raw = sample();
        let mut dup = raw.sections[2].clone();
        dup.title = Some("Another tensions section".to_string());
        raw.sections.push(dup);
        let result = validate(&raw);

        assert!(result.error_count() >= baseline.error_count() + 1);
        let structural = errors_of(&result, FindingKind::Structural);
        assert_eq!(structural.len(), 1);
        assert_eq!(structural[0].locator.to_string(), "sections[4](tensions).id");
        assert!(structural[0].message.contains("sections[2]"));
    }

    #[test]
    fn test_duplicate_tab_ids_yield_one_error_in_that_section() {
        let raw = dataset(json!([
            section("intro"),
            {
                "id": "key-contacts",
                "title": "Key Contacts",
                "content": [],
                "tabs": [
                    { "id": "government", "label": "Government", "content": [] },
                    { "id": "government", "label": "Government (again)", "content": [] }
                ]
            },
            section("economy")
        ]));
        let result = validate(&raw);

        assert!(!result.is_valid());
        assert_eq!(result.findings().len(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.kind, FindingKind::Structural);
        let tabs = Locator::root().field("sections").keyed(1, "key-contacts").field("tabs");
        assert!(finding.locator.starts_with(&tabs));
        assert_eq!(
            finding.locator.to_string(),
            "sections[1](key-contacts).tabs[1](government).id"
        );
    }

    #[test]
    fn test_same_tab_id_in_different_sections_is_fine() {
        let tab = json!({ "id": "government", "label": "Government", "content": [] });
        let raw = dataset(json!([
            { "id": "a", "title": "A", "content": [], "tabs": [tab.clone()] },
            { "id": "b", "title": "B", "content": [], "tabs": [tab] }
        ]));
        assert!(validate(&raw).is_valid());
    }

    #[test]
    fn test_dangling_link_target_yields_one_referential_error() {
        let raw = dataset(json!([{
            "id": "network",
            "title": "Network",
            "content": [],
            "graphData": {
                "nodes": [ { "id": "a", "label": "A", "group": "uae", "size": 10 } ],
                "links": [ { "source": "a", "target": "z", "value": 1 } ]
            }
        }]));
        let result = validate(&raw);

        assert!(!result.is_valid());
        assert_eq!(result.findings().len(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.kind, FindingKind::Referential);
        assert_eq!(finding.locator.to_string(), "sections[0](network).graphData.links[0]");
        assert!(finding.message.contains("target 'z'"));
    }

    #[test]
    fn test_self_loop_and_duplicate_links_are_warnings() {
        let raw = dataset(json!([{
            "id": "network",
            "title": "Network",
            "content": [],
            "graphData": {
                "nodes": [
                    { "id": "a", "label": "A", "group": "uae", "size": 10 },
                    { "id": "b", "label": "B", "group": "france", "size": 10 }
                ],
                "links": [
                    { "source": "a", "target": "b", "value": 1 },
                    { "source": "a", "target": "b", "value": 2, "dashed": true },
                    { "source": "b", "target": "b", "value": 1 }
                ]
            }
        }]));
        let result = validate(&raw);

        assert!(result.is_valid());
        let warnings: Vec<_> = result.warnings().collect();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].locator.to_string(), "sections[0](network).graphData.links[1]");
        assert!(warnings[0].message.contains("duplicate link"));
        assert!(warnings[1].message.contains("self-loop"));
        assert!(result.blocks(true));
        assert!(!result.blocks(false));
    }

    #[test]
    fn test_valid_graph_links_resolve() {
        let result = validate(&sample());
        let dataset = result.dataset().unwrap();
        for section in &dataset.sections {
            if let Some(graph) = &section.graph_data {
                for link in &graph.links {
                    assert!(graph.node(&link.source).is_some());
                    assert!(graph.node(&link.target).is_some());
                }
            }
        }
    }

    #[test]
    fn test_unknown_influence_yields_one_enum_error() {
        let mut raw = sample();
        let contacts = raw.sections[3].tabs.as_mut().unwrap()[0]
            .key_contacts
            .as_mut()
            .unwrap();
        contacts[1].influence = Some("critical".to_string());
        let result = validate(&raw);

        assert!(!result.is_valid());
        assert_eq!(result.findings().len(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.kind, FindingKind::Enum);
        assert_eq!(
            finding.locator.to_string(),
            "sections[3](key-contacts).tabs[0](government).keyContacts[1].influence"
        );
    }

    #[test]
    fn test_out_of_scale_dimension_yields_one_range_error() {
        let mut raw = sample();
        raw.sections[1].relationship_dimensions.as_mut().unwrap()[0].value = Some(140.0);
        let result = validate(&raw);

        assert_eq!(result.findings().len(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.kind, FindingKind::Range);
        assert!(finding.message.contains("140"));
    }

    #[test]
    fn test_custom_scale_is_honoured() {
        let validator = Validator::with_options(ValidatorOptions {
            score_min: 0.0,
            score_max: 10.0,
            check_locators: true,
        });
        let result = validator.validate(&sample());
        assert_eq!(errors_of(&result, FindingKind::Range).len(), 2);
    }

    #[test]
    fn test_valid_scores_within_scale() {
        let dataset = validate(&sample()).into_dataset().unwrap();
        for dim in dataset.sections.iter().flat_map(|s| s.relationship_dimensions.iter().flatten()) {
            assert!((0.0..=100.0).contains(&dim.value));
        }
    }

    #[test]
    fn test_misplaced_variant_fields_are_errors() {
        let raw = dataset(json!([{
            "id": "intro",
            "title": "Intro",
            "content": [
                { "type": "paragraph", "content": "x", "items": ["a"] },
                { "type": "list", "content": "y", "items": ["a"], "author": "someone" },
                { "type": "quote", "content": "z", "imageCaption": "c" }
            ]
        }]));
        let result = validate(&raw);
        let structural = errors_of(&result, FindingKind::Structural);
        let locators: Vec<String> = structural.iter().map(|f| f.locator.to_string()).collect();
        assert_eq!(
            locators,
            vec![
                "sections[0](intro).content[0].items",
                "sections[0](intro).content[1].author",
                "sections[0](intro).content[2].imageCaption",
            ]
        );
    }

    #[test]
    fn test_unknown_block_kind_is_enum_error() {
        let raw = dataset(json!([{
            "id": "intro",
            "title": "Intro",
            "content": [ { "type": "video", "content": "x" } ]
        }]));
        let result = validate(&raw);
        let enums = errors_of(&result, FindingKind::Enum);
        assert_eq!(enums.len(), 1);
        assert!(enums[0].message.contains("video"));
    }

    #[test]
    fn test_unknown_polarity_is_enum_error() {
        let mut raw = sample();
        raw.sections[1].timeline.as_mut().unwrap()[0].polarity = Some("great".to_string());
        let result = validate(&raw);
        assert_eq!(result.findings().len(), 1);
        assert_eq!(result.findings()[0].kind, FindingKind::Enum);
        assert_eq!(
            result.findings()[0].locator.to_string(),
            "sections[1](political-diplomatic).timeline[0].type"
        );
    }

    #[test]
    fn test_missing_required_fields_are_structural() {
        let raw = dataset(json!([
            { "title": "No id" },
            { "id": "tabs", "title": "Tabs", "content": [], "tabs": [ { "id": "t" } ] }
        ]));
        let result = validate(&raw);
        let messages: Vec<String> = result.findings().iter().map(|f| f.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "error[structural] sections[0]: missing required field 'id'",
                "error[structural] sections[0]: missing required field 'content'",
                "error[structural] sections[1](tabs).tabs[0](t): missing required field 'label'",
                "error[structural] sections[1](tabs).tabs[0](t): missing required field 'content'",
            ]
        );
    }

    #[test]
    fn test_findings_follow_check_order() {
        let mut raw = sample();
        raw.sections[1].relationship_dimensions.as_mut().unwrap()[1].value = Some(-5.0);
        raw.sections[3].tabs.as_mut().unwrap()[1].key_contacts.as_mut().unwrap()[0].influence =
            Some("unknown".to_string());
        raw.sections[0].id = Some("tensions".to_string());
        let result = validate(&raw);
        let kinds: Vec<FindingKind> = result.findings().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FindingKind::Structural, FindingKind::Range, FindingKind::Enum]
        );
    }

    #[test]
    fn test_out_of_order_timeline_is_a_warning() {
        let mut raw = sample();
        raw.sections[1].timeline.as_mut().unwrap()[4].year = Some("2019".to_string());
        let result = validate(&raw);

        assert!(result.is_valid());
        let warnings: Vec<_> = result.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].locator.to_string(),
            "sections[1](political-diplomatic).timeline[4]"
        );
        assert!(warnings[0].message.contains("'2022'"));
    }

    #[test]
    fn test_malformed_locator_is_structural() {
        let mut raw = sample();
        raw.sections[3].tabs.as_mut().unwrap()[0].key_contacts.as_mut().unwrap()[0].image_url =
            Some("ftp://host/a.png".to_string());
        let result = validate(&raw);
        assert_eq!(result.error_count(), 1);
        assert!(result.findings()[0].message.contains("unsupported scheme"));

        let relaxed = Validator::with_options(ValidatorOptions {
            check_locators: false,
            ..ValidatorOptions::default()
        });
        assert!(relaxed.validate(&raw).is_valid());
    }

    #[test]
    fn test_absent_facets_stay_absent() {
        let dataset = validate(&sample()).into_dataset().unwrap();
        let intro = &dataset.sections[0];
        assert!(intro.timeline.is_none());
        assert!(intro.tabs.is_none());
        let tensions = &dataset.sections[2];
        assert!(tensions.content.is_empty());
        assert_eq!(tensions.tabs.as_ref().map(Vec::len), Some(2));
        let contacts = dataset.sections[3].tabs.as_ref().unwrap()[0].key_contacts.as_ref().unwrap();
        assert_eq!(contacts[0].influence, Influence::High);
    }

    #[test]
    fn test_blank_locator_rejected_without_shape_checks() {
        let mut raw = sample();
        raw.sections[3].tabs.as_mut().unwrap()[0].key_contacts.as_mut().unwrap()[0].image_url =
            Some("   ".to_string());
        let relaxed = Validator::with_options(ValidatorOptions {
            check_locators: false,
            ..ValidatorOptions::default()
        });
        let result = relaxed.validate(&raw);
        assert_eq!(result.error_count(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.kind, FindingKind::Structural);
        assert_eq!(
            finding.locator.to_string(),
            "sections[3](key-contacts).tabs[0](government).keyContacts[0].imageUrl"
        );
    }

    #[test]
    fn test_wrong_type_and_duplicate_id_both_reported() {
        let mut second = section("a");
        second["relationshipDimensions"] = json!([{ "name": "Trade", "value": "80", "description": "" }]);
        let result = validate(&dataset(json!([section("a"), second])));

        assert!(!result.is_valid());
        let rendered: Vec<String> = result.findings().iter().map(|f| f.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "error[structural] sections[1](a).relationshipDimensions[0].value: expected a number, found a string",
                "error[structural] sections[1](a).id: duplicate section id 'a' (first declared at sections[0])",
            ]
        );
    }

    #[test]
    fn test_wrong_type_is_not_also_reported_missing() {
        let raw = dataset(json!([{
            "id": "key-contacts",
            "title": "Key Contacts",
            "content": [],
            "tabs": [{
                "id": "government",
                "label": "Government",
                "content": [],
                "keyContacts": [{
                    "name": "Jean Dupont",
                    "title": "Minister",
                    "description": "",
                    "influence": 3,
                    "imageUrl": "/img/jd.png"
                }]
            }]
        }]));
        let result = validate(&raw);
        assert_eq!(result.error_count(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.kind, FindingKind::Structural);
        assert_eq!(
            finding.locator.to_string(),
            "sections[0](key-contacts).tabs[0](government).keyContacts[0].influence"
        );
        assert_eq!(finding.message, "expected a string, found a number");
    }

    #[test]
    fn test_non_object_section_is_one_finding() {
        let result = validate(&dataset(json!([section("a"), "oops", section("c")])));
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.findings()[0].locator.to_string(), "sections[1]");
        assert_eq!(result.findings()[0].message, "expected an object, found a string");
    }
}
