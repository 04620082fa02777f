//! Graph integrity: node ids, link endpoint resolution, self-loops and
//! duplicate links, weight ranges.

use std::collections::HashMap;

use super::{section_locator, Checker, FindingKind, Locator};
use crate::schema::raw::{trimmed, RawGraph, RawSection};

/// Check 5: every link endpoint resolves to a node declared in the same graph.
pub(super) fn check_graphs(checker: &mut Checker<'_>, sections: &[RawSection]) {
    for (i, section) in sections.iter().enumerate() {
        if let Some(graph) = &section.graph_data {
            let loc = section_locator(i, section).field("graphData");
            check_graph(checker, graph, &loc);
        }
    }
}

fn check_graph(checker: &mut Checker<'_>, graph: &RawGraph, graph_loc: &Locator) {
    let nodes_loc = graph_loc.field("nodes");
    let mut declared: HashMap<&str, usize> = HashMap::new();

    for (j, node) in graph.nodes.iter().enumerate() {
        let loc = nodes_loc.keyed(j, trimmed(&node.id));
        if let Some(id) = checker.required(&node.id, &loc, "id") {
            if let Some(first) = declared.get(id) {
                checker.error(
                    FindingKind::Structural,
                    loc.field("id"),
                    format!("duplicate node id '{}' (first declared at nodes[{}])", id, first),
                );
            } else {
                declared.insert(id, j);
            }
        }
        checker.required(&node.label, &loc, "label");
        checker.required(&node.group, &loc, "group");
        check_weight(checker, node.size, &loc, "size");
    }

    let links_loc = graph_loc.field("links");
    let mut seen_pairs: HashMap<(&str, &str), usize> = HashMap::new();

    for (j, link) in graph.links.iter().enumerate() {
        let loc = links_loc.index(j);
        let source = checker.required(&link.source, &loc, "source");
        let target = checker.required(&link.target, &loc, "target");
        check_weight(checker, link.value, &loc, "value");

        let dangling: Vec<String> = [("source", source), ("target", target)]
            .into_iter()
            .filter_map(|(end, id)| {
                id.filter(|id| !declared.contains_key(id))
                    .map(|id| format!("{} '{}'", end, id))
            })
            .collect();
        if !dangling.is_empty() {
            checker.error(
                FindingKind::Referential,
                loc,
                format!("link endpoint not declared in this graph: {}", dangling.join(", ")),
            );
            continue;
        }

        let (Some(source), Some(target)) = (source, target) else {
            continue;
        };
        if source == target {
            checker.warn(loc.clone(), format!("self-loop on node '{}'", source));
        }
        if let Some(first) = seen_pairs.get(&(source, target)) {
            checker.warn(
                loc,
                format!("duplicate link {} -> {} (first declared at links[{}])", source, target, first),
            );
        } else {
            seen_pairs.insert((source, target), j);
        }
    }
}

fn check_weight(checker: &mut Checker<'_>, weight: Option<f64>, loc: &Locator, field: &'static str) {
    match weight {
        None => checker.missing(loc, field),
        Some(w) if !w.is_finite() || w < 0.0 => {
            checker.error(
                FindingKind::Range,
                loc.field(field),
                format!("{} must be a finite, non-negative number, found {}", field, w),
            );
        }
        Some(_) => {}
    }
}
