//! Per-file validation reports for the command-line tools.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::load::FormatRegistry;
use crate::validate::{Finding, Validator};

/// Outcome of validating one dataset file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    pub findings: Vec<Finding>,
}

impl FileReport {
    /// Whether this file should be rejected. In strict mode warnings block too.
    pub fn blocks(&self, strict: bool) -> bool {
        !self.valid || (strict && self.warnings > 0)
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.valid { "ok" } else { "INVALID" };
        write!(
            f,
            "{}: {} ({} errors, {} warnings)",
            self.path, status, self.errors, self.warnings
        )?;
        if let Some(rev) = &self.revision {
            write!(f, " revision {}", &rev[..12.min(rev.len())])?;
        }
        for finding in &self.findings {
            write!(f, "\n  {}", finding)?;
        }
        Ok(())
    }
}

/// Load, validate and summarize a single dataset file.
///
/// Only failures to read or parse the file are returned as errors.
pub fn check_file(
    registry: &FormatRegistry,
    validator: &Validator,
    path: &Path,
    display_path: &str,
) -> Result<FileReport> {
    let raw = registry.load_file(path)?;
    let result = validator.validate(&raw);
    let errors = result.error_count();
    let warnings = result.warning_count();

    let report = match KnowledgeBase::from_result(result) {
        Ok(kb) => FileReport {
            path: display_path.to_string(),
            valid: true,
            errors,
            warnings,
            revision: Some(kb.revision().to_string()),
            findings: kb.warnings().to_vec(),
        },
        Err(findings) => FileReport {
            path: display_path.to_string(),
            valid: false,
            errors,
            warnings,
            revision: None,
            findings,
        },
    };

    if report.valid {
        log::info!("{}: valid ({} warnings)", display_path, warnings);
    } else {
        log::info!("{}: {} errors, {} warnings", display_path, errors, warnings);
    }
    Ok(report)
}
