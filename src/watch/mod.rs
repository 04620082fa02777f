//! File watcher: re-validate dataset files under a directory as they change.
//!
//! Uses the notify crate to watch the directory, debounces events, and for each
//! changed dataset file whose content hash differs from the last run, loads and
//! validates it and logs the findings.

mod watcher;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use sha2::{Digest, Sha256};

use crate::error::{KbError, Result};
use crate::load::{DatasetFile, FormatRegistry};
use crate::report::{check_file, FileReport};
use crate::validate::Validator;

/// Compute SHA256 hash of file contents
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&content)))
}

/// Resolve a changed path to a dataset file under `root`.
/// Returns None if the path is outside root, gone, or has an unsupported extension.
pub fn dataset_file_from_path(
    absolute_path: &Path,
    root: &Path,
    registry: &FormatRegistry,
) -> Result<Option<DatasetFile>> {
    let root = root
        .canonicalize()
        .map_err(|e| KbError::Config(format!("root canonicalize: {}", e)))?;
    let absolute_path = match absolute_path.canonicalize() {
        Ok(p) => p,
        // Removed or renamed away before the debounce fired
        Err(_) => return Ok(None),
    };

    if !absolute_path.starts_with(&root) || !absolute_path.is_file() {
        return Ok(None);
    }

    let extension = absolute_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !registry.supports(&extension) {
        return Ok(None);
    }

    let relative_path = absolute_path
        .strip_prefix(&root)
        .map_err(|_| KbError::Config("strip_prefix".to_string()))?
        .to_string_lossy()
        .replace('\\', "/");

    Ok(Some(DatasetFile {
        relative_path,
        absolute_path,
        extension,
    }))
}

/// Re-validates changed files, skipping ones whose content is unchanged.
pub struct ChangeHandler {
    root: PathBuf,
    registry: FormatRegistry,
    validator: Validator,
    strict: bool,
    hashes: HashMap<PathBuf, String>,
}

impl ChangeHandler {
    pub fn new(root: &Path, validator: Validator, strict: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            registry: FormatRegistry::new(),
            validator,
            strict,
            hashes: HashMap::new(),
        }
    }

    /// Handle a single path change. Returns the report when the file was re-validated.
    pub fn handle(&mut self, path: &Path) -> Result<Option<FileReport>> {
        let start = std::time::Instant::now();

        let file = match dataset_file_from_path(path, &self.root, &self.registry)? {
            Some(f) => f,
            None => return Ok(None),
        };

        let current_hash = compute_file_hash(&file.absolute_path)?;
        if self.hashes.get(&file.absolute_path) == Some(&current_hash) {
            return Ok(None);
        }

        let report = match check_file(
            &self.registry,
            &self.validator,
            &file.absolute_path,
            &file.relative_path,
        ) {
            Ok(report) => report,
            Err(e) => {
                // Half-written files are common mid-edit; retry on the next event
                self.hashes.remove(&file.absolute_path);
                return Err(e);
            }
        };
        self.hashes.insert(file.absolute_path.clone(), current_hash);

        if report.blocks(self.strict) {
            log::warn!("watch: {}", report);
        } else {
            log::info!("watch: {} in {:?}", report, start.elapsed());
        }
        Ok(Some(report))
    }
}

/// Run the file watcher: spawn the watcher thread, then receive debounced paths
/// and re-validate each one. Runs until the watcher thread exits.
pub fn run_watcher(root: &Path, validator: Validator, strict: bool, debounce_ms: u64) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let watch_root = root.to_path_buf();
    std::thread::spawn(move || {
        if let Err(e) = watcher::run_watcher_thread(&watch_root, debounce_ms, tx) {
            log::error!("watcher thread error: {}", e);
        }
    });

    let mut handler = ChangeHandler::new(root, validator, strict);

    while let Ok(path) = rx.recv() {
        if let Err(e) = handler.handle(&path) {
            log::error!("watch {}: {}", path.display(), e);
        }
    }
    Ok(())
}
