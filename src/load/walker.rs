use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::FormatRegistry;
use crate::error::{KbError, Result};

/// A dataset document found on disk
#[derive(Debug, Clone)]
pub struct DatasetFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub extension: String,
}

/// Discover dataset documents under `root`, sorted by relative path.
///
/// Only extensions with a registered format are returned. When `root` is a
/// single file it is returned as-is if its format is supported.
pub fn discover_datasets(root: &Path, registry: &FormatRegistry) -> Result<Vec<DatasetFile>> {
    if root.is_file() {
        let extension = extension_of(root);
        if !registry.supports(&extension) {
            return Err(KbError::UnsupportedFormat(root.display().to_string()));
        }
        let relative_path = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        return Ok(vec![DatasetFile {
            relative_path,
            absolute_path: root.to_path_buf(),
            extension,
        }]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = extension_of(path);
        if !registry.supports(&extension) {
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .map_err(|_| KbError::Config(format!("Failed to compute relative path for: {}", path.display())))?
            .to_string_lossy()
            .replace('\\', "/");

        files.push(DatasetFile {
            relative_path,
            absolute_path: path.to_path_buf(),
            extension,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::info!("Discovered {} dataset files in {}", files.len(), root.display());
    Ok(files)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_datasets() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("sweden/drafts")).unwrap();
        fs::write(root.join("france.json"), "[]").unwrap();
        fs::write(root.join("sweden/relations.yaml"), "[]").unwrap();
        fs::write(root.join("sweden/drafts/old.yml"), "[]").unwrap();
        fs::write(root.join("README.md"), "# Datasets").unwrap();
        fs::write(root.join("relationData.ts"), "export const x = 1;").unwrap();

        let registry = FormatRegistry::new();
        let files = discover_datasets(root, &registry).unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["france.json", "sweden/drafts/old.yml", "sweden/relations.yaml"]
        );
    }

    #[test]
    fn test_discover_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("relations.json");
        fs::write(&path, "[]").unwrap();

        let files = discover_datasets(&path, &FormatRegistry::new()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "relations.json");
        assert_eq!(files[0].extension, "json");
    }

    #[test]
    fn test_discover_unsupported_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();

        assert!(discover_datasets(&path, &FormatRegistry::new()).is_err());
    }

    #[test]
    fn test_discover_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_datasets(temp_dir.path(), &FormatRegistry::new()).unwrap();
        assert!(files.is_empty());
    }
}
