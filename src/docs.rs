use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Markdown documentation under `<repo>/docs/`.
pub struct DocLibrary {
    docs_dir: PathBuf,
}

impl DocLibrary {
    pub fn new(repo_root: &Path) -> Self {
        Self {
            docs_dir: repo_root.join("docs"),
        }
    }

    /// Read one doc; a `docs/` prefix and a missing `.md` suffix are both
    /// tolerated. `None` when no candidate exists.
    pub fn read(&self, filename: &str) -> Result<Option<String>> {
        let name = filename.strip_prefix("docs/").unwrap_or(filename);

        let mut candidates = vec![self.docs_dir.join(name)];
        if !name.ends_with(".md") {
            candidates.push(self.docs_dir.join(format!("{name}.md")));
        }

        for path in candidates {
            if path.is_file() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                return Ok(Some(content));
            }
        }
        Ok(None)
    }

    /// Every Markdown file under the docs directory, as sorted relative paths.
    pub fn available(&self) -> Vec<String> {
        if !self.docs_dir.is_dir() {
            return Vec::new();
        }
        let mut docs: Vec<String> = WalkDir::new(&self.docs_dir)
            .into_iter()
            .flatten()
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
            .map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.docs_dir)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        docs.sort();
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library() -> (TempDir, DocLibrary) {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("guides")).unwrap();
        fs::write(docs.join("system_map.md"), "# System Map\n").unwrap();
        fs::write(docs.join("guides/lighting.md"), "# Lighting\n").unwrap();
        let library = DocLibrary::new(dir.path());
        (dir, library)
    }

    #[test]
    fn reads_with_and_without_suffix_and_prefix() {
        let (_dir, library) = library();
        assert_eq!(
            library.read("system_map.md").unwrap().unwrap(),
            "# System Map\n"
        );
        assert!(library.read("system_map").unwrap().is_some());
        assert!(library.read("docs/system_map").unwrap().is_some());
        assert!(library.read("missing").unwrap().is_none());
    }

    #[test]
    fn lists_docs_recursively() {
        let (_dir, library) = library();
        assert_eq!(library.available(), vec!["guides/lighting.md", "system_map.md"]);
    }
}
