use crate::error::LintError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Patterns picked up by a workspace lint.
pub const YAML_PATTERNS: [&str; 2] = ["**/*.yaml", "**/*.yml"];

/// Directories a workspace lint never descends into.
pub const EXCLUDED_DIRS: [&str; 2] = ["**/node_modules", "**/.git"];

pub struct FileFinder {
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
}

impl FileFinder {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, LintError> {
        let include_globs = Self::build_globset(include)?;
        let exclude_globs = Self::build_globset(exclude)?;

        Ok(Self {
            include_globs,
            exclude_globs,
        })
    }

    /// Finder for YAML files, skipping `node_modules` and `.git`.
    pub fn yaml() -> Result<Self, LintError> {
        let include: Vec<String> = YAML_PATTERNS.iter().map(|p| p.to_string()).collect();
        let exclude: Vec<String> = EXCLUDED_DIRS
            .iter()
            .flat_map(|p| [p.to_string(), format!("{p}/**")])
            .collect();
        Self::new(&include, &exclude)
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LintError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| LintError::pattern(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| LintError::pattern(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(relative))
    }

    /// Checks if a path, relative to the search root, should be skipped.
    pub fn should_ignore(&self, relative: &Path) -> bool {
        if self.is_excluded(relative) {
            return true;
        }

        self.include_globs
            .as_ref()
            .is_some_and(|includes| !includes.is_match(relative))
    }

    /// Walks `root` and returns the matching files, sorted.
    ///
    /// Excluded directories are pruned rather than walked. Unreadable entries
    /// are skipped.
    pub fn discover_files(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            entry.depth() == 0 || !self.is_excluded(relative)
        });

        let mut files: Vec<PathBuf> = walker
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                !self.should_ignore(relative)
            })
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "a: 1\n").unwrap();
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_build_globset_empty() {
        let result = FileFinder::build_globset(&[]);
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_build_globset_invalid_pattern() {
        let result = FileFinder::build_globset(&["[invalid".to_string()]);
        assert!(matches!(result, Err(LintError::Pattern(_))));
    }

    #[test]
    fn test_yaml_finder() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "a.yaml");
        touch(root, "nested/b.yml");
        touch(root, "README.md");
        touch(root, "node_modules/pkg/c.yaml");
        touch(root, "sub/node_modules/d.yaml");
        touch(root, ".git/e.yml");

        let files = FileFinder::yaml().unwrap().discover_files(root);

        assert_eq!(relative(root, files), vec!["a.yaml", "nested/b.yml"]);
    }

    #[test]
    fn test_custom_include_and_exclude() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "keep/a.yaml");
        touch(root, "skip/b.yaml");

        let finder = FileFinder::new(&["**/*.yaml".to_string()], &["skip/**".to_string()]).unwrap();

        assert_eq!(relative(root, finder.discover_files(root)), vec!["keep/a.yaml"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let files = FileFinder::yaml()
            .unwrap()
            .discover_files(&dir.path().join("missing"));
        assert!(files.is_empty());
    }
}
