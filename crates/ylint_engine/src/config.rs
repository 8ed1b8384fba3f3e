//! Lint configuration.
//!
//! A configuration is a YAML document (JSON works too, being a YAML subset)
//! in the yamllint format:
//!
//! ```yaml
//! extends: default
//! rules:
//!   line-length:
//!     max: 120
//!     level: warning
//!   document-start: disable
//! ignore: |
//!   vendor/
//!   *.generated.yaml
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::{debug, error};

use crate::EngineError;
use crate::problem::Level;
use crate::rules::{self, Rule};

/// Preset every configuration implicitly starts from when it has no `extends`.
pub const DEFAULT_PRESET: &str = "default";

const DEFAULT_PRESET_YAML: &str = "\
rules:
  comments:
    level: warning
  document-end: disable
  document-start:
    level: warning
  empty-lines: enable
  line-length: enable
  new-line-at-end-of-file: enable
  new-lines: enable
  trailing-spaces: enable
";

const RELAXED_PRESET_YAML: &str = "\
extends: default
rules:
  comments: disable
  document-start: disable
  empty-lines:
    level: warning
  line-length:
    level: warning
    max: 120
  trailing-spaces:
    level: warning
";

/// `extends` chains longer than this are treated as cycles.
const MAX_EXTENDS_DEPTH: usize = 8;

/// Where a configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A configuration file on disk.
    File(PathBuf),
    /// Configuration text held in memory.
    Inline(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    rules: BTreeMap<String, RawRule>,
    #[serde(default)]
    ignore: Option<IgnorePatterns>,
    /// Accepted for compatibility with yamllint; file selection is up to the caller.
    #[serde(default)]
    #[allow(dead_code)]
    yaml_files: Option<Vec<String>>,
    #[serde(default)]
    #[allow(dead_code)]
    locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Toggle(Toggle),
    Options(serde_yaml::Mapping),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Toggle {
    Enable,
    Disable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IgnorePatterns {
    Block(String),
    List(Vec<String>),
}

impl IgnorePatterns {
    fn patterns(&self) -> Vec<String> {
        let lines: Vec<&str> = match self {
            IgnorePatterns::Block(block) => block.lines().collect(),
            IgnorePatterns::List(list) => list.iter().map(String::as_str).collect(),
        };
        lines
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty() && !p.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

/// Rule settings after `extends` has been applied, before rules are built.
#[derive(Debug, Clone)]
enum RuleSetting {
    Disabled,
    Enabled(serde_yaml::Mapping),
}

#[derive(Debug, Default)]
struct MergedConfig {
    rules: BTreeMap<String, RuleSetting>,
    ignore: Vec<String>,
}

impl MergedConfig {
    /// Applies `raw` on top of `self`, following yamllint's extends semantics:
    /// option mappings are merged key by key, `enable` keeps inherited options.
    fn apply(&mut self, raw: RawConfig) {
        for (id, rule) in raw.rules {
            let merged = match (rule, self.rules.remove(&id)) {
                (RawRule::Toggle(Toggle::Disable), _) => RuleSetting::Disabled,
                (RawRule::Toggle(Toggle::Enable), Some(RuleSetting::Enabled(base))) => {
                    RuleSetting::Enabled(base)
                }
                (RawRule::Toggle(Toggle::Enable), _) => {
                    RuleSetting::Enabled(serde_yaml::Mapping::new())
                }
                (RawRule::Options(options), Some(RuleSetting::Enabled(mut base))) => {
                    base.extend(options);
                    RuleSetting::Enabled(base)
                }
                (RawRule::Options(options), _) => RuleSetting::Enabled(options),
            };
            self.rules.insert(id, merged);
        }

        if let Some(ignore) = raw.ignore {
            self.ignore = ignore.patterns();
        }
    }
}

/// A rule with its level and per-rule ignore patterns.
#[derive(Debug)]
pub(crate) struct ConfiguredRule {
    pub rule: Box<dyn Rule>,
    pub level: Level,
    pub ignore: Option<GlobSet>,
}

/// A parsed, immutable lint configuration.
pub struct LintConfig {
    rules: Vec<ConfiguredRule>,
    ignore: Option<GlobSet>,
    /// Directory ignore patterns are relative to; the config file's directory.
    base_dir: Option<PathBuf>,
}

impl fmt::Debug for LintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintConfig")
            .field("rules", &self.rule_ids())
            .field("ignore", &self.ignore.as_ref().map(GlobSet::len))
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

impl LintConfig {
    /// Loads a configuration from `source`.
    pub fn load(source: &ConfigSource) -> Result<Self, EngineError> {
        match source {
            ConfigSource::File(path) => Self::from_file(path),
            ConfigSource::Inline(text) => Self::from_yaml(text, None),
        }
    }

    /// Loads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path.parent())
    }

    /// Parses configuration text. `base_dir` anchors relative `extends`
    /// paths and ignore patterns.
    pub fn from_yaml(text: &str, base_dir: Option<&Path>) -> Result<Self, EngineError> {
        let mut merged = MergedConfig::default();
        resolve_layers(text, base_dir, &mut merged, 0)?;
        Self::build(merged, base_dir)
    }

    /// The built-in `default` preset.
    pub fn default_preset() -> Self {
        Self::from_yaml(DEFAULT_PRESET_YAML, None).unwrap_or_else(|e| {
            error!("Built-in default preset is invalid: {}", e);
            Self {
                rules: Vec::new(),
                ignore: None,
                base_dir: None,
            }
        })
    }

    fn build(merged: MergedConfig, base_dir: Option<&Path>) -> Result<Self, EngineError> {
        let mut rules = Vec::new();
        for (id, setting) in merged.rules {
            let RuleSetting::Enabled(mut options) = setting else {
                continue;
            };

            let level = match options.remove("level") {
                None => Level::Error,
                Some(value) => serde_yaml::from_value(value).map_err(|_| {
                    EngineError::option(&id, "level should be \"error\" or \"warning\"")
                })?,
            };
            let ignore = match options.remove("ignore") {
                None => None,
                Some(value) => {
                    let patterns: IgnorePatterns = serde_yaml::from_value(value)
                        .map_err(|e| EngineError::option(&id, e.to_string()))?;
                    build_globset(&patterns.patterns())?
                }
            };

            rules.push(ConfiguredRule {
                rule: rules::build(&id, options)?,
                level,
                ignore,
            });
        }

        Ok(Self {
            rules,
            ignore: build_globset(&merged.ignore)?,
            base_dir: base_dir.map(Path::to_path_buf),
        })
    }

    /// Ids of the enabled rules, sorted.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.rule.id()).collect()
    }

    /// Level of an enabled rule, or `None` when the rule is disabled.
    pub fn level_of(&self, rule: &str) -> Option<Level> {
        self.rules
            .iter()
            .find(|r| r.rule.id() == rule)
            .map(|r| r.level)
    }

    /// Whether the whole file is excluded by the `ignore` patterns.
    pub fn is_file_ignored(&self, path: &Path) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|set| set.is_match(self.relative(path)))
    }

    pub(crate) fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    pub(crate) fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        self.base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path)
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::default_preset()
    }
}

fn resolve_layers(
    text: &str,
    base_dir: Option<&Path>,
    merged: &mut MergedConfig,
    depth: usize,
) -> Result<(), EngineError> {
    if depth > MAX_EXTENDS_DEPTH {
        return Err(EngineError::config("extends chain is too deep"));
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| EngineError::config(e.to_string()))?;
    let value = if value.is_null() {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
    } else {
        value
    };
    let raw: RawConfig =
        serde_yaml::from_value(value).map_err(|e| EngineError::config(e.to_string()))?;

    // Files without `extends` stand alone; only presets and explicit parents layer.
    if let Some(parent) = raw.extends.as_deref() {
        match parent {
            "default" => resolve_layers(DEFAULT_PRESET_YAML, None, merged, depth + 1)?,
            "relaxed" => resolve_layers(RELAXED_PRESET_YAML, None, merged, depth + 1)?,
            path => {
                let path = match base_dir {
                    Some(base) => base.join(path),
                    None => PathBuf::from(path),
                };
                debug!("Extending config from {}", path.display());
                let content =
                    fs::read_to_string(&path).map_err(|source| EngineError::ConfigRead {
                        path: path.clone(),
                        source,
                    })?;
                resolve_layers(&content, path.parent(), merged, depth + 1)?;
            }
        }
    }

    merged.apply(raw);
    Ok(())
}

/// Builds a glob set from gitignore-style patterns. A pattern also matches
/// everything below a directory of that name.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, EngineError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let trimmed = pattern.trim_start_matches('/').trim_end_matches('/');
        for candidate in [trimmed.to_string(), format!("{trimmed}/**")] {
            let glob = Glob::new(&candidate).map_err(|e| EngineError::InvalidGlob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
    }

    let set = builder.build().map_err(|e| EngineError::InvalidGlob {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })?;
    Ok(Some(set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_preset_rules() {
        let config = LintConfig::default_preset();
        assert_eq!(
            config.rule_ids(),
            vec![
                "comments",
                "document-start",
                "empty-lines",
                "line-length",
                "new-line-at-end-of-file",
                "new-lines",
                "trailing-spaces",
            ]
        );
        assert_eq!(config.level_of("trailing-spaces"), Some(Level::Error));
        assert_eq!(config.level_of("document-start"), Some(Level::Warning));
        assert_eq!(config.level_of("document-end"), None);
    }

    #[test]
    fn test_file_without_extends_stands_alone() {
        let config = LintConfig::from_yaml("rules:\n  trailing-spaces: enable\n", None).unwrap();
        assert_eq!(config.rule_ids(), vec!["trailing-spaces"]);
    }

    #[test]
    fn test_extends_default_and_override() {
        let yaml = "\
extends: default
rules:
  line-length:
    max: 120
    level: warning
  document-start: disable
";
        let config = LintConfig::from_yaml(yaml, None).unwrap();
        assert_eq!(config.level_of("line-length"), Some(Level::Warning));
        assert_eq!(config.level_of("document-start"), None);
        assert_eq!(config.level_of("trailing-spaces"), Some(Level::Error));
    }

    #[test]
    fn test_enable_keeps_inherited_level() {
        let yaml = "extends: default\nrules:\n  comments: enable\n";
        let config = LintConfig::from_yaml(yaml, None).unwrap();
        assert_eq!(config.level_of("comments"), Some(Level::Warning));
    }

    #[test]
    fn test_relaxed_preset() {
        let config = LintConfig::from_yaml("extends: relaxed\n", None).unwrap();
        assert_eq!(config.level_of("comments"), None);
        assert_eq!(config.level_of("document-start"), None);
        assert_eq!(config.level_of("line-length"), Some(Level::Warning));
        assert_eq!(config.level_of("new-lines"), Some(Level::Error));
    }

    #[test]
    fn test_json_config() {
        let json = r#"{"extends": "default", "rules": {"trailing-spaces": "disable"}}"#;
        let config = LintConfig::from_yaml(json, None).unwrap();
        assert_eq!(config.level_of("trailing-spaces"), None);
    }

    #[test]
    fn test_empty_config_has_no_rules() {
        let config = LintConfig::from_yaml("", None).unwrap();
        assert!(config.rule_ids().is_empty());
    }

    #[rstest]
    #[case::not_yaml("rules: [unclosed", "Invalid config")]
    #[case::unknown_key("rulez: {}", "Invalid config")]
    #[case::unknown_rule("rules:\n  no-tabs: enable\n", "no such rule")]
    #[case::bad_level("rules:\n  trailing-spaces:\n    level: fatal\n", "level should be")]
    #[case::bad_option("rules:\n  line-length:\n    max: long\n", "line-length")]
    #[case::unknown_preset("extends: strict\n", "Failed to read config")]
    fn test_invalid_configs(#[case] yaml: &str, #[case] expected: &str) {
        let err = LintConfig::from_yaml(yaml, None).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "Error message '{}' should contain '{}'",
            err,
            expected
        );
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempdir().unwrap();
        let err = LintConfig::from_file(dir.path().join(".yamllint")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigRead { .. }));
    }

    #[test]
    fn test_extends_relative_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.yaml"),
            "rules:\n  trailing-spaces:\n    level: warning\n",
        )
        .unwrap();
        let child = dir.path().join(".yamllint");
        fs::write(&child, "extends: base.yaml\nrules:\n  new-lines: enable\n").unwrap();

        let config = LintConfig::from_file(&child).unwrap();
        assert_eq!(config.rule_ids(), vec!["new-lines", "trailing-spaces"]);
        assert_eq!(config.level_of("trailing-spaces"), Some(Level::Warning));
    }

    #[test]
    fn test_self_extending_config_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loop.yaml");
        fs::write(&path, "extends: loop.yaml\n").unwrap();
        let err = LintConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("too deep"), "{err}");
    }

    #[test]
    fn test_ignore_patterns_relative_to_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".yamllint");
        fs::write(
            &path,
            "extends: default\nignore: |\n  vendor/\n  *.generated.yaml\n",
        )
        .unwrap();

        let config = LintConfig::from_file(&path).unwrap();
        assert!(config.is_file_ignored(&dir.path().join("vendor/lib/a.yaml")));
        assert!(config.is_file_ignored(&dir.path().join("deep/x.generated.yaml")));
        assert!(!config.is_file_ignored(&dir.path().join("src/a.yaml")));
    }

    #[test]
    fn test_ignore_list_form() {
        let config =
            LintConfig::from_yaml("ignore:\n  - build\n  - '*.lock.yaml'\n", None).unwrap();
        assert!(config.is_file_ignored(Path::new("build/out.yaml")));
        assert!(config.is_file_ignored(Path::new("deps.lock.yaml")));
        assert!(!config.is_file_ignored(Path::new("main.yaml")));
    }
}
