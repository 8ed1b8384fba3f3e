//! Built-in lint rules.
//!
//! Every rule is line-oriented: it receives the whole [`Source`] and appends
//! problems at the configured [`Level`]. Options are deserialized from the
//! rule's mapping in the configuration file; unknown options are rejected.

mod comments;
mod document;
mod empty_lines;
mod line_length;
mod new_lines;
mod trailing_spaces;

use std::fmt;

use serde::de::DeserializeOwned;

use crate::EngineError;
use crate::problem::{Level, Problem};
use crate::source::Source;

/// Ids of every rule this engine knows, in reporting order.
pub const RULE_IDS: &[&str] = &[
    comments::ID,
    document::END_ID,
    document::START_ID,
    empty_lines::ID,
    line_length::ID,
    new_lines::END_OF_FILE_ID,
    new_lines::ID,
    trailing_spaces::ID,
];

/// A configured lint rule.
pub(crate) trait Rule: fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>);
}

/// Builds the rule `id` from its option mapping (with `level` and `ignore`
/// already removed).
pub(crate) fn build(id: &str, options: serde_yaml::Mapping) -> Result<Box<dyn Rule>, EngineError> {
    let rule: Box<dyn Rule> = match id {
        comments::ID => Box::new(comments::Comments::new(parse_options(id, options)?)),
        document::START_ID => Box::new(document::DocumentStart::new(parse_options(id, options)?)),
        document::END_ID => Box::new(document::DocumentEnd::new(parse_options(id, options)?)),
        empty_lines::ID => Box::new(empty_lines::EmptyLines::new(parse_options(id, options)?)),
        line_length::ID => Box::new(line_length::LineLength::new(parse_options(id, options)?)),
        new_lines::ID => Box::new(new_lines::NewLines::new(parse_options(id, options)?)),
        new_lines::END_OF_FILE_ID => {
            expect_no_options(id, &options)?;
            Box::new(new_lines::NewLineAtEndOfFile)
        }
        trailing_spaces::ID => {
            expect_no_options(id, &options)?;
            Box::new(trailing_spaces::TrailingSpaces)
        }
        other => return Err(EngineError::UnknownRule(other.to_string())),
    };
    Ok(rule)
}

fn parse_options<T: DeserializeOwned>(
    rule: &str,
    options: serde_yaml::Mapping,
) -> Result<T, EngineError> {
    serde_yaml::from_value(serde_yaml::Value::Mapping(options))
        .map_err(|e| EngineError::option(rule, e.to_string()))
}

fn expect_no_options(rule: &str, options: &serde_yaml::Mapping) -> Result<(), EngineError> {
    match options.keys().next() {
        None => Ok(()),
        Some(key) => Err(EngineError::option(
            rule,
            format!("unknown option {}", serde_yaml::to_string(key).unwrap_or_default().trim()),
        )),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Runs `rule` over `text` at error level.
    pub fn run(rule: &dyn Rule, text: &str) -> Vec<Problem> {
        let source = Source::new(text);
        let mut out = Vec::new();
        rule.check(&source, Level::Error, &mut out);
        out
    }

    /// Returns `(line, column)` pairs for quick assertions.
    pub fn positions(problems: &[Problem]) -> Vec<(usize, usize)> {
        problems.iter().map(|p| (p.line, p.column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> serde_yaml::Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_build_every_known_rule_with_defaults() {
        for id in RULE_IDS {
            let rule = build(id, serde_yaml::Mapping::new()).unwrap();
            assert_eq!(rule.id(), *id);
        }
    }

    #[test]
    fn test_build_unknown_rule() {
        let err = build("no-such-rule", serde_yaml::Mapping::new()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownRule(ref id) if id == "no-such-rule"));
    }

    #[test]
    fn test_build_rejects_unknown_option() {
        let err = build("line-length", mapping("maximum: 3")).unwrap_err();
        assert!(err.to_string().contains("line-length"), "{err}");
    }

    #[test]
    fn test_build_rejects_options_for_optionless_rule() {
        let err = build("trailing-spaces", mapping("foo: 1")).unwrap_err();
        assert!(err.to_string().contains("unknown option foo"), "{err}");
    }

    #[test]
    fn test_build_rejects_wrong_option_type() {
        assert!(build("empty-lines", mapping("max: lots")).is_err());
    }
}
