//! Editor-native diagnostic records and the mapping from engine problems.
//!
//! Positions are 0-based. Columns are UTF-16 code units, matching what
//! editors speak, while the engine reports 1-based character columns.

use serde::{Deserialize, Serialize};
use ylint_engine::{Level, Problem};

/// `source` tag carried by every diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "yamllint";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
        }
    }
}

/// A positioned diagnostic ready to hand to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub source: String,
    /// Rule id, when the problem came from a rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Converts engine problems into diagnostics for `text`.
pub fn to_diagnostics(problems: &[Problem], text: &str) -> Vec<DiagnosticRecord> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    problems
        .iter()
        .map(|problem| {
            let line = problem.line.saturating_sub(1);
            let line_text = lines.get(line).copied().unwrap_or("");
            let (start, end) = word_span(line_text, problem.column.saturating_sub(1));
            let line = to_u32(line);

            DiagnosticRecord {
                range: Range::new(Position::new(line, start), Position::new(line, end)),
                message: problem.message.clone(),
                severity: problem.level.into(),
                source: DIAGNOSTIC_SOURCE.to_string(),
                code: problem.rule.clone(),
            }
        })
        .collect()
}

/// The single diagnostic published when a lint pass fails, placed on the
/// document's first character.
pub fn failure_diagnostic(message: impl Into<String>, text: &str) -> DiagnosticRecord {
    let first_line = text.split('\n').next().unwrap_or("");
    let width = first_line
        .chars()
        .next()
        .filter(|c| *c != '\r')
        .map_or(0, |c| c.len_utf16());

    DiagnosticRecord {
        range: Range::new(Position::new(0, 0), Position::new(0, to_u32(width))),
        message: message.into(),
        severity: Severity::Error,
        source: DIAGNOSTIC_SOURCE.to_string(),
        code: None,
    }
}

/// Start and end UTF-16 columns of the "word" starting at character
/// `column`: the run up to the next whitespace. An empty run is widened to
/// one character, clamped to the line length.
fn word_span(line: &str, column: usize) -> (u32, u32) {
    let chars: Vec<char> = line.chars().collect();
    let start = column.min(chars.len());

    let mut end = start;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }
    if end == start {
        end = (start + 1).min(chars.len());
    }

    (utf16_len(&chars[..start]), utf16_len(&chars[..end]))
}

fn utf16_len(chars: &[char]) -> u32 {
    to_u32(chars.iter().map(|c| c.len_utf16()).sum())
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
