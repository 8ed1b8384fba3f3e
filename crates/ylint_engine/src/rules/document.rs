use serde::Deserialize;

use crate::problem::{Level, Problem};
use crate::rules::Rule;
use crate::source::Source;

pub(crate) const START_ID: &str = "document-start";
pub(crate) const END_ID: &str = "document-end";

const START_MARKER: &str = "---";
const END_MARKER: &str = "...";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct Options {
    present: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { present: true }
    }
}

fn is_marker(text: &str, marker: &str) -> bool {
    match text.strip_prefix(marker) {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t']),
        None => false,
    }
}

/// Requires (or forbids) the `---` document start marker.
#[derive(Debug)]
pub(crate) struct DocumentStart {
    options: Options,
}

impl DocumentStart {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Rule for DocumentStart {
    fn id(&self) -> &'static str {
        START_ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        if self.options.present {
            let first = source
                .content_lines()
                .find(|line| !line.text.starts_with('%'));
            if let Some(line) = first
                && !is_marker(line.text, START_MARKER)
            {
                out.push(Problem::new(
                    line.number,
                    1,
                    "missing document start \"---\"",
                    level,
                    START_ID,
                ));
            }
        } else {
            for line in source.lines.iter().filter(|l| !l.in_block_scalar) {
                if is_marker(line.text, START_MARKER) {
                    out.push(Problem::new(
                        line.number,
                        1,
                        "found forbidden document start \"---\"",
                        level,
                        START_ID,
                    ));
                }
            }
        }
    }
}

/// Requires (or forbids) the `...` document end marker.
#[derive(Debug)]
pub(crate) struct DocumentEnd {
    options: Options,
}

impl DocumentEnd {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Rule for DocumentEnd {
    fn id(&self) -> &'static str {
        END_ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        if self.options.present {
            if let Some(line) = source.content_lines().last()
                && !is_marker(line.text, END_MARKER)
            {
                out.push(Problem::new(
                    line.number,
                    1,
                    "missing document end \"...\"",
                    level,
                    END_ID,
                ));
            }
        } else {
            for line in source.lines.iter().filter(|l| !l.in_block_scalar) {
                if is_marker(line.text, END_MARKER) {
                    out.push(Problem::new(
                        line.number,
                        1,
                        "found forbidden document end \"...\"",
                        level,
                        END_ID,
                    ));
                }
            }
        }
    }
}
