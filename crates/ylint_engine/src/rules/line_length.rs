use serde::Deserialize;

use crate::problem::{Level, Problem};
use crate::rules::Rule;
use crate::source::{Line, Source};

pub(crate) const ID: &str = "line-length";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct Options {
    max: usize,
    allow_non_breakable_words: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max: 80,
            allow_non_breakable_words: true,
        }
    }
}

/// Limits line length, measured in characters.
#[derive(Debug)]
pub(crate) struct LineLength {
    options: Options,
}

impl LineLength {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// A line whose content after indentation and a list or comment marker
    /// has no space cannot be wrapped (long URLs, hashes).
    fn is_non_breakable(line: &Line<'_>) -> bool {
        let mut rest = line.text.trim_start_matches(' ');
        if rest.is_empty() {
            return false;
        }
        if rest.starts_with('#') {
            rest = rest.trim_start_matches('#');
            rest = rest.strip_prefix(' ').unwrap_or(rest);
        } else if let Some(item) = rest.strip_prefix("- ") {
            rest = item;
        }
        !rest.contains(' ')
    }
}

impl Rule for LineLength {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        let max = self.options.max;
        for line in &source.lines {
            let len = line.char_len();
            if len <= max {
                continue;
            }
            if self.options.allow_non_breakable_words && Self::is_non_breakable(line) {
                continue;
            }
            out.push(Problem::new(
                line.number,
                max + 1,
                format!("line too long ({len} > {max} characters)"),
                level,
                ID,
            ));
        }
    }
}
