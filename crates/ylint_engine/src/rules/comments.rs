use serde::Deserialize;

use crate::problem::{Level, Problem};
use crate::rules::Rule;
use crate::source::{Source, comment_start};

pub(crate) const ID: &str = "comments";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct Options {
    require_starting_space: bool,
    min_spaces_from_content: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            require_starting_space: true,
            min_spaces_from_content: 2,
        }
    }
}

/// Checks comment formatting: a space after `#`, and enough spaces between
/// content and an inline comment.
#[derive(Debug)]
pub(crate) struct Comments {
    options: Options,
}

impl Comments {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Rule for Comments {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        for line in source.lines.iter().filter(|l| !l.in_block_scalar) {
            let Some(hash) = comment_start(line.text) else {
                continue;
            };
            let chars: Vec<char> = line.text.chars().collect();

            // Shebang
            if line.number == 1 && hash == 0 && chars.get(1) == Some(&'!') {
                continue;
            }

            let before = &chars[..hash];
            let is_inline = before.iter().any(|c| !c.is_whitespace());
            if is_inline {
                let spaces = before.iter().rev().take_while(|c| c.is_whitespace()).count();
                if spaces < self.options.min_spaces_from_content {
                    out.push(Problem::new(
                        line.number,
                        hash + 1,
                        "too few spaces before comment",
                        level,
                        ID,
                    ));
                }
            }

            if self.options.require_starting_space {
                let body = chars[hash..].iter().position(|c| *c != '#').map(|p| hash + p);
                if let Some(idx) = body
                    && !chars[idx].is_whitespace()
                {
                    out.push(Problem::new(
                        line.number,
                        idx + 1,
                        "missing starting space in comment",
                        level,
                        ID,
                    ));
                }
            }
        }
    }
}
