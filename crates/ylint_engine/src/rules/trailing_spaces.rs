use crate::problem::{Level, Problem};
use crate::rules::Rule;
use crate::source::Source;

pub(crate) const ID: &str = "trailing-spaces";

/// Forbids spaces or tabs at the end of a line.
#[derive(Debug)]
pub(crate) struct TrailingSpaces;

impl Rule for TrailingSpaces {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        for line in &source.lines {
            let kept = line.text.trim_end_matches([' ', '\t']);
            if kept.len() != line.text.len() {
                let column = kept.chars().count() + 1;
                out.push(Problem::new(line.number, column, "trailing spaces", level, ID));
            }
        }
    }
}
