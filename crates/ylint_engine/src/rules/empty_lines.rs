use serde::Deserialize;

use crate::problem::{Level, Problem};
use crate::rules::Rule;
use crate::source::Source;

pub(crate) const ID: &str = "empty-lines";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct Options {
    max: usize,
    max_start: usize,
    max_end: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max: 2,
            max_start: 0,
            max_end: 0,
        }
    }
}

/// Limits consecutive blank lines, with separate limits at the start and
/// end of the file.
#[derive(Debug)]
pub(crate) struct EmptyLines {
    options: Options,
}

impl EmptyLines {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    fn limit_for(&self, first: usize, last: usize, line_count: usize) -> usize {
        if first == 1 {
            self.options.max_start
        } else if last == line_count {
            self.options.max_end
        } else {
            self.options.max
        }
    }
}

impl Rule for EmptyLines {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        let lines = &source.lines;
        if lines.iter().all(|line| line.text.is_empty()) {
            return;
        }

        let mut run_start: Option<usize> = None;
        for (idx, line) in lines.iter().enumerate() {
            let blank = line.text.is_empty() && !line.in_block_scalar;
            match (blank, run_start) {
                (true, None) => run_start = Some(idx),
                (false, Some(start)) => {
                    self.report_run(start, idx - 1, lines.len(), level, out);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            self.report_run(start, lines.len() - 1, lines.len(), level, out);
        }
    }
}

impl EmptyLines {
    /// `start` and `end` are inclusive 0-based indexes of a blank run.
    fn report_run(
        &self,
        start: usize,
        end: usize,
        line_count: usize,
        level: Level,
        out: &mut Vec<Problem>,
    ) {
        let count = end - start + 1;
        let limit = self.limit_for(start + 1, end + 1, line_count);
        if count > limit {
            out.push(Problem::new(
                end + 1,
                1,
                format!("too many blank lines ({count} > {limit})"),
                level,
                ID,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{positions, run};
    use pretty_assertions::assert_eq;

    fn default_rule() -> EmptyLines {
        EmptyLines::new(Options::default())
    }

    #[test]
    fn test_middle_run_over_max() {
        let problems = run(&default_rule(), "a: 1\n\n\n\nb: 2\n");
        assert_eq!(positions(&problems), vec![(4, 1)]);
        assert_eq!(problems[0].message, "too many blank lines (3 > 2)");
    }

    #[test]
    fn test_middle_run_within_max() {
        assert!(run(&default_rule(), "a: 1\n\n\nb: 2\n").is_empty());
    }

    #[test]
    fn test_blank_lines_at_start() {
        let problems = run(&default_rule(), "\na: 1\n");
        assert_eq!(positions(&problems), vec![(1, 1)]);
        assert_eq!(problems[0].message, "too many blank lines (1 > 0)");
    }

    #[test]
    fn test_blank_lines_at_end() {
        let problems = run(&default_rule(), "a: 1\n\n\n");
        assert_eq!(positions(&problems), vec![(3, 1)]);
        assert_eq!(problems[0].message, "too many blank lines (2 > 0)");
    }

    #[test]
    fn test_blank_file_is_ignored() {
        assert!(run(&default_rule(), "\n\n").is_empty());
        assert!(run(&default_rule(), "").is_empty());
    }

    #[test]
    fn test_blank_lines_inside_block_scalar_are_content() {
        let text = "script: |\n  a\n\n\n\n  b\nnext: 1\n";
        assert!(run(&default_rule(), text).is_empty());
    }
}
