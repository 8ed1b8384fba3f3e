use serde::Deserialize;

use crate::problem::{Level, Problem};
use crate::rules::Rule;
use crate::source::Source;

pub(crate) const ID: &str = "new-lines";
pub(crate) const END_OF_FILE_ID: &str = "new-line-at-end-of-file";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum NewLineType {
    #[default]
    Unix,
    Dos,
    Platform,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct Options {
    #[serde(rename = "type")]
    kind: NewLineType,
}

/// Checks the line terminator style, judged on the first line break.
#[derive(Debug)]
pub(crate) struct NewLines {
    options: Options,
}

impl NewLines {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    fn expects_dos(&self) -> bool {
        match self.options.kind {
            NewLineType::Unix => false,
            NewLineType::Dos => true,
            NewLineType::Platform => cfg!(windows),
        }
    }
}

impl Rule for NewLines {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        let Some(newline) = source.text.find('\n') else {
            return;
        };
        let first_line = &source.text[..newline];
        let has_cr = first_line.ends_with('\r');

        if self.expects_dos() && !has_cr {
            let column = first_line.chars().count() + 1;
            out.push(Problem::new(
                1,
                column,
                "wrong new line character: expected \\r\\n",
                level,
                ID,
            ));
        } else if !self.expects_dos() && has_cr {
            let column = first_line.chars().count();
            out.push(Problem::new(
                1,
                column,
                "wrong new line character: expected \\n",
                level,
                ID,
            ));
        }
    }
}

/// Requires a newline at the end of a non-empty file.
#[derive(Debug)]
pub(crate) struct NewLineAtEndOfFile;

impl Rule for NewLineAtEndOfFile {
    fn id(&self) -> &'static str {
        END_OF_FILE_ID
    }

    fn check(&self, source: &Source<'_>, level: Level, out: &mut Vec<Problem>) {
        if source.text.is_empty() || source.text.ends_with('\n') {
            return;
        }
        if let Some(last) = source.lines.last() {
            out.push(Problem::new(
                last.number,
                last.char_len() + 1,
                "no new line character at the end of file",
                level,
                END_OF_FILE_ID,
            ));
        }
    }
}
