//! Line-oriented view of a document.

/// One line of a document, without its line terminator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
    /// Whether the line sits inside a block scalar (`|` or `>`).
    pub in_block_scalar: bool,
}

impl Line<'_> {
    /// Number of characters in the line.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }
}

/// A document split into lines.
///
/// A trailing newline does not open an extra empty line, so `"a\n"` has one
/// line and `"a\n\n"` has two.
#[derive(Debug)]
pub(crate) struct Source<'a> {
    pub text: &'a str,
    pub lines: Vec<Line<'a>>,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let mut lines: Vec<Line<'a>> = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .enumerate()
                .map(|(idx, raw)| Line {
                    number: idx + 1,
                    text: raw.strip_suffix('\r').unwrap_or(raw),
                    in_block_scalar: false,
                })
                .collect()
        };

        mark_block_scalars(&mut lines);

        Self { text, lines }
    }

    /// Lines that carry YAML content: not blank and not a comment.
    pub fn content_lines(&self) -> impl Iterator<Item = &Line<'a>> {
        self.lines.iter().filter(|line| {
            let trimmed = line.text.trim_start();
            !trimmed.is_empty() && (line.in_block_scalar || !trimmed.starts_with('#'))
        })
    }
}

fn mark_block_scalars(lines: &mut [Line<'_>]) {
    let mut parent_indent: Option<usize> = None;

    for line in lines.iter_mut() {
        if let Some(indent) = parent_indent {
            if line.is_blank() || line.indent() > indent {
                line.in_block_scalar = true;
                continue;
            }
            parent_indent = None;
        }

        if opens_block_scalar(line.text) {
            parent_indent = Some(line.indent());
        }
    }
}

/// Whether a line ends with a block scalar header such as `key: |` or `- >-`.
fn opens_block_scalar(text: &str) -> bool {
    let trimmed = text.trim_end();
    let Some(token) = trimmed.rsplit(' ').next() else {
        return false;
    };
    if token.len() == trimmed.len() && !trimmed.starts_with(['|', '>']) {
        return false;
    }

    let mut chars = token.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| c == '+' || c == '-' || c.is_ascii_digit())
}

/// Finds the character index of the `#` that opens a comment on this line.
///
/// Quotes are tracked so `"a # b"` is not a comment. A `#` only opens a
/// comment at the start of the line or after whitespace.
pub(crate) fn comment_start(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (idx, ch) in text.chars().enumerate() {
        match quote {
            Some('"') => {
                if ch == '"' && prev != Some('\\') {
                    quote = None;
                }
            }
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => {
                let at_token_start = prev.is_none_or(|p| p.is_whitespace() || "[{,".contains(p));
                if (ch == '"' || ch == '\'') && at_token_start {
                    quote = Some(ch);
                } else if ch == '#' && prev.is_none_or(char::is_whitespace) {
                    return Some(idx);
                }
            }
        }
        prev = Some(ch);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_without_trailing_newline() {
        let source = Source::new("a: 1\nb: 2");
        assert_eq!(source.lines.len(), 2);
        assert_eq!(source.lines[1].text, "b: 2");
        assert_eq!(source.lines[1].number, 2);
    }

    #[test]
    fn test_trailing_newline_does_not_add_line() {
        let source = Source::new("a: 1\n");
        assert_eq!(source.lines.len(), 1);

        let source = Source::new("a: 1\n\n");
        assert_eq!(source.lines.len(), 2);
        assert!(source.lines[1].is_blank());
    }

    #[test]
    fn test_crlf_is_stripped() {
        let source = Source::new("a: 1\r\nb: 2\r\n");
        assert_eq!(source.lines[0].text, "a: 1");
        assert_eq!(source.lines[1].text, "b: 2");
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(Source::new("").lines.is_empty());
    }

    #[test]
    fn test_block_scalar_lines_are_marked() {
        let source = Source::new("script: |\n  # not a comment\n\n  echo hi\nnext: 1\n");
        let marks: Vec<bool> = source.lines.iter().map(|l| l.in_block_scalar).collect();
        assert_eq!(marks, vec![false, true, true, true, false]);
    }

    #[test]
    fn test_block_scalar_header_variants() {
        assert!(opens_block_scalar("key: |"));
        assert!(opens_block_scalar("key: >-"));
        assert!(opens_block_scalar("- |+2"));
        assert!(!opens_block_scalar("key: a|b"));
        assert!(!opens_block_scalar("key: value"));
    }

    #[test]
    fn test_comment_start() {
        assert_eq!(comment_start("# full line"), Some(0));
        assert_eq!(comment_start("key: value # inline"), Some(11));
        assert_eq!(comment_start("key: \"a # b\""), None);
        assert_eq!(comment_start("key: 'a # b' # c"), Some(13));
        assert_eq!(comment_start("url: http://x/#anchor"), None);
        assert_eq!(comment_start("key: it's # c"), Some(10));
    }
}
