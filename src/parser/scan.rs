//! Comment block scanner for client script files.
//!
//! Splits a file into runs of comment lines and the declaration line each
//! run documents. Line (`//`, `///`) and block (`/* */`, `/** */`) comments
//! are recognised; the markers are stripped from the returned text.

use tracing::trace;

/// A run of comment lines followed directly by a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// Comment text with markers removed. Blank lines are kept as `""`.
    pub lines: Vec<String>,
    /// The non-comment line the block precedes, trimmed.
    pub declaration: String,
    /// 1-based line number of the declaration.
    pub line: usize,
}

/// Scanner over a borrowed file. Each call to [`Scanner::blocks`] starts over.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a, S> {
    lines: &'a [S],
}

impl<'a, S: AsRef<str>> Scanner<'a, S> {
    pub fn new(lines: &'a [S]) -> Self {
        Scanner { lines }
    }

    pub fn blocks(&self) -> Blocks<'a, S> {
        Blocks {
            lines: self.lines,
            pos: 0,
        }
    }
}

/// Lazy iterator over the comment blocks of a file.
#[derive(Debug, Clone)]
pub struct Blocks<'a, S> {
    lines: &'a [S],
    pos: usize,
}

enum LineClass {
    Blank,
    Comment(String),
    Code,
}

impl<S: AsRef<str>> Iterator for Blocks<'_, S> {
    type Item = CommentBlock;

    fn next(&mut self) -> Option<CommentBlock> {
        let mut block: Vec<String> = Vec::new();
        // Blank lines seen since the last comment line
        let mut pending_blanks = 0usize;
        let mut in_block_comment = false;

        while self.pos < self.lines.len() {
            let raw = self.lines[self.pos].as_ref();
            self.pos += 1;

            match classify(raw, &mut in_block_comment) {
                LineClass::Comment(text) => {
                    if !block.is_empty() {
                        block.extend(std::iter::repeat(String::new()).take(pending_blanks));
                    }
                    pending_blanks = 0;
                    // Delimiter-only lines (`/**`, `*/`) carry no text
                    if text.is_empty() && block.is_empty() {
                        continue;
                    }
                    block.push(text);
                }
                LineClass::Blank => {
                    if !block.is_empty() {
                        pending_blanks += 1;
                    }
                }
                LineClass::Code => {
                    if block.is_empty() {
                        continue;
                    }
                    if pending_blanks > 0 {
                        trace!(line = self.pos, "dropping comment block separated from declaration");
                        block.clear();
                        pending_blanks = 0;
                        continue;
                    }
                    trim_trailing_blanks(&mut block);
                    return Some(CommentBlock {
                        lines: block,
                        declaration: raw.trim().to_string(),
                        line: self.pos,
                    });
                }
            }
        }

        if !block.is_empty() {
            trace!("dropping comment block at end of file");
        }
        None
    }
}

fn classify(raw: &str, in_block_comment: &mut bool) -> LineClass {
    let line = raw.trim();

    if *in_block_comment {
        let (body, closed) = match line.find("*/") {
            Some(end) => (&line[..end], true),
            None => (line, false),
        };
        if closed {
            *in_block_comment = false;
        }
        let body = body.strip_prefix('*').unwrap_or(body);
        return LineClass::Comment(strip_space(body));
    }

    if line.is_empty() {
        return LineClass::Blank;
    }

    if let Some(rest) = line.strip_prefix("//") {
        let rest = rest.trim_start_matches('/');
        return LineClass::Comment(strip_space(rest));
    }

    if let Some(rest) = line.strip_prefix("/*") {
        let rest = rest.trim_start_matches('*');
        return match rest.find("*/") {
            Some(end) => LineClass::Comment(strip_space(&rest[..end])),
            None => {
                *in_block_comment = true;
                LineClass::Comment(strip_space(rest))
            }
        };
    }

    LineClass::Code
}

/// Drop one separating space after the marker and any trailing whitespace,
/// keeping deeper indentation intact.
fn strip_space(text: &str) -> String {
    text.strip_prefix(' ').unwrap_or(text).trim_end().to_string()
}

fn trim_trailing_blanks(block: &mut Vec<String>) {
    while block.last().is_some_and(|l| l.is_empty()) {
        block.pop();
    }
}

/// Scan `lines` and collect every attached comment block.
pub fn scan<S: AsRef<str>>(lines: &[S]) -> Vec<CommentBlock> {
    Scanner::new(lines).blocks().collect()
}
