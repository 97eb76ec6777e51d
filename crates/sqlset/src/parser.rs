//! Block parser: turns the text of one source into a [`Collection`].
//!
//! The parser is a small state machine over classified lines (see
//! [`crate::token`]). At most one block is open at a time; statement blocks
//! are committed on `--end`, the metadata block is stashed raw and decoded
//! once the whole source has been read.

use std::collections::HashMap;

use crate::collection::Collection;
use crate::error::ParseError;
use crate::meta::{decode_meta, CollectionMeta};
use crate::token::{classify_line, LineKind, MAX_LINE_LEN, META_KEYWORD, STATEMENT_KEYWORD};

/// Terminator appended after every accumulated body line.
pub const LINE_ENDING: &str = "\n";

/// The block currently open, with the line it was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block<'a> {
    Idle,
    Statement { id: &'a str, line: usize },
    Meta { line: usize },
}

impl Block<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            Block::Idle => "none",
            Block::Statement { .. } => STATEMENT_KEYWORD,
            Block::Meta { .. } => META_KEYWORD,
        }
    }
}

/// Parse `text` into a collection whose id defaults to `default_id`.
///
/// Fails on the first malformed directive, on an unterminated block, on a
/// bad metadata payload, or on a line longer than [`MAX_LINE_LEN`] bytes.
pub fn parse_collection(default_id: &str, text: &str) -> Result<Collection, ParseError> {
    let mut block = Block::Idle;
    let mut body = String::new();
    let mut statements: HashMap<String, String> = HashMap::new();
    let mut meta_payload: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;

        if raw.len() > MAX_LINE_LEN {
            return Err(ParseError::LineTooLong {
                line: line_no,
                max: MAX_LINE_LEN,
            });
        }

        let kind =
            classify_line(raw.trim()).map_err(|e| ParseError::syntax(line_no, e.to_string()))?;

        match (block, kind) {
            (_, LineKind::Blank | LineKind::Comment) | (Block::Idle, LineKind::Content) => {}

            (_, LineKind::Content) => {
                body.push_str(raw);
                body.push_str(LINE_ENDING);
            }

            (Block::Idle, LineKind::OpenStatement(id)) => {
                body.clear();
                block = Block::Statement { id, line: line_no };
            }

            (Block::Idle, LineKind::OpenMeta) => {
                if meta_payload.is_some() {
                    return Err(ParseError::syntax(line_no, "unexpected multiple metadata"));
                }
                body.clear();
                block = Block::Meta { line: line_no };
            }

            (open, LineKind::OpenStatement(_) | LineKind::OpenMeta) => {
                let token = match kind {
                    LineKind::OpenStatement(_) => STATEMENT_KEYWORD,
                    _ => META_KEYWORD,
                };
                return Err(ParseError::syntax(
                    line_no,
                    format!(
                        "unexpected {token} token while a block of type {} is already open",
                        open.type_name()
                    ),
                ));
            }

            (Block::Idle, LineKind::Close) => {
                return Err(ParseError::syntax(
                    line_no,
                    "unexpected close token with nothing open",
                ));
            }

            (Block::Statement { id, .. }, LineKind::Close) => {
                statements.insert(id.to_string(), strip_line_ending(std::mem::take(&mut body)));
                block = Block::Idle;
            }

            (Block::Meta { line }, LineKind::Close) => {
                meta_payload = Some((line, std::mem::take(&mut body)));
                block = Block::Idle;
            }
        }
    }

    match block {
        Block::Idle => {}
        Block::Statement { id, line } => {
            return Err(ParseError::syntax(
                line,
                format!("no closing tag found for block of type {STATEMENT_KEYWORD}, identifier `{id}`"),
            ));
        }
        Block::Meta { line } => {
            return Err(ParseError::syntax(
                line,
                format!("no closing tag found for block of type {META_KEYWORD}"),
            ));
        }
    }

    let meta = match meta_payload {
        Some((line, payload)) => decode_meta(default_id, Some(&payload))
            .map_err(|e| ParseError::syntax(line, format!("invalid metadata: {e}")))?,
        None => CollectionMeta::with_default_id(default_id),
    };

    Ok(Collection::new(meta, statements))
}

fn strip_line_ending(mut text: String) -> String {
    if text.ends_with(LINE_ENDING) {
        text.truncate(text.len() - LINE_ENDING.len());
    }
    text
}
