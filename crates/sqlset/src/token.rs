//! Line classification for the `.sql` directive format.
//!
//! Directives are lines starting with [`MARKER`]:
//!
//! - `--SQL:<id>` opens a statement block,
//! - `--META` opens the (single) metadata block,
//! - `--end` closes whichever block is open,
//! - anything else after the marker is a plain comment.
//!
//! Lines without the marker are content.

use thiserror::Error;

/// Prefix shared by every directive.
pub const MARKER: &str = "--";
pub const STATEMENT_KEYWORD: &str = "SQL";
pub const KEY_SEPARATOR: &str = ":";
pub const META_KEYWORD: &str = "META";
pub const CLOSE_KEYWORD: &str = "end";

/// Longest accepted source line in bytes, line terminator excluded.
pub const MAX_LINE_LEN: usize = 1024;

/// File extension (without the dot) of recognized sources.
pub const SOURCE_EXTENSION: &str = "sql";

/// A directive that cannot be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no statement identifier given after `--SQL:`")]
    EmptyStatementId,
}

/// Classification of one trimmed source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    OpenStatement(&'a str),
    OpenMeta,
    Close,
    /// Not a directive; accumulated if a block is open.
    Content,
}

/// Classify `line`, which must already be trimmed of surrounding whitespace.
///
/// Prefixes are checked in order: statement-open, metadata-open, close, then
/// the comment fallback. The only failure is a statement-open with an empty
/// identifier.
pub fn classify_line(line: &str) -> Result<LineKind<'_>, TokenError> {
    if line.is_empty() {
        return Ok(LineKind::Blank);
    }

    let Some(rest) = line.strip_prefix(MARKER) else {
        return Ok(LineKind::Content);
    };

    if let Some(key) = rest
        .strip_prefix(STATEMENT_KEYWORD)
        .and_then(|r| r.strip_prefix(KEY_SEPARATOR))
    {
        let key = key.trim();
        if key.is_empty() {
            return Err(TokenError::EmptyStatementId);
        }
        return Ok(LineKind::OpenStatement(key));
    }

    if rest.starts_with(META_KEYWORD) {
        return Ok(LineKind::OpenMeta);
    }

    if rest.starts_with(CLOSE_KEYWORD) {
        return Ok(LineKind::Close);
    }

    Ok(LineKind::Comment)
}
