//! Error types for parsing, loading and resolving statements.
//!
//! Every error maps onto an [`ErrorKind`] so callers can branch on the class of
//! failure (`NotFound` vs `InvalidSyntax`, ...) without matching on messages.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification shared by [`ParseError`] and [`SqlSetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The registry (or a collection) has no entries.
    Empty,
    /// A collection or statement is missing.
    NotFound,
    /// Malformed directive, misplaced block or bad metadata payload.
    InvalidSyntax,
    /// A source line exceeded the maximum length, likely file corruption.
    LineTooLong,
    /// A lookup was given neither one nor two identifiers.
    InvalidArgumentCount,
    /// A lookup identifier was the empty string.
    ArgumentEmpty,
    /// An ambiguous single identifier lookup; the collection must be named.
    RequiredArgumentMissing,
    /// Reading a source or walking the source tree failed.
    Io,
    /// The loader options file could not be decoded.
    Config,
}

/// Failure while parsing a single source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid syntax on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("line {line} is longer than {max} bytes, possible line corruption")]
    LineTooLong { line: usize, max: usize },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSyntax { .. } => ErrorKind::InvalidSyntax,
            Self::LineTooLong { .. } => ErrorKind::LineTooLong,
        }
    }

    /// 1-based line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidSyntax { line, .. } | Self::LineTooLong { line, .. } => *line,
        }
    }
}

#[derive(Debug, Error)]
pub enum SqlSetError {
    #[error("parse {source_name}: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: ParseError,
    },

    #[error("registry is empty")]
    EmptyRegistry,

    #[error("collection `{0}` not found")]
    CollectionNotFound(String),

    #[error("statement `{statement}` not found in collection `{collection}`")]
    StatementNotFound {
        collection: String,
        statement: String,
    },

    #[error("invalid number of arguments: expected 1 or 2, got {0}")]
    InvalidArgumentCount(usize),

    #[error("argument {index} is empty")]
    ArgumentEmpty { index: usize },

    #[error(
        "collection identifier not specified for `{statement}` and {collections} collections are loaded"
    )]
    RequiredArgumentMissing {
        statement: String,
        collections: usize,
    },

    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid options in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl SqlSetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { source, .. } => source.kind(),
            Self::EmptyRegistry => ErrorKind::Empty,
            Self::CollectionNotFound(_) | Self::StatementNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgumentCount(_) => ErrorKind::InvalidArgumentCount,
            Self::ArgumentEmpty { .. } => ErrorKind::ArgumentEmpty,
            Self::RequiredArgumentMissing { .. } => ErrorKind::RequiredArgumentMissing,
            Self::Io { .. } | Self::Walk(_) => ErrorKind::Io,
            Self::Config { .. } => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, SqlSetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_keep_their_kind_through_wrapping() {
        let err = SqlSetError::Parse {
            source_name: "users.sql".to_string(),
            source: ParseError::LineTooLong { line: 3, max: 1024 },
        };
        assert_eq!(err.kind(), ErrorKind::LineTooLong);
        assert_eq!(
            err.to_string(),
            "parse users.sql: line 3 is longer than 1024 bytes, possible line corruption"
        );
    }

    #[test]
    fn not_found_variants_share_a_kind() {
        let collection = SqlSetError::CollectionNotFound("users".to_string());
        let statement = SqlSetError::StatementNotFound {
            collection: "users".to_string(),
            statement: "Missing".to_string(),
        };
        assert_eq!(collection.kind(), ErrorKind::NotFound);
        assert_eq!(statement.kind(), ErrorKind::NotFound);
        assert!(matches!(statement, SqlSetError::StatementNotFound { .. }));
    }

    #[test]
    fn argument_and_io_variants_map_to_their_kinds() {
        assert_eq!(
            SqlSetError::InvalidArgumentCount(3).kind(),
            ErrorKind::InvalidArgumentCount
        );
        assert_eq!(
            SqlSetError::ArgumentEmpty { index: 0 }.kind(),
            ErrorKind::ArgumentEmpty
        );
        let io = SqlSetError::Io {
            path: PathBuf::from("q/users.sql"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(io.to_string(), "read q/users.sql: gone");
        let config = SqlSetError::Config {
            path: PathBuf::from("sqlset.json"),
            message: "expected a string".to_string(),
        };
        assert_eq!(config.kind(), ErrorKind::Config);
    }
}
