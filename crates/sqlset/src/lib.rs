//! sqlset: named SQL statements kept in annotated `.sql` files.
//!
//! Each `.sql` file is a *collection*; its statements are delimited by
//! directive comments:
//!
//! ```text
//! --META
//! {"name": "User Queries", "description": "Queries for the users table"}
//! --end
//!
//! --SQL:GetUserByID
//! SELECT id, name FROM users WHERE id = $1;
//! --end
//! ```
//!
//! The collection id defaults to the lower-cased file name without extension
//! (`users` above) and may be overridden by an `id` field in the metadata.
//!
//! Pipeline: [`token`] classifies lines, [`parser`] runs the block state
//! machine and produces a [`Collection`], [`Registry`] indexes collections
//! and resolves lookups, [`loader`] feeds it from a directory tree.
//!
//! ```no_run
//! use std::path::Path;
//! use sqlset::{load_dir, LoadOptions};
//!
//! let registry = load_dir(Path::new("queries"), &LoadOptions::default())?;
//! let by_pair = registry.get(&["users", "GetUserByID"])?;
//! let dotted = registry.get(&["users.GetUserByID"])?;
//! assert_eq!(by_pair, dotted);
//! # Ok::<(), sqlset::SqlSetError>(())
//! ```

pub mod collection;
pub mod error;
pub mod loader;
pub mod meta;
pub mod parser;
pub mod registry;
pub mod token;

pub use collection::Collection;
pub use error::{ErrorKind, ParseError, Result, SqlSetError};
pub use loader::{collect_sources, load_dir, LoadOptions, Source};
pub use meta::CollectionMeta;
pub use parser::parse_collection;
pub use registry::{CollectionProvider, Registry, StatementProvider};
