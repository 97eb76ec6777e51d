//! The read-only registry of collections and its lookup rules.
//!
//! A [`Registry`] is built once from a set of sources and never mutated
//! afterwards, so an `Arc<Registry>` can be shared between threads without
//! locking.
//!
//! Lookups accept one or two identifiers:
//!
//! - `["users", "GetUser"]`: collection and statement,
//! - `["users.GetUser"]`: the same, split on the first `.`,
//! - `["GetUser"]`: only valid while exactly one collection is loaded.

use std::collections::HashMap;
use std::path::Path;

use crate::collection::Collection;
use crate::error::{Result, SqlSetError};
use crate::meta::CollectionMeta;
use crate::parser::parse_collection;
use crate::token::SOURCE_EXTENSION;

/// Separator between collection and statement in a single identifier.
pub const ID_SEPARATOR: char = '.';

/// Lookup of statement text by loosely specified identifiers.
pub trait StatementProvider {
    fn get(&self, ids: &[&str]) -> Result<&str>;

    /// Like [`StatementProvider::get`], but panics on failure.
    ///
    /// Use where a missing statement is a programming error.
    fn must_get(&self, ids: &[&str]) -> &str {
        match self.get(ids) {
            Ok(statement) => statement,
            Err(err) => panic!("sqlset: {err}"),
        }
    }
}

/// Listing of the loaded collections.
pub trait CollectionProvider {
    fn collection_metas(&self) -> Vec<CollectionMeta>;
    fn statement_ids(&self, collection: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    collections: HashMap<String, Collection>,
}

impl Registry {
    /// Parse every `(name, content)` source and register the results.
    ///
    /// Names without the `.sql` extension (any case) are skipped. The default
    /// collection id is the lower-cased file name without its extension; a
    /// `--META` block may override it. The first parse failure aborts the
    /// whole construction.
    pub fn from_sources<I, N, C>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        Self::from_sources_with_extension(sources, SOURCE_EXTENSION)
    }

    /// Like [`Registry::from_sources`], recognizing `extension` (without the
    /// dot) instead of `sql`.
    pub fn from_sources_with_extension<I, N, C>(sources: I, extension: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut collections = Vec::new();

        for (name, content) in sources {
            let name = name.as_ref();
            let Some(default_id) = default_collection_id(name, extension) else {
                tracing::debug!(source = name, "skipping source with unrecognized extension");
                continue;
            };

            let collection = parse_collection(&default_id, content.as_ref()).map_err(|source| {
                SqlSetError::Parse {
                    source_name: name.to_string(),
                    source,
                }
            })?;

            tracing::debug!(
                source = name,
                collection = collection.id(),
                statements = collection.len(),
                "parsed source"
            );
            collections.push(collection);
        }

        Ok(Self::from_collections(collections))
    }

    /// Register already parsed collections under their metadata ids.
    ///
    /// When two collections share an id the later one wins.
    pub fn from_collections<I>(collections: I) -> Self
    where
        I: IntoIterator<Item = Collection>,
    {
        let mut map = HashMap::new();
        for collection in collections {
            let id = collection.id().to_string();
            if map.contains_key(&id) {
                tracing::warn!(collection = %id, "duplicate collection id, keeping the last one");
            }
            map.insert(id, collection);
        }

        tracing::info!(collections = map.len(), "registry built");
        Self { collections: map }
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn collection(&self, id: &str) -> Result<&Collection> {
        self.collections
            .get(id)
            .ok_or_else(|| SqlSetError::CollectionNotFound(id.to_string()))
    }

    /// Collections in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    /// Statement `statement` of collection `collection`.
    pub fn statement(&self, collection: &str, statement: &str) -> Result<&str> {
        self.collection(collection)?.statement(statement)
    }

    /// Resolve one or two identifiers to a statement.
    pub fn get<S: AsRef<str>>(&self, ids: &[S]) -> Result<&str> {
        if let Some(index) = ids.iter().position(|id| id.as_ref().is_empty()) {
            return Err(SqlSetError::ArgumentEmpty { index });
        }

        match ids {
            [collection, statement] => self.statement(collection.as_ref(), statement.as_ref()),
            [id] => {
                let id = id.as_ref();
                match id.split_once(ID_SEPARATOR) {
                    Some((collection, statement)) => self.statement(collection, statement),
                    None => self.sole_collection(id)?.statement(id),
                }
            }
            _ => Err(SqlSetError::InvalidArgumentCount(ids.len())),
        }
    }

    /// Fail-fast variant of [`Registry::get`].
    ///
    /// # Panics
    ///
    /// Panics when the statement cannot be resolved.
    pub fn must_get<S: AsRef<str>>(&self, ids: &[S]) -> &str {
        match self.get(ids) {
            Ok(statement) => statement,
            Err(err) => panic!("sqlset: {err}"),
        }
    }

    /// Metadata of every collection, in unspecified order.
    pub fn collection_metas(&self) -> Vec<CollectionMeta> {
        self.collections.values().map(|c| c.meta().clone()).collect()
    }

    /// Statement ids of `collection`, sorted ascending.
    pub fn statement_ids(&self, collection: &str) -> Result<Vec<String>> {
        Ok(self.collection(collection)?.statement_ids())
    }

    fn sole_collection(&self, statement: &str) -> Result<&Collection> {
        let mut values = self.collections.values();
        match (values.next(), values.next()) {
            (None, _) => Err(SqlSetError::EmptyRegistry),
            (Some(only), None) => Ok(only),
            (Some(_), Some(_)) => Err(SqlSetError::RequiredArgumentMissing {
                statement: statement.to_string(),
                collections: self.collections.len(),
            }),
        }
    }
}

impl StatementProvider for Registry {
    fn get(&self, ids: &[&str]) -> Result<&str> {
        Registry::get(self, ids)
    }
}

impl CollectionProvider for Registry {
    fn collection_metas(&self) -> Vec<CollectionMeta> {
        Registry::collection_metas(self)
    }

    fn statement_ids(&self, collection: &str) -> Result<Vec<String>> {
        Registry::statement_ids(self, collection)
    }
}

/// Default collection id for a source name: the lower-cased file name with
/// its `extension` removed. `None` when the extension does not match.
pub fn default_collection_id(name: &str, extension: &str) -> Option<String> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    let lower = file_name.to_lowercase();
    let stem = lower
        .strip_suffix(extension.to_lowercase().as_str())?
        .strip_suffix('.')?;
    (!stem.is_empty()).then(|| stem.to_string())
}
