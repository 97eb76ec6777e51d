use std::collections::HashMap;

use crate::error::{Result, SqlSetError};
use crate::meta::CollectionMeta;

/// Statements and metadata parsed from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    meta: CollectionMeta,
    statements: HashMap<String, String>,
}

impl Collection {
    pub(crate) fn new(meta: CollectionMeta, statements: HashMap<String, String>) -> Self {
        Self { meta, statements }
    }

    pub fn meta(&self) -> &CollectionMeta {
        &self.meta
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Statement text for `id`.
    pub fn statement(&self, id: &str) -> Result<&str> {
        self.statements
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| SqlSetError::StatementNotFound {
                collection: self.meta.id.clone(),
                statement: id.to_string(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.statements.contains_key(id)
    }

    /// Statement identifiers in ascending order.
    pub fn statement_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.statements.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// `(id, text)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.statements
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Collection {
        let statements = [("b", "SELECT 2;"), ("a", "SELECT 1;"), ("C", "SELECT 3;")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Collection::new(CollectionMeta::with_default_id("sample"), statements)
    }

    #[test]
    fn statement_ids_are_sorted() {
        assert_eq!(sample().statement_ids(), vec!["C", "a", "b"]);
    }

    #[test]
    fn missing_statement_names_its_collection() {
        let err = sample().statement("z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        match err {
            SqlSetError::StatementNotFound {
                collection,
                statement,
            } => {
                assert_eq!(collection, "sample");
                assert_eq!(statement, "z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn membership_and_iteration() {
        let collection = sample();
        assert!(collection.contains("a"));
        assert!(!collection.contains("A"));
        assert_eq!(collection.len(), 3);

        let mut pairs: Vec<_> = collection.iter().collect();
        pairs.sort();
        assert_eq!(pairs, vec![("C", "SELECT 3;"), ("a", "SELECT 1;"), ("b", "SELECT 2;")]);
    }

    #[test]
    fn empty_collection_lists_nothing() {
        let empty = Collection::new(CollectionMeta::with_default_id("empty"), HashMap::new());
        assert!(empty.is_empty());
        assert!(empty.statement_ids().is_empty());
    }
}
