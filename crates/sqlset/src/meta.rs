//! Collection metadata and the decoder for `--META` payloads.

use serde::{Deserialize, Serialize};

/// Identity and description of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl CollectionMeta {
    /// Metadata for a source without a `--META` block.
    pub fn with_default_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Decode a raw metadata payload.
///
/// `id` and `name` fall back to `default_id` when absent or empty;
/// `description` falls back to empty. The parser reports a malformed payload
/// as a syntax error at the `--META` line.
pub fn decode_meta(
    default_id: &str,
    payload: Option<&str>,
) -> Result<CollectionMeta, serde_json::Error> {
    let mut meta = CollectionMeta::with_default_id(default_id);

    let Some(payload) = payload else {
        return Ok(meta);
    };

    let raw: Option<RawMeta> = serde_json::from_str(payload)?;
    let raw = raw.unwrap_or_default();

    if let Some(id) = raw.id.filter(|s| !s.is_empty()) {
        meta.id = id;
    }
    if let Some(name) = raw.name.filter(|s| !s.is_empty()) {
        meta.name = name;
    }
    meta.description = raw.description.unwrap_or_default();

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payload_uses_default_id_for_id_and_name() {
        let meta = decode_meta("users", None).unwrap();
        assert_eq!(meta, CollectionMeta::with_default_id("users"));
        assert_eq!(meta.name, "users");
        assert!(meta.description.is_empty());
    }

    #[test]
    fn payload_fields_override_defaults() {
        let meta = decode_meta(
            "test1",
            Some(r#"{"id": "override", "name": "Test 1", "description": "Desc"}"#),
        )
        .unwrap();
        assert_eq!(meta.id, "override");
        assert_eq!(meta.name, "Test 1");
        assert_eq!(meta.description, "Desc");
    }

    #[test]
    fn empty_fields_fall_back_and_description_never_inherits() {
        let meta = decode_meta("users", Some(r#"{"id": "", "name": ""}"#)).unwrap();
        assert_eq!(meta.id, "users");
        assert_eq!(meta.name, "users");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn name_only_payload_keeps_derived_id() {
        let meta = decode_meta("users", Some(r#"{"name":"User Queries"}"#)).unwrap();
        assert_eq!(meta.id, "users");
        assert_eq!(meta.name, "User Queries");
    }

    #[test]
    fn null_and_unknown_fields_are_tolerated() {
        assert_eq!(
            decode_meta("a", Some("null")).unwrap(),
            CollectionMeta::with_default_id("a")
        );
        let meta = decode_meta("a", Some(r#"{"owner": "db-team", "name": "A"}"#)).unwrap();
        assert_eq!(meta.name, "A");
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let err = decode_meta("a", Some("{\"name\": ")).unwrap_err();
        assert!(err.is_eof());
        assert!(decode_meta("a", Some("[1, 2]")).is_err());
        assert!(decode_meta("a", Some("")).is_err());
    }
}
