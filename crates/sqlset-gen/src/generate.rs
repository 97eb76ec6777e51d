//! Rust source generation: one constant per `collection.statement` pair.
//!
//! ```text
//! pub mod queries {
//!     pub mod users {
//!         pub const GET_USER_BY_ID: &str = "users.GetUserById";
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{anyhow, bail, Result};
use heck::{ToShoutySnakeCase, ToSnakeCase};
use sqlset::registry::ID_SEPARATOR;
use sqlset::Registry;

const HEADER: &str = "// Code generated by sqlset-gen. DO NOT EDIT.\n";
const INDENT: &str = "    ";

// Keywords that cannot be used as module names.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Render the constants module for every statement in `registry`.
///
/// Collections and statements are emitted in sorted order so the output is
/// stable across runs.
pub fn generate_constants(registry: &Registry, module_name: &str) -> Result<String> {
    let module = module_ident(module_name);
    if module.is_empty() {
        bail!("module name `{module_name}` has no identifier characters");
    }

    // module ident -> (collection id, constant ident -> statement id)
    let mut modules: BTreeMap<String, (&str, BTreeMap<String, String>)> = BTreeMap::new();

    let mut collections: Vec<_> = registry.iter().collect();
    collections.sort_by(|a, b| a.id().cmp(b.id()));

    for collection in collections {
        // `Registry::get` splits on the first separator; a dotted id never resolves.
        if collection.id().contains(ID_SEPARATOR) {
            bail!(
                "collection `{}` contains `{ID_SEPARATOR}` and cannot be addressed as `collection.statement`; set a dot-free `id` in its --META block",
                collection.id()
            );
        }

        let ident = module_ident(collection.id());
        if ident.is_empty() {
            bail!("collection `{}` has no identifier characters", collection.id());
        }

        let mut constants = BTreeMap::new();
        for statement in collection.statement_ids() {
            let constant = const_ident(&statement);
            if constant.is_empty() {
                bail!(
                    "statement `{statement}` in collection `{}` has no identifier characters",
                    collection.id()
                );
            }
            if let Some(previous) = constants.get(&constant) {
                bail!(
                    "statements `{previous}` and `{statement}` in collection `{}` both map to constant `{constant}`",
                    collection.id()
                );
            }
            constants.insert(constant, statement);
        }

        if let Some((previous, _)) = modules.get(&ident) {
            bail!(
                "collections `{previous}` and `{}` both map to module `{ident}`",
                collection.id()
            );
        }
        tracing::debug!(
            collection = collection.id(),
            module = %ident,
            constants = constants.len(),
            "generating module"
        );
        modules.insert(ident, (collection.id(), constants));
    }

    let mut out = String::new();
    render(&mut out, &module, registry, &modules).map_err(|e| anyhow!("render: {e}"))?;
    Ok(out)
}

fn render(
    out: &mut String,
    module: &str,
    registry: &Registry,
    modules: &BTreeMap<String, (&str, BTreeMap<String, String>)>,
) -> std::fmt::Result {
    writeln!(out, "{HEADER}")?;
    writeln!(out, "pub mod {module} {{")?;

    for (index, (ident, (collection_id, constants))) in modules.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }

        if let Ok(collection) = registry.collection(collection_id) {
            let meta = collection.meta();
            if meta.name != meta.id {
                writeln!(out, "{INDENT}/// {}", single_line(&meta.name))?;
            }
            if !meta.description.is_empty() {
                if meta.name != meta.id {
                    writeln!(out, "{INDENT}///")?;
                }
                writeln!(out, "{INDENT}/// {}", single_line(&meta.description))?;
            }
        }

        writeln!(out, "{INDENT}pub mod {ident} {{")?;
        for (constant, statement) in constants {
            let value = format!("{collection_id}.{statement}");
            writeln!(out, "{INDENT}{INDENT}pub const {constant}: &str = {value:?};")?;
        }
        writeln!(out, "{INDENT}}}")?;
    }

    writeln!(out, "}}")
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn module_ident(raw: &str) -> String {
    let ident = sanitize(&raw.to_snake_case());
    if KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}

fn const_ident(raw: &str) -> String {
    sanitize(&raw.to_shouty_snake_case())
}

/// Keep ASCII identifier characters; prefix `_` when the result would start
/// with a digit.
fn sanitize(cased: &str) -> String {
    let ident: String = cased
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    match ident.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        _ => ident,
    }
}
