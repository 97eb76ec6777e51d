//! Loads the bundled `queries/` collection and walks through every lookup form.
//!
//! Run with: cargo run -p sqlset --example queries_demo

use std::path::Path;

use sqlset::{load_dir, CollectionProvider, LoadOptions, StatementProvider};

fn main() -> Result<(), sqlset::SqlSetError> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("examples/queries");
    let registry = load_dir(&root, &LoadOptions::default())?;

    let queries: &dyn StatementProvider = &registry;
    let collections: &dyn CollectionProvider = &registry;

    let query = queries.get(&["users", "GetUserByID"])?;
    println!("GetUserByID (collection and statement):\n{query}\n");

    let query = queries.get(&["users.CreateUser"])?;
    println!("CreateUser (dotted):\n{query}\n");

    // Only one collection is loaded, so the bare statement id is enough.
    let query = queries.get(&["CreateUser"])?;
    println!("CreateUser (bare id):\n{query}\n");

    let query = queries.must_get(&["users", "CreateUser"]);
    println!("CreateUser (must_get):\n{query}\n");

    println!("--------------------------------");
    for meta in collections.collection_metas() {
        println!(
            "collection {}: name {:?}, description {:?}",
            meta.id, meta.name, meta.description
        );
    }

    let ids = collections.statement_ids("users")?;
    println!("statements in `users`: {ids:?}");

    Ok(())
}
