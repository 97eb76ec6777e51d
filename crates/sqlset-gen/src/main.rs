//! sqlset-gen
//!
//! Command-line front end over the `sqlset` library:
//! - `generate`: emit Rust constants for every `collection.statement` pair
//! - `check`: parse a query directory and report failures
//! - `list`: print collections and their statement ids

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlset::{load_dir, LoadOptions, Registry};
use tracing_subscriber::EnvFilter;

mod generate;

use generate::generate_constants;

#[derive(Parser)]
#[command(name = "sqlset-gen")]
#[command(
    author,
    version,
    about = "Generate and inspect sqlset statement identifiers"
)]
struct Cli {
    /// JSON file with loader options (`extension`, `exclude_dir_names`, `follow_links`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Rust module with one constant per statement.
    Generate {
        /// Root directory of the `.sql` files.
        dir: PathBuf,

        /// Name of the outer module.
        #[arg(short, long, default_value = "queries")]
        module: String,

        /// Output file (stdout when omitted).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse every file and report the first error.
    Check {
        dir: PathBuf,
    },

    /// List collections with their statement ids.
    List {
        dir: PathBuf,

        /// Print JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = match &cli.config {
        Some(path) => LoadOptions::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LoadOptions::default(),
    };

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    match cli.command {
        Commands::Generate { dir, module, out } => {
            cmd_generate(&dir, &options, &module, out.as_deref(), &mut stdout)?;
        }
        Commands::Check { dir } => {
            cmd_check(&dir, &options, &mut stdout)?;
        }
        Commands::List { dir, json } => {
            cmd_list(&dir, &options, json, &mut stdout)?;
        }
    }

    Ok(())
}

fn load(dir: &Path, options: &LoadOptions) -> Result<Registry> {
    load_dir(dir, options).with_context(|| format!("failed to load {}", dir.display()))
}

fn cmd_generate(
    dir: &Path,
    options: &LoadOptions,
    module: &str,
    out: Option<&Path>,
    stdout: &mut impl Write,
) -> Result<()> {
    let registry = load(dir, options)?;
    let generated = generate_constants(&registry, module)?;

    match out {
        Some(path) => {
            fs::write(path, &generated)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote constants");
        }
        None => stdout.write_all(generated.as_bytes())?,
    }
    Ok(())
}

fn cmd_check(dir: &Path, options: &LoadOptions, stdout: &mut impl Write) -> Result<()> {
    let registry = load(dir, options)?;
    let statements: usize = registry.iter().map(|c| c.len()).sum();
    writeln!(
        stdout,
        "ok: {} collections, {} statements",
        registry.len(),
        statements
    )?;
    Ok(())
}

fn cmd_list(dir: &Path, options: &LoadOptions, json: bool, stdout: &mut impl Write) -> Result<()> {
    let registry = load(dir, options)?;
    let mut metas = registry.collection_metas();
    metas.sort_by(|a, b| a.id.cmp(&b.id));

    if json {
        let mut entries = Vec::with_capacity(metas.len());
        for meta in metas {
            let statements = registry.statement_ids(&meta.id)?;
            let mut entry = serde_json::to_value(&meta)?;
            entry["statements"] = serde_json::json!(statements);
            entries.push(entry);
        }
        serde_json::to_writer_pretty(&mut *stdout, &entries)?;
        writeln!(stdout)?;
        return Ok(());
    }

    for meta in metas {
        if meta.name == meta.id {
            writeln!(stdout, "{}", meta.id)?;
        } else {
            writeln!(stdout, "{} ({})", meta.id, meta.name)?;
        }
        if !meta.description.is_empty() {
            writeln!(stdout, "  {}", meta.description)?;
        }
        for statement in registry.statement_ids(&meta.id)? {
            writeln!(stdout, "  - {statement}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    fn queries_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("users.sql"),
            "--META\n{\"name\": \"User Queries\"}\n--end\n--SQL:GetUserByID\nSELECT 1;\n--end\n--SQL:CreateUser\nINSERT INTO users DEFAULT VALUES;\n--end\n",
        )
        .unwrap();
        fs::write(dir.path().join("posts.sql"), "--SQL:GetPost\nSELECT 2;\n--end\n").unwrap();
        dir
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        run(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["sqlset-gen", "list", "q", "--json", "-v", "--config", "c.json"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("c.json")));
        assert!(matches!(cli.command, Commands::List { json: true, .. }));
    }

    #[test]
    fn generate_writes_to_file_or_stdout() {
        let dir = queries_dir();
        let options = LoadOptions::default();

        let printed = output(|w| cmd_generate(dir.path(), &options, "sql", None, w));
        assert!(printed.contains("pub mod sql {"));
        assert!(printed.contains("pub const GET_USER_BY_ID: &str = \"users.GetUserByID\";"));

        let out_dir = tempdir().unwrap();
        let out = out_dir.path().join("queries.rs");
        let printed = output(|w| cmd_generate(dir.path(), &options, "sql", Some(out.as_path()), w));
        assert!(printed.is_empty());
        assert_eq!(fs::read_to_string(&out).unwrap(), {
            let registry = load_dir(dir.path(), &options).unwrap();
            generate_constants(&registry, "sql").unwrap()
        });
    }

    #[test]
    fn check_reports_counts_and_failures() {
        let dir = queries_dir();
        let printed = output(|w| cmd_check(dir.path(), &LoadOptions::default(), w));
        assert_eq!(printed, "ok: 2 collections, 3 statements\n");

        fs::write(dir.path().join("broken.sql"), "--SQL:Open\nSELECT 1;\n").unwrap();
        let mut sink = Vec::new();
        let err = cmd_check(dir.path(), &LoadOptions::default(), &mut sink).unwrap_err();
        let rendered = format!("{err:#}");
        assert!(rendered.contains("broken.sql"), "{rendered}");
    }

    #[test]
    fn list_prints_text_and_json() {
        let dir = queries_dir();
        let options = LoadOptions::default();

        let text = output(|w| cmd_list(dir.path(), &options, false, w));
        assert_eq!(
            text,
            "posts\n  - GetPost\nusers (User Queries)\n  - CreateUser\n  - GetUserByID\n"
        );

        let json = output(|w| cmd_list(dir.path(), &options, true, w));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["id"], "users");
        assert_eq!(value[1]["name"], "User Queries");
        assert_eq!(value[1]["statements"][0], "CreateUser");
        assert!(value[0].get("description").is_none());
    }
}
