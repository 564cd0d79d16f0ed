use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{PostDraft, PostId, SortKey};
use storage::config::{load_startup_config, AppPaths, CliOverrides, DEFAULT_CONFIG_PATH};
use storage::{decode_snapshot, FileKeyValueStore, PostStore};
use tracing_subscriber::EnvFilter;

/// Locates the snapshot the same way the desktop app does: `notes.toml`, then `NOTES_*` /
/// `APP__*` variables, then these flags.
#[derive(Parser, Debug)]
#[command(name = "notes-tools", about = "Inspect and maintain a local post snapshot")]
struct Cli {
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    storage_key: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "date")]
        sort: String,
    },
    Add {
        title: String,
        author: String,
        body: String,
    },
    Edit {
        id: String,
        title: String,
        author: String,
        body: String,
    },
    /// Removes one post; needs `--yes`.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    Export,
    Import {
        file: PathBuf,
    },
    /// Removes every post; needs `--yes`.
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

fn open_store(cli: &Cli) -> Result<PostStore<FileKeyValueStore>> {
    let overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        storage_key: cli.storage_key.clone(),
        sort: None,
    };
    let startup = load_startup_config(&cli.config, &overrides)?;
    let paths = AppPaths::from_startup(&startup)?;
    let backend = FileKeyValueStore::open(&paths.kv_dir)
        .with_context(|| format!("failed to open key-value dir '{}'", paths.kv_dir.display()))?;
    Ok(PostStore::load(backend, startup.storage_key))
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let mut store = open_store(&cli)?;

    match cli.command {
        Command::List { author, sort } => {
            for post in store.list(&author, SortKey::from_selector(&sort)) {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    post.id,
                    post.timestamp.to_rfc3339(),
                    post.author,
                    post.title
                )?;
            }
        }
        Command::Add {
            title,
            author,
            body,
        } => {
            let post = store
                .try_create(PostDraft::new(title, author, body))
                .context("failed to save snapshot")?;
            writeln!(out, "created post_id={}", post.id)?;
        }
        Command::Edit {
            id,
            title,
            author,
            body,
        } => {
            let id = PostId(id);
            if store
                .try_update(&id, PostDraft::new(title, author, body))
                .context("failed to save snapshot")?
            {
                writeln!(out, "updated post_id={id}")?;
            } else {
                writeln!(out, "no post with id {id}; nothing changed")?;
            }
        }
        Command::Delete { id, yes } => {
            let id = PostId(id);
            if !yes {
                writeln!(out, "not deleting post_id={id}; pass --yes to confirm")?;
                return Ok(());
            }
            match store.try_delete(&id).context("failed to save snapshot")? {
                Some(_) => writeln!(out, "deleted post_id={id}")?,
                None => writeln!(out, "no post with id {id}; nothing changed")?,
            }
        }
        Command::Export => {
            writeln!(out, "{}", serde_json::to_string_pretty(store.posts())?)?;
        }
        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let posts = decode_snapshot(&raw)
                .with_context(|| format!("'{}' is not a post snapshot", file.display()))?;
            let count = store
                .try_replace_all(posts)
                .context("failed to save snapshot")?;
            writeln!(out, "imported {count} posts")?;
        }
        Command::Clear { yes } => {
            if !yes {
                writeln!(
                    out,
                    "not clearing {} posts; pass --yes to confirm",
                    store.len()
                )?;
                return Ok(());
            }
            store.try_clear().context("failed to save snapshot")?;
            writeln!(out, "cleared all posts")?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli, &mut std::io::stdout().lock())
}
