use std::path::PathBuf;

mod controller;
mod ui;

use clap::Parser;
use eframe::egui;
use storage::config::{self, AppPaths, CliOverrides, DEFAULT_CONFIG_PATH};
use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PostStore};
use tracing_subscriber::EnvFilter;

use crate::controller::orchestration::NotesController;
use crate::ui::{NotesApp, PersistedViewSettings};

#[derive(Parser, Debug)]
#[command(name = "post-notes", about = "Write, edit and browse short posts kept on this machine")]
struct Args {
    /// Directory holding the local key-value store.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Key the post snapshot is stored under.
    #[arg(long)]
    storage_key: Option<String>,
    /// Initial sort selector: `author`, anything else sorts newest first.
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Falls back to an in-memory store so the window still opens; the returned message explains
/// that nothing will be saved.
fn open_backend(paths: &AppPaths) -> (Box<dyn KeyValueStore>, String, Option<String>) {
    match FileKeyValueStore::open(&paths.kv_dir) {
        Ok(store) => {
            tracing::info!(path = %paths.kv_dir.display(), "opened local key-value store");
            let label = format!("Saved in {}", paths.kv_dir.display());
            (Box::new(store), label, None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "local key-value store unavailable; using memory");
            let warning = format!(
                "Local storage is unavailable ({err}). Posts will not be kept after closing."
            );
            (
                Box::new(MemoryKeyValueStore::new()),
                "Not saved (memory only)".to_string(),
                Some(warning),
            )
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let overrides = CliOverrides {
        data_dir: args.data_dir,
        storage_key: args.storage_key,
        sort: args.sort,
    };
    let startup = config::load_startup_config(&args.config, &overrides)?;
    let paths = AppPaths::from_startup(&startup)?;
    tracing::debug!(data_root = %paths.data_root.display(), "resolved app paths");

    let (backend, storage_label, startup_warning) = open_backend(&paths);
    let store = PostStore::load(backend, startup.storage_key.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Post Notes")
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Post Notes",
        options,
        Box::new(move |cc| {
            let remembered = cc.storage.and_then(PersistedViewSettings::from_storage);
            let sort = match (&overrides.sort, &remembered) {
                (Some(_), _) | (None, None) => startup.default_sort,
                (None, Some(settings)) => settings.sort_key(),
            };
            let theme = remembered.map(|settings| settings.theme).unwrap_or_default();
            Ok(Box::new(NotesApp::new(
                NotesController::new(store, sort),
                theme,
                storage_label,
                startup_warning,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("notes window failed: {err}"))
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod view_model_tests;
