use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use fclite::app::{build_http_client, App, AppEvent};
use fclite::config::Config;
use fclite::feed::{FeedCache, FeedLoader};
use fclite::storage::{Database, DatabaseError};
use fclite::widget::{LoadMode, LoadOutcome, LoadReport, WidgetInstance};

/// Get the config directory path (~/.config/fclite/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("fclite"))
}

#[derive(Parser, Debug)]
#[command(name = "fclite", about = "Friend Circle Lite feed in the terminal")]
struct Args {
    /// Feed base URL (all.json is appended)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Articles per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Config file (default: ~/.config/fclite/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip the cache on the first load
    #[arg(long)]
    refresh: bool,

    /// Delete the cached feed and exit
    #[arg(long)]
    clear_cache: bool,

    /// Load once, print the first page and statistics, and exit
    #[arg(long)]
    dump: bool,
}

/// Log to a file; the TUI owns stdout.
fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            eprintln!("Warning: failed to restrict config directory permissions: {}", e);
        }
    }

    init_logging(&config_dir.join("fclite.log"))?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }

    let db_path = config_dir.join("cache.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(e @ DatabaseError::InstanceLocked) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to open cache database: {}", e)),
    };

    if args.clear_cache {
        let removed = FeedCache::new(db)
            .clear()
            .await
            .context("Failed to clear the feed cache")?;
        tracing::info!(removed, "Cache cleared from command line");
        println!("{}", if removed { "Cache cleared." } else { "Cache was empty." });
        return Ok(());
    }

    let initial_mode = if args.refresh {
        LoadMode::Network
    } else {
        LoadMode::CacheFirst
    };

    if args.dump {
        return dump(config, db, initial_mode).await;
    }

    let mut app = App::new(config, db).context("Failed to create application")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    fclite::ui::run(&mut app, initial_mode, event_tx, event_rx).await?;

    Ok(())
}

/// `--dump`: one load through a widget instance, printed as plain text.
async fn dump(config: Config, db: Database, mode: LoadMode) -> Result<()> {
    let timeout = config.request_timeout();
    let loader = FeedLoader::new(
        build_http_client()?,
        FeedCache::new(db),
        config.base_url.clone(),
        timeout,
    );

    let mut instance = WidgetInstance::acquire(config.widget_options(), 1);
    let (tx, mut rx) = mpsc::channel::<LoadReport>(1);
    instance.spawn_load(loader, mode, tx);
    let report = rx
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("Load task ended without a result"))?;

    match instance.apply_report(report) {
        LoadOutcome::Loaded { .. } => {}
        LoadOutcome::Failed(message) => anyhow::bail!(message),
        LoadOutcome::Stale => anyhow::bail!("Load result was discarded"),
    }

    print!("{}", instance.plain_text());
    Ok(())
}
