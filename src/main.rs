mod watcher;

use clap::{Parser, Subcommand};
use dropwatch_browser::BrowserSession;
use dropwatch_core::store::ConfigStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use watcher::Watcher;

#[derive(Parser)]
#[command(
    name = "dropwatch",
    version,
    about = "Watches Telegram Web channels for bonus drop codes and redeems them"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON config file.
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Write daily-rolling logs into this directory instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the watcher daemon.
    Start,
    /// Show configuration and claim statistics.
    Status,
    /// Turn automation on.
    Enable,
    /// Turn automation off.
    Disable,
    /// Select the redemption domain (must be in the domain list).
    SetDomain {
        /// Domain including scheme, e.g. https://stake.ceo
        domain: String,
    },
    /// Manage watched channels.
    Channel {
        #[command(subcommand)]
        action: ChannelAction,
    },
    /// Show the claim history.
    History {
        /// Show only the most recent N entries.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Delete all history entries.
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum ChannelAction {
    /// Watch a channel.
    Add { id: String },
    /// Stop watching a channel.
    Remove { id: String },
    /// List watched channels.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref());

    let store = ConfigStore::open(&cli.config)?;

    match cli.command {
        Commands::Start => start(store).await?,
        Commands::Status => status(&store).await,
        Commands::Enable => {
            store.update(|cfg| cfg.automation_enabled = true).await?;
            println!("Automation enabled.");
        }
        Commands::Disable => {
            store.update(|cfg| cfg.automation_enabled = false).await?;
            println!("Automation disabled.");
        }
        Commands::SetDomain { domain } => {
            store
                .update(|cfg| cfg.active_stake_domain = domain.clone())
                .await?;
            println!("Claims now go to {domain}");
        }
        Commands::Channel { action } => channel(&store, action).await?,
        Commands::History { limit, clear } => history(&store, limit, clear).await?,
    }

    Ok(())
}

async fn start(store: ConfigStore) -> anyhow::Result<()> {
    let store = Arc::new(store);
    let cfg = store.config().await;

    if cfg.channel_ids.is_empty() {
        warn!("no channels configured; add one with `dropwatch channel add <id>`");
    }

    let profile_dir = profile_dir_for(store.path());
    let session = Arc::new(BrowserSession::launch(&cfg, &profile_dir).await?);

    println!(
        "dropwatch — watching {} channel(s), claiming on {}",
        cfg.channel_ids.len(),
        if cfg.active_stake_domain.is_empty() {
            "(no domain)"
        } else {
            &cfg.active_stake_domain
        }
    );

    let watcher = Watcher::new(store, session.clone(), session).await;
    watcher.run().await
}

async fn status(store: &ConfigStore) {
    let cfg = store.config().await;
    println!("dropwatch — status\n");
    println!("Config: {}", store.path().display());
    println!(
        "Automation: {}",
        if cfg.automation_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("Active domain: {}", cfg.active_stake_domain);
    println!("Scan interval: {}s", cfg.scan_interval_secs);
    println!("Channels ({}):", cfg.channel_ids.len());
    for id in &cfg.channel_ids {
        println!("  {id}");
    }
    for (a, b) in cfg.ambiguous_channel_pairs() {
        println!("  warning: id '{a}' is a substring of '{b}' — tab classification is ambiguous");
    }
    println!("History entries: {}", cfg.history_log.len());
}

async fn channel(store: &ConfigStore, action: ChannelAction) -> anyhow::Result<()> {
    match action {
        ChannelAction::Add { id } => {
            let added = id.clone();
            let cfg = store
                .update(|cfg| {
                    if !cfg.channel_ids.contains(&added) {
                        cfg.channel_ids.push(added.clone());
                    }
                })
                .await?;
            for (a, b) in cfg.ambiguous_channel_pairs() {
                eprintln!("warning: channel id '{a}' is a substring of '{b}'");
            }
            println!("Watching {} channel(s).", cfg.channel_ids.len());
        }
        ChannelAction::Remove { id } => {
            let cfg = store
                .update(|cfg| cfg.channel_ids.retain(|c| c != &id))
                .await?;
            println!("Watching {} channel(s).", cfg.channel_ids.len());
        }
        ChannelAction::List => {
            let cfg = store.config().await;
            if cfg.channel_ids.is_empty() {
                println!("No channels configured.");
            }
            for id in &cfg.channel_ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}

async fn history(store: &ConfigStore, limit: Option<usize>, clear: bool) -> anyhow::Result<()> {
    if clear {
        store.update(|cfg| cfg.history_log.clear()).await?;
        println!("History cleared.");
        return Ok(());
    }

    let cfg = store.config().await;
    if cfg.history_log.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    // Newest first, like the original log view.
    let shown = limit.unwrap_or(cfg.history_log.len());
    for entry in cfg.history_log.iter().rev().take(shown) {
        println!(
            "[{}] {} | {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.code,
            entry.claim_url
        );
    }
    Ok(())
}

fn profile_dir_for(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) => parent.join("profile"),
        None => PathBuf::from("profile"),
    }
}

fn default_config_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".dropwatch").join("config.json"),
        None => PathBuf::from("config.json"),
    }
}

fn init_tracing(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dropwatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
