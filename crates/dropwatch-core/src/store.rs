//! Wholesale-persisted configuration store.
//!
//! The entire [`Config`] object is read and written as one JSON document,
//! never field by field; last writer wins. Observers subscribe to a
//! revision counter that is bumped on every committed change, and a cheap
//! mtime probe lets a running daemon pick up edits made externally (e.g.
//! by the CLI against the same file).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::claim::HistoryEntry;
use crate::config::Config;
use crate::error::DropwatchError;

pub struct ConfigStore {
    path: PathBuf,
    state: RwLock<Config>,
    /// mtime of the file as of the last read or write we performed.
    disk_mtime: std::sync::Mutex<Option<SystemTime>>,
    revision: watch::Sender<u64>,
}

impl ConfigStore {
    /// Open the store at `path`, creating it with defaults on first run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DropwatchError> {
        let path = path.into();
        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&raw)?;
            config.validate()?;
            config
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            write_config(&path, &config)?;
            info!("created default config at {}", path.display());
            config
        };

        let (revision, _) = watch::channel(0u64);
        let store = Self {
            path,
            state: RwLock::new(config),
            disk_mtime: std::sync::Mutex::new(None),
            revision,
        };
        store.record_mtime();
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> Config {
        self.state.read().await.clone()
    }

    /// Observe config changes; the value is a revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Apply `mutate` to a copy of the config, validate it, then commit:
    /// write the whole object to disk, swap the in-memory copy, and notify
    /// subscribers. On validation failure nothing changes.
    pub async fn update<F>(&self, mutate: F) -> Result<Config, DropwatchError>
    where
        F: FnOnce(&mut Config),
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        mutate(&mut next);
        next.validate()?;
        write_config(&self.path, &next)?;
        *state = next.clone();
        drop(state);
        self.record_mtime();
        self.revision.send_modify(|rev| *rev += 1);
        Ok(next)
    }

    /// Append one claim record and persist.
    pub async fn append_history(&self, entry: HistoryEntry) -> Result<(), DropwatchError> {
        self.update(|cfg| cfg.history_log.push(entry)).await?;
        Ok(())
    }

    /// Reload from disk if the file changed behind our back. Returns true
    /// when a reload happened (subscribers are notified as usual).
    pub async fn refresh_from_disk(&self) -> Result<bool, DropwatchError> {
        let current = file_mtime(&self.path);
        if let Ok(seen) = self.disk_mtime.lock() {
            if current == *seen {
                return Ok(false);
            }
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        *self.state.write().await = config;
        self.record_mtime();
        self.revision.send_modify(|rev| *rev += 1);
        debug!("config reloaded from {}", self.path.display());
        Ok(true)
    }

    fn record_mtime(&self) {
        if let Ok(mut seen) = self.disk_mtime.lock() {
            *seen = file_mtime(&self.path);
        }
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn write_config(path: &Path, config: &Config) -> Result<(), DropwatchError> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> (PathBuf, ConfigStore) {
        let dir = std::env::temp_dir().join(format!("__dropwatch_store_{name}__"));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");
        let store = ConfigStore::open(&path).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn first_open_creates_defaults_on_disk() {
        let (dir, store) = temp_store("defaults");
        assert!(store.path().exists());
        let cfg = store.config().await;
        assert!(cfg.automation_enabled);

        // Reopening reads the same file back.
        let reopened = ConfigStore::open(store.path()).unwrap();
        let cfg2 = reopened.config().await;
        assert_eq!(cfg2.active_stake_domain, cfg.active_stake_domain);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn update_persists_and_notifies() {
        let (dir, store) = temp_store("update");
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store
            .update(|cfg| cfg.channel_ids.push("-100123".into()))
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("-100123"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_and_not_committed() {
        let (dir, store) = temp_store("invalid");
        let before = store.config().await;

        let result = store
            .update(|cfg| cfg.active_stake_domain = "https://not-listed.example".into())
            .await;
        assert!(result.is_err());

        let after = store.config().await;
        assert_eq!(after.active_stake_domain, before.active_stake_domain);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("not-listed.example"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn append_history_is_append_only() {
        let (dir, store) = temp_store("history");
        store
            .append_history(HistoryEntry::new("AAA", "https://stake.ceo/a"))
            .await
            .unwrap();
        store
            .append_history(HistoryEntry::new("BBB", "https://stake.ceo/b"))
            .await
            .unwrap();

        let cfg = store.config().await;
        assert_eq!(cfg.history_log.len(), 2);
        assert_eq!(cfg.history_log[0].code, "AAA");
        assert_eq!(cfg.history_log[1].code, "BBB");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn external_edits_are_picked_up_by_refresh() {
        let (dir, store) = temp_store("refresh");
        assert!(!store.refresh_from_disk().await.unwrap());

        // Simulate the CLI writing the file from another process.
        std::thread::sleep(std::time::Duration::from_millis(20));
        let mut external = store.config().await;
        external.automation_enabled = false;
        std::fs::write(
            store.path(),
            serde_json::to_string_pretty(&external).unwrap(),
        )
        .unwrap();

        let mut rx = store.subscribe();
        assert!(store.refresh_from_disk().await.unwrap());
        assert!(rx.has_changed().unwrap());
        assert!(!store.config().await.automation_enabled);

        // A second refresh with no further edits is a no-op.
        assert!(!store.refresh_from_disk().await.unwrap());
        let _ = std::fs::remove_dir_all(dir);
    }
}
