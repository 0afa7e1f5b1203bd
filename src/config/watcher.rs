//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself. Editors that
//! save by writing a temp file and renaming it over the original replace the
//! inode, and a watch on the old inode goes silent after the first such save.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use crate::config::loader::load_config;
use crate::config::schema::ServiceConfig;

/// Watches the configuration file and publishes every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            update_tx,
        }, update_rx)
    }

    /// Start watching the file on notify's background thread.
    ///
    /// The returned watcher must be kept alive for updates to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let ConfigWatcher { path, update_tx } = self;
        let (dir, path) = resolve(&path)?;
        let mut reloader = Reloader {
            path: path.clone(),
            update_tx,
            last_sent: None,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| reloader.handle(res),
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), directory = %dir.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// Canonical parent directory and the config path inside it, so the path
/// compares equal to the ones notify reports.
fn resolve(path: &Path) -> Result<(PathBuf, PathBuf), notify::Error> {
    let file_name = path.file_name().ok_or_else(|| {
        notify::Error::io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not name a file", path.display()),
        ))
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = std::fs::canonicalize(parent).map_err(notify::Error::io)?;
    let path = dir.join(file_name);
    Ok((dir, path))
}

struct Reloader {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
    // Editors often emit several modify events per save.
    last_sent: Option<ServiceConfig>,
}

impl Reloader {
    fn handle(&mut self, res: notify::Result<Event>) {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = %e, "Config watch error");
                return;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return;
        }
        // Sibling files share the watched directory.
        if !event.paths.iter().any(|p| p == &self.path) {
            return;
        }

        match load_config(&self.path) {
            Ok(config) if self.last_sent.as_ref() == Some(&config) => {
                tracing::debug!(path = %self.path.display(), "Config file touched without changes");
            }
            Ok(config) => {
                tracing::info!(path = %self.path.display(), "Config file changed, reloading");
                self.last_sent = Some(config.clone());
                let _ = self.update_tx.send(config);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, EventKind, ModifyKind, RemoveKind};
    use tokio::time::{timeout, Instant};

    fn config_with_endpoint(endpoint: &str) -> String {
        format!("[endpoint]\npath = \"{endpoint}\"\n")
    }

    fn reloader(path: &Path) -> (Reloader, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let reloader = Reloader {
            path: path.to_path_buf(),
            update_tx,
            last_sent: None,
        };
        (reloader, update_rx)
    }

    fn modified(path: &Path) -> notify::Result<Event> {
        Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Any))).add_path(path.to_path_buf()))
    }

    #[test]
    fn test_unchanged_content_is_sent_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forwarder.toml");
        std::fs::write(&path, config_with_endpoint("/a")).unwrap();
        let (mut reloader, mut rx) = reloader(&path);

        reloader.handle(modified(&path));
        reloader.handle(modified(&path));
        assert_eq!(rx.try_recv().unwrap().endpoint.path, "/a");
        assert!(rx.try_recv().is_err());

        std::fs::write(&path, config_with_endpoint("/b")).unwrap();
        reloader.handle(modified(&path));
        assert_eq!(rx.try_recv().unwrap().endpoint.path, "/b");
    }

    #[test]
    fn test_ignores_sibling_files_and_removals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forwarder.toml");
        std::fs::write(&path, config_with_endpoint("/a")).unwrap();
        let (mut reloader, mut rx) = reloader(&path);

        let sibling = dir.path().join(".forwarder.toml.swp");
        reloader.handle(Ok(Event::new(EventKind::Create(CreateKind::File)).add_path(sibling)));
        reloader.handle(Ok(Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone())));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_invalid_config_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forwarder.toml");
        std::fs::write(&path, config_with_endpoint("no-leading-slash")).unwrap();
        let (mut reloader, mut rx) = reloader(&path);

        reloader.handle(modified(&path));
        reloader.handle(Err(notify::Error::generic("watch backend failed")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_relative_path_resolves_against_current_dir() {
        let (dir, path) = resolve(Path::new("forwarder.toml")).unwrap();
        assert_eq!(dir, std::fs::canonicalize(".").unwrap());
        assert_eq!(path, dir.join("forwarder.toml"));
    }

    #[tokio::test]
    async fn test_survives_rename_over_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forwarder.toml");
        std::fs::write(&path, config_with_endpoint("/a")).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();

        for endpoint in ["/b", "/c", "/d"] {
            let staged = dir.path().join("forwarder.toml.tmp");
            std::fs::write(&staged, config_with_endpoint(endpoint)).unwrap();
            std::fs::rename(&staged, &path).unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut latest = None;
        while latest.as_deref() != Some("/d") {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match timeout(remaining, rx.recv()).await {
                Ok(Some(config)) => latest = Some(config.endpoint.path),
                _ => break,
            }
        }
        assert_eq!(latest.as_deref(), Some("/d"));
    }
}
