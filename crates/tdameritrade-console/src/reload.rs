/*
[INPUT]:  Config file path, options monitor, poll interval, shutdown token
[OUTPUT]: Fresh options snapshots published when the file changes
[POS]:    Configuration layer - live reload of credentials
[UPDATE]: When changing change detection or reload validation
*/

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tdameritrade_adapter::OptionsMonitor;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;

/// Re-read the file and publish its options. Invalid files leave the
/// current snapshot in place.
pub fn reload_once(path: &Path, monitor: &OptionsMonitor) -> bool {
    match ConsoleConfig::from_file(path) {
        Ok(config) => {
            let changed = monitor.update(config.options);
            if changed {
                info!(path = %path.display(), "options reloaded");
            }
            changed
        }
        Err(err) => {
            warn!(path = %path.display(), error = %format!("{err:#}"), "ignoring invalid config reload");
            false
        }
    }
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .ok()
}

/// Poll the file's modification time and reload on change until `shutdown`
pub fn spawn_options_reload(
    path: PathBuf,
    monitor: OptionsMonitor,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_modified = modified_at(&path).await;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("options reload stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }

            let modified = modified_at(&path).await;
            if modified == last_modified {
                continue;
            }
            last_modified = modified;
            reload_once(&path, &monitor);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tdameritrade_adapter::TdAmeritradeOptions;

    fn temp_config(name: &str, token: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tda-console-{}-{name}.yaml", std::process::id()));
        write_config(&path, token);
        path
    }

    fn write_config(path: &Path, token: &str) {
        fs::write(path, format!("td_ameritrade:\n  access_token: \"{token}\"\n")).unwrap();
    }

    #[test]
    fn test_reload_once_publishes_new_token() {
        let path = temp_config("reload", "first");
        let monitor = OptionsMonitor::new(TdAmeritradeOptions::with_token("first"));

        write_config(&path, "second");
        assert!(reload_once(&path, &monitor));
        assert_eq!(monitor.current().access_token, "second");

        assert!(!reload_once(&path, &monitor));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_invalid_reload_keeps_snapshot() {
        let path = temp_config("invalid", "first");
        let monitor = OptionsMonitor::new(TdAmeritradeOptions::with_token("first"));

        fs::write(&path, "td_ameritrade: [not, a, map]\n").unwrap();
        assert!(!reload_once(&path, &monitor));
        assert_eq!(monitor.current().access_token, "first");
        fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_reload_task_stops_on_shutdown() {
        let path = temp_config("shutdown", "first");
        let monitor = OptionsMonitor::new(TdAmeritradeOptions::with_token("first"));
        let shutdown = CancellationToken::new();

        let handle = spawn_options_reload(
            path.clone(),
            monitor,
            Duration::from_millis(10),
            shutdown.clone(),
        );
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("reload task did not stop")
            .unwrap();
        fs::remove_file(path).unwrap();
    }
}
