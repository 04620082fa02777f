//! Watcher thread: collects notify events for dataset files and hands each
//! path to the validation loop once it has been quiet for the debounce delay.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};

use crate::error::{KbError, Result};
use crate::load::FormatRegistry;

/// Dataset paths waiting for their editor to finish writing.
pub(crate) struct Debouncer {
    delay: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Queue `path`. A repeat event restarts its delay.
    pub(crate) fn record(&mut self, path: PathBuf, at: Instant) {
        self.pending.insert(path, at);
    }

    /// Remove and return, sorted, every path quiet for at least the delay.
    pub(crate) fn drain_ready(&mut self, now: Instant) -> Vec<PathBuf> {
        let delay = self.delay;
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, at)| now.saturating_duration_since(**at) >= delay)
            .map(|(p, _)| p.clone())
            .collect();
        ready.sort();
        for p in &ready {
            self.pending.remove(p);
        }
        ready
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Editor swap files, backups and directories never reach the debouncer.
pub(crate) fn is_dataset_path(path: &Path, registry: &FormatRegistry) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| registry.supports(&e.to_lowercase()))
        .unwrap_or(false)
}

/// Watch `root` and send debounced dataset paths over `tx`.
/// Returns when the receiver is dropped or the watcher fails.
pub fn run_watcher_thread(root: &Path, debounce_ms: u64, tx: mpsc::Sender<PathBuf>) -> Result<()> {
    let delay = Duration::from_millis(debounce_ms);
    let registry = FormatRegistry::new();

    let (event_tx, event_rx) = mpsc::channel::<Vec<PathBuf>>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(ev) = res {
            let _ = event_tx.send(ev.paths);
        }
    })
    .map_err(|e| KbError::Watch(e.to_string()))?;
    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| KbError::Watch(e.to_string()))?;

    let mut debouncer = Debouncer::new(delay);
    loop {
        match event_rx.recv_timeout(delay) {
            Ok(paths) => {
                let now = Instant::now();
                for path in paths {
                    if is_dataset_path(&path, &registry) {
                        debouncer.record(path, now);
                    } else {
                        log::trace!("watch: ignoring {}", path.display());
                    }
                }
                log::trace!("watch: {} paths pending", debouncer.len());
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        for path in debouncer.drain_ready(Instant::now()) {
            if tx.send(path).is_err() {
                return Ok(());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_path_is_held_until_quiet() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.record(PathBuf::from("/data/relations.json"), t0);

        assert!(debouncer.drain_ready(t0 + ms(499)).is_empty());
        assert_eq!(debouncer.len(), 1);
        assert_eq!(
            debouncer.drain_ready(t0 + ms(500)),
            vec![PathBuf::from("/data/relations.json")]
        );
        assert_eq!(debouncer.len(), 0);
    }

    #[test]
    fn test_repeat_event_restarts_delay() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        let path = PathBuf::from("/data/relations.yaml");
        debouncer.record(path.clone(), t0);
        debouncer.record(path.clone(), t0 + ms(400));

        assert!(debouncer.drain_ready(t0 + ms(600)).is_empty());
        assert_eq!(debouncer.drain_ready(t0 + ms(900)), vec![path]);
    }

    #[test]
    fn test_ready_paths_are_sorted_and_late_ones_wait() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(100));
        debouncer.record(PathBuf::from("/data/b.json"), t0);
        debouncer.record(PathBuf::from("/data/a.json"), t0);
        debouncer.record(PathBuf::from("/data/c.json"), t0 + ms(80));

        assert_eq!(
            debouncer.drain_ready(t0 + ms(120)),
            vec![PathBuf::from("/data/a.json"), PathBuf::from("/data/b.json")]
        );
        assert_eq!(debouncer.drain_ready(t0 + ms(180)), vec![PathBuf::from("/data/c.json")]);
    }

    #[test]
    fn test_only_dataset_paths_are_watched() {
        let registry = FormatRegistry::new();
        assert!(is_dataset_path(Path::new("/data/relations.json"), &registry));
        assert!(is_dataset_path(Path::new("/data/RELATIONS.YML"), &registry));
        assert!(!is_dataset_path(Path::new("/data/.relations.json.swp"), &registry));
        assert!(!is_dataset_path(Path::new("/data/relations.json~"), &registry));
        assert!(!is_dataset_path(Path::new("/data/4913"), &registry));
        assert!(!is_dataset_path(Path::new("/data/notes.md"), &registry));
    }
}
