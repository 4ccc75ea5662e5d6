//! Re-render on save for `toolnest render --watch`.
//!
//! Editors often save by writing a temp file and renaming it over the
//! original, so the parent directory is watched and events are matched
//! against the source file by path or file name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Default quiet period before a burst of writes counts as one change.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches one Markdown source and reports debounced changes.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    dir: PathBuf,
    source: PathBuf,
    file_name: Option<OsString>,
    debounce: Duration,
    last_event: Option<Instant>,
}

impl std::fmt::Debug for SourceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWatcher")
            .field("source", &self.source)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl SourceWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the platform watcher cannot be created or the
    /// parent directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Event paths arrive canonical; compare against the canonical form.
        let source = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let file_name = source.file_name().map(ToOwned::to_owned);
        let dir = parent_dir(&source);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(source = %source.display(), dir = %dir.display(), "watching source");

        Ok(Self {
            _watcher: watcher,
            rx,
            dir,
            source,
            file_name,
            debounce,
            last_event: None,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Drain pending events; `true` once the source has been quiet for the
    /// debounce period after a change.
    pub fn poll_change(&mut self) -> bool {
        while let Ok(event) = self.rx.try_recv() {
            self.record(event);
        }
        self.settled()
    }

    /// Block until a debounced change is ready or `timeout` elapses.
    pub fn wait_for_change(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.poll_change() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let wait = self
                .last_event
                .map_or(deadline - now, |at| (at + self.debounce).saturating_duration_since(now))
                .min(deadline - now);
            match self.rx.recv_timeout(wait) {
                Ok(event) => self.record(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return self.settled(),
            }
        }
    }

    fn record(&mut self, event: notify::Result<Event>) {
        match event {
            Ok(ev) if self.affects_source(&ev) => {
                crate::perf::log_event("watcher.change", format!("{:?}", ev.kind));
                self.last_event = Some(Instant::now());
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%err, "file watcher error");
                crate::perf::log_event("watcher.error", err.to_string());
            }
        }
    }

    fn settled(&mut self) -> bool {
        match self.last_event {
            Some(at) if at.elapsed() >= self.debounce => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    fn affects_source(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event.paths.iter().any(|path| {
            path == &self.dir
                || path == &self.source
                || self
                    .file_name
                    .as_ref()
                    .is_some_and(|name| path.file_name() == Some(name.as_os_str()))
        })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
