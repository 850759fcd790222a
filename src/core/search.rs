//! Background recursive search for faro.
//!
//! Each search spawns one worker thread that walks the base directory
//! depth-first and ships relative paths back in fixed-size batches over a
//! crossbeam channel. The foreground drains the channel on every tick and
//! recomputes the filtered view; it never blocks on the worker.
//!
//! Cancellation is cooperative: the worker re-reads an atomic flag at
//! every directory boundary and after every batch flush. Starting a new
//! search allocates a fresh channel and a fresh flag, so a superseded
//! worker's late sends land on a disconnected channel and are discarded.

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Results are flushed in chunks of this size unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Pause after each flushed batch so the walk cannot starve the foreground.
const YIELD_AFTER_FLUSH: Duration = Duration::from_millis(10);

enum SearchUpdate {
    Batch(Vec<String>),
    Done,
}

/// Lifecycle of one search. `Cancelled` and `Completed` are both normal
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Running,
    Completed,
    Cancelled,
}

struct SearchHandle {
    rx: Receiver<SearchUpdate>,
    cancel: Arc<AtomicBool>,
}

/// What a foreground drain observed this tick.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress {
    pub changed: bool,
    /// True exactly once per search, on the tick that saw the walk finish.
    pub just_completed: bool,
}

/// Foreground-owned state of the search pipeline.
///
/// `results` is append-only in walk order; `filtered` is a pure projection
/// of `results` and `query`, recomputed whenever either changes.
pub struct SearchState {
    base: PathBuf,
    query: String,
    phase: SearchPhase,
    results: Vec<String>,
    filtered: Vec<String>,
    handle: Option<SearchHandle>,
    notified: bool,
    batch_size: usize,
}

impl SearchState {
    pub fn new(batch_size: usize) -> Self {
        Self {
            base: PathBuf::new(),
            query: String::new(),
            phase: SearchPhase::Idle,
            results: Vec::new(),
            filtered: Vec::new(),
            handle: None,
            notified: false,
            batch_size: batch_size.max(1),
        }
    }

    // Accessors

    #[inline]
    pub fn base(&self) -> &Path {
        &self.base
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, SearchPhase::Idle)
    }

    #[inline]
    pub fn results(&self) -> &[String] {
        &self.results
    }

    #[inline]
    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    /// Starts a new walk from `base`, superseding any in-flight one.
    ///
    /// The buffer, query and completion notification are reset; the old
    /// worker (if any) is flagged to stop and its channel is dropped so
    /// none of its in-flight appends can reach the new buffer.
    pub fn start(&mut self, base: PathBuf) {
        self.signal_cancel();

        let (tx, rx) = unbounded::<SearchUpdate>();
        let cancel = Arc::new(AtomicBool::new(false));

        self.base = base.clone();
        self.query.clear();
        self.results.clear();
        self.filtered.clear();
        self.notified = false;
        self.phase = SearchPhase::Running;
        self.handle = Some(SearchHandle {
            rx,
            cancel: Arc::clone(&cancel),
        });

        let batch_size = self.batch_size;
        thread::spawn(move || {
            let mut batch = Vec::with_capacity(batch_size);
            if walk(&base, &base, &mut batch, batch_size, &cancel, &tx)
                && !batch.is_empty()
            {
                let _ = tx.send(SearchUpdate::Batch(batch));
            }
            if !cancel.load(Ordering::Acquire) {
                let _ = tx.send(SearchUpdate::Done);
            }
        });
    }

    /// Cooperatively stops the running walk. The buffer as last drained is
    /// retained; there is no rollback.
    pub fn cancel(&mut self) {
        self.signal_cancel();
        if self.phase == SearchPhase::Running {
            self.phase = SearchPhase::Cancelled;
        }
    }

    /// Leaves search mode entirely, dropping buffered results.
    pub fn reset(&mut self) {
        self.signal_cancel();
        self.phase = SearchPhase::Idle;
        self.query.clear();
        self.results.clear();
        self.filtered.clear();
        self.notified = false;
    }

    /// Recomputes the filtered view synchronously from the results
    /// collected so far. Never touches the worker.
    pub fn set_query(&mut self, query: String) {
        if self.query == query {
            return;
        }
        self.query = query;
        self.recompute_filtered();
    }

    /// Drains whatever the worker appended since the last poll.
    ///
    /// Reports completion exactly once; subsequent drains are no-ops.
    pub fn drain(&mut self) -> SearchProgress {
        let mut progress = SearchProgress {
            changed: false,
            just_completed: false,
        };
        let Some(handle) = &self.handle else {
            return progress;
        };

        let mut finished = false;
        while let Ok(update) = handle.rx.try_recv() {
            match update {
                SearchUpdate::Batch(paths) => {
                    self.results.extend(paths);
                    progress.changed = true;
                }
                SearchUpdate::Done => {
                    finished = true;
                    progress.changed = true;
                }
            }
        }

        if progress.changed {
            self.recompute_filtered();
        }
        if finished {
            self.handle = None;
            if self.phase == SearchPhase::Running {
                self.phase = SearchPhase::Completed;
            }
            if !self.notified {
                self.notified = true;
                progress.just_completed = true;
            }
        }
        progress
    }

    fn signal_cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel.store(true, Ordering::Release);
        }
    }

    fn recompute_filtered(&mut self) {
        if self.query.is_empty() {
            self.filtered = self.results.clone();
            return;
        }
        let needle = self.query.to_lowercase();
        self.filtered = self
            .results
            .iter()
            .filter(|p| p.to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }
}

/// Depth-first walk, entries sorted by name per directory so result order
/// is deterministic. Returns false once cancelled; unreadable directories
/// are skipped.
fn walk(
    base: &Path,
    dir: &Path,
    batch: &mut Vec<String>,
    batch_size: usize,
    cancel: &Arc<AtomicBool>,
    tx: &Sender<SearchUpdate>,
) -> bool {
    if cancel.load(Ordering::Acquire) {
        return false;
    }

    let Ok(read) = fs::read_dir(dir) else {
        return true;
    };
    let mut items: Vec<_> = read.flatten().collect();
    items.sort_by_key(|e| e.file_name());

    let mut subdirs = Vec::new();
    for item in items {
        let path = item.path();
        let rel = path.strip_prefix(base).unwrap_or(&path);
        batch.push(normalize_relative(rel));

        if batch.len() >= batch_size {
            if tx
                .send(SearchUpdate::Batch(std::mem::take(batch)))
                .is_err()
            {
                return false;
            }
            thread::sleep(YIELD_AFTER_FLUSH);
            if cancel.load(Ordering::Acquire) {
                return false;
            }
        }

        if item.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            subdirs.push(path);
        }
    }

    for sub in subdirs {
        if !walk(base, &sub, batch, batch_size, cancel, tx) {
            return false;
        }
    }
    true
}

/// Relative paths use forward slashes on every platform.
fn normalize_relative(path: &Path) -> String {
    let rel = path.to_string_lossy().into_owned();
    #[cfg(windows)]
    {
        rel.replace('\\', "/")
    }
    #[cfg(not(windows))]
    {
        rel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::tempdir;

    fn drain_until_complete(state: &mut SearchState) -> Result<(), String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if state.drain().just_completed {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err("search did not complete in time".into())
    }

    #[test]
    fn walk_collects_all_entries_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("sub"))?;
        std::fs::File::create(dir.path().join("a.txt"))?;
        std::fs::File::create(dir.path().join("sub").join("b.txt"))?;

        let mut state = SearchState::new(DEFAULT_BATCH_SIZE);
        state.start(dir.path().to_path_buf());
        drain_until_complete(&mut state)?;

        assert_eq!(state.phase(), SearchPhase::Completed);
        assert_eq!(state.results(), &["a.txt", "sub", "sub/b.txt"]);
        // Empty query projects the whole buffer.
        assert_eq!(state.filtered(), state.results());
        Ok(())
    }

    #[test]
    fn set_query_is_a_pure_projection() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        std::fs::File::create(dir.path().join("report.log"))?;
        std::fs::File::create(dir.path().join("readme.md"))?;

        let mut state = SearchState::new(DEFAULT_BATCH_SIZE);
        state.start(dir.path().to_path_buf());
        drain_until_complete(&mut state)?;

        state.set_query("LOG".to_string());
        assert_eq!(state.filtered(), &["report.log"]);
        state.set_query(String::new());
        assert_eq!(state.filtered().len(), 2);
        Ok(())
    }

    #[test]
    fn completion_is_reported_exactly_once() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        std::fs::File::create(dir.path().join("x"))?;

        let mut state = SearchState::new(DEFAULT_BATCH_SIZE);
        state.start(dir.path().to_path_buf());
        drain_until_complete(&mut state)?;

        assert!(!state.drain().just_completed, "completion fired twice");
        Ok(())
    }
}
