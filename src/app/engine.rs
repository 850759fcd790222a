//! Central browsing engine for faro.
//!
//! [BrowserEngine] is the state machine driven by discrete [Command]s from
//! the input layer and read by the rendering layer every tick. It owns the
//! directory cache, the tab set, the process-wide clipboard and the status
//! message, and delegates filesystem mutation to the [FileOps], [Opener]
//! and [Confirmer] capabilities.
//!
//! All engine methods run on the foreground thread; the only background
//! work is the active session's search walk (see [crate::core::search]).

use crate::app::session::{Session, SessionManager};
use crate::config::Config;
use crate::core::cache::DirectoryCache;
use crate::core::fileops::{Confirmer, FileOps, Opener, Progress, StdFileOps, SystemOpener};

use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Discrete input commands accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    NavigateInto,
    NavigateUp,
    Back,
    Forward,
    ToggleSelection,
    Copy,
    Cut,
    Paste,
    Delete,
    ToggleHidden,
    CycleSort,
    Refresh,
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    CancelSearch,
    NextTab,
    PrevTab,
    CloseTab,
    Quit,
}

/// Outcome of one handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Quit,
}

/// Pending clipboard operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
}

/// Process-wide clipboard: set by copy/cut, consumed by paste. Survives
/// tab switches and navigation.
#[derive(Default)]
pub struct Clipboard {
    files: Vec<PathBuf>,
    op: Option<ClipboardOp>,
}

impl Clipboard {
    #[inline]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[inline]
    pub fn op(&self) -> Option<ClipboardOp> {
        self.op
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn set(&mut self, files: Vec<PathBuf>, op: ClipboardOp) {
        self.files = files;
        self.op = Some(op);
    }

    fn clear(&mut self) {
        self.files.clear();
        self.op = None;
    }
}

struct StatusMessage {
    text: String,
    expires: Instant,
}

/// The stateful browsing engine.
pub struct BrowserEngine<'a> {
    config: &'a Config,
    cache: DirectoryCache,
    tabs: SessionManager,
    clipboard: Clipboard,
    status: Option<StatusMessage>,
    file_ops: Box<dyn FileOps>,
    opener: Box<dyn Opener>,
}

impl<'a> BrowserEngine<'a> {
    pub fn new(config: &'a Config) -> io::Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::from_dir(config, current_dir)
    }

    pub fn from_dir(config: &'a Config, initial_path: PathBuf) -> io::Result<Self> {
        Self::with_collaborators(config, initial_path, Box::new(StdFileOps), Box::new(SystemOpener))
    }

    /// Constructor with injected capabilities, used by tests to script
    /// filesystem mutation and file opening.
    pub fn with_collaborators(
        config: &'a Config,
        initial_path: PathBuf,
        file_ops: Box<dyn FileOps>,
        opener: Box<dyn Opener>,
    ) -> io::Result<Self> {
        let initial_path = if initial_path.is_dir() {
            initial_path
        } else {
            std::env::current_dir()?
        };

        let session = Session::new(
            initial_path,
            config.sort_mode,
            config.show_hidden,
            config.search_batch_size,
        );
        let mut engine = Self {
            config,
            cache: DirectoryCache::new(config.cache_capacity),
            tabs: SessionManager::new(session),
            clipboard: Clipboard::default(),
            status: None,
            file_ops,
            opener,
        };
        engine.refresh();
        Ok(engine)
    }

    // Accessors used by the rendering layer

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn session(&self) -> &Session {
        self.tabs.active()
    }

    #[inline]
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    #[inline]
    pub fn active_tab_idx(&self) -> usize {
        self.tabs.active_idx()
    }

    #[inline]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|m| m.text.as_str())
    }

    /// True while the active session is in search mode; the input layer
    /// switches keymaps on this.
    pub fn is_searching(&self) -> bool {
        self.session().search().is_active()
    }

    /// Per-tick upkeep: expires the status message and drains search
    /// progress. Returns true when visible state changed.
    ///
    /// Every session is drained, not just the active one, so a walk
    /// started in a background tab keeps its channel empty and its
    /// completion notice is not deferred until the tab is revisited.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if let Some(msg) = &self.status
            && Instant::now() >= msg.expires
        {
            self.status = None;
            changed = true;
        }

        let active = self.tabs.active_idx();
        let mut completed = false;
        for (idx, session) in self.tabs.iter_mut().enumerate() {
            let progress = session.search_mut().drain();
            if progress.changed && idx == active {
                session.clamp_selection();
                changed = true;
            }
            if progress.just_completed {
                completed = true;
            }
        }
        if completed {
            self.set_status("Search complete");
            changed = true;
        }
        changed
    }

    /// Central command dispatch.
    pub fn handle(
        &mut self,
        cmd: Command,
        confirm: &mut dyn Confirmer,
        progress: &mut dyn Progress,
    ) -> CommandResult {
        match cmd {
            Command::MoveUp => self.tabs.active_mut().move_up(),
            Command::MoveDown => self.tabs.active_mut().move_down(),
            Command::NavigateInto => self.navigate_into(),
            Command::NavigateUp => self.navigate_up(),
            Command::Back => self.history_back(),
            Command::Forward => self.history_forward(),
            Command::ToggleSelection => self.tabs.active_mut().toggle_selected(),
            Command::Copy => self.clip_selection(ClipboardOp::Copy),
            Command::Cut => self.clip_selection(ClipboardOp::Cut),
            Command::Paste => self.paste(confirm, progress),
            Command::Delete => self.delete(confirm, progress),
            Command::ToggleHidden => self.toggle_hidden(),
            Command::CycleSort => self.cycle_sort(),
            Command::Refresh => self.hard_refresh(),
            Command::StartSearch => self.start_search(),
            Command::SearchChar(c) => self.search_edit(|q| q.push(c)),
            Command::SearchBackspace => self.search_edit(|q| {
                q.pop();
            }),
            Command::CancelSearch => self.cancel_search(),
            Command::NextTab => {
                self.tabs.next_tab(self.config.search_batch_size);
                self.refresh();
            }
            Command::PrevTab => {
                if self.tabs.prev_tab() {
                    self.refresh();
                }
            }
            Command::CloseTab => {
                if self.tabs.close_active() {
                    self.set_status("Tab closed");
                    self.refresh();
                }
            }
            Command::Quit => return CommandResult::Quit,
        }
        CommandResult::Continue
    }

    // Navigation

    pub fn navigate_to(&mut self, path: PathBuf) {
        if !path.is_dir() {
            self.set_status(format!("Not found: {}", path.display()));
            return;
        }
        let session = self.tabs.active_mut();
        session.history_mut().push(path.clone());
        session.set_path(path);
        self.refresh();
    }

    fn navigate_up(&mut self) {
        let Some(parent) = self.session().current_path().parent().map(|p| p.to_path_buf())
        else {
            return;
        };
        self.navigate_to(parent);
    }

    fn navigate_into(&mut self) {
        if self.is_searching() {
            self.open_search_result();
            return;
        }

        let target = {
            let session = self.session();
            let Some(listing) = session.listing() else {
                return;
            };
            let Some(entry) = listing.entries().get(session.selected_idx()) else {
                return;
            };
            (session.current_path().join(entry.name()), entry.is_dir())
        };

        let (path, is_dir) = target;
        if is_dir {
            self.navigate_to(path);
        } else {
            self.open_file(path);
        }
    }

    fn open_file(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.opener.open(&path) {
            Ok(()) => self.set_status(format!("Opened {name}")),
            Err(e) => self.set_status(format!("Error opening {name}: {e}")),
        }
    }

    fn history_back(&mut self) {
        if let Some(path) = self.tabs.active_mut().history_mut().back() {
            self.tabs.active_mut().set_path(path);
            self.refresh();
        }
    }

    fn history_forward(&mut self) {
        if let Some(path) = self.tabs.active_mut().history_mut().forward() {
            self.tabs.active_mut().set_path(path);
            self.refresh();
        }
    }

    // Listing refresh

    /// Reloads the active session's listing through the cache. On failure
    /// the prior listing stays displayed and a status message is shown.
    pub fn refresh(&mut self) {
        let (path, show_hidden, sort) = {
            let session = self.session();
            (
                session.current_path().to_path_buf(),
                session.show_hidden(),
                session.sort_mode(),
            )
        };
        match self.cache.get(&path, show_hidden, sort) {
            Ok(record) => self.tabs.active_mut().set_listing(record),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn hard_refresh(&mut self) {
        let path = self.session().current_path().to_path_buf();
        self.cache.invalidate(&path);
        self.refresh();
    }

    fn toggle_hidden(&mut self) {
        let session = self.tabs.active_mut();
        let show = !session.show_hidden();
        session.set_show_hidden(show);
        // The cache keys records on display preferences, so a plain
        // refresh rescans with the new flag.
        self.refresh();
    }

    fn cycle_sort(&mut self) {
        let session = self.tabs.active_mut();
        let mode = session.sort_mode().next();
        session.set_sort_mode(mode);
        self.refresh();
        self.set_status(format!("Sort: {}", mode.label()));
    }

    // Search

    fn start_search(&mut self) {
        // One live worker process-wide: stop any walk another tab started.
        let active = self.tabs.active_idx();
        for (idx, session) in self.tabs.iter_mut().enumerate() {
            if idx != active {
                session.search_mut().cancel();
            }
        }

        let base = self.session().current_path().to_path_buf();
        let session = self.tabs.active_mut();
        session.reset_selection();
        session.search_mut().start(base);
    }

    fn search_edit(&mut self, edit: impl FnOnce(&mut String)) {
        let session = self.tabs.active_mut();
        if !session.search().is_active() {
            return;
        }
        let mut query = session.search().query().to_string();
        edit(&mut query);
        session.search_mut().set_query(query);
        session.clamp_selection();
    }

    fn cancel_search(&mut self) {
        let session = self.tabs.active_mut();
        session.search_mut().reset();
        session.reset_selection();
        self.refresh();
    }

    fn open_search_result(&mut self) {
        let target = {
            let session = self.session();
            let search = session.search();
            search
                .filtered()
                .get(session.selected_idx())
                .map(|rel| search.base().join(rel))
        };
        let Some(path) = target else {
            return;
        };

        self.tabs.active_mut().search_mut().reset();
        if path.is_dir() {
            self.navigate_to(path);
        } else {
            self.open_file(path);
            self.refresh();
        }
    }

    // Clipboard

    fn clip_selection(&mut self, op: ClipboardOp) {
        let targets = self.session().action_targets();
        if targets.is_empty() {
            return;
        }
        let verb = match op {
            ClipboardOp::Copy => "Copied",
            ClipboardOp::Cut => "Cut",
        };
        self.set_status(format!("{verb} {} items", targets.len()));
        self.clipboard.set(targets, op);
        self.tabs.active_mut().clear_selected_files();
    }

    /// Pastes the clipboard into the current directory, one item at a
    /// time. Existing destinations require per-item overwrite approval;
    /// a declined or failed item never aborts the rest. A cut clipboard
    /// retains whatever did not land; a copy clipboard persists for
    /// repeated pasting. Progress is reported after every item and
    /// failures end up in the status summary.
    fn paste(&mut self, confirm: &mut dyn Confirmer, progress: &mut dyn Progress) {
        let Some(op) = self.clipboard.op else {
            return;
        };
        if self.clipboard.files.is_empty() {
            return;
        }

        let dest_dir = self.session().current_path().to_path_buf();
        let sources = self.clipboard.files.clone();
        let total = sources.len();

        let mut pasted = 0usize;
        let mut skipped = 0usize;
        let mut remaining = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        for (done, src) in sources.into_iter().enumerate() {
            let Some(name) = src.file_name().map(|n| n.to_os_string()) else {
                skipped += 1;
                progress.report(done + 1, total, &src.display().to_string());
                continue;
            };
            let label = name.to_string_lossy().into_owned();
            let dst = dest_dir.join(&name);

            if dst.exists() && !confirm.confirm(&format!("Overwrite {label}?")) {
                skipped += 1;
                if op == ClipboardOp::Cut {
                    remaining.push(src);
                }
                progress.report(done + 1, total, &label);
                continue;
            }

            let result = match op {
                ClipboardOp::Copy => self.file_ops.copy(&src, &dst),
                ClipboardOp::Cut => self.file_ops.rename(&src, &dst),
            };
            match result {
                Ok(()) => pasted += 1,
                Err(e) => {
                    failures.push(format!("{label}: {e}"));
                    skipped += 1;
                    if op == ClipboardOp::Cut {
                        remaining.push(src);
                    }
                }
            }
            progress.report(done + 1, total, &label);
        }

        let mut msg = format!("Pasted {pasted} items");
        if skipped > 0 {
            msg.push_str(&format!(", skipped {skipped}"));
        }
        if !failures.is_empty() {
            msg.push_str(&format!(" ({})", failures.join("; ")));
        }
        self.set_status(msg);

        if op == ClipboardOp::Cut {
            if remaining.is_empty() {
                self.clipboard.clear();
            } else {
                self.clipboard.files = remaining;
            }
        }
        self.hard_refresh();
    }

    /// Deletes the action targets after one confirmation for the whole
    /// batch. Per-item failures are skipped and end up in the status
    /// summary; progress is reported after every item.
    fn delete(&mut self, confirm: &mut dyn Confirmer, progress: &mut dyn Progress) {
        let targets = self.session().action_targets();
        if targets.is_empty() {
            return;
        }
        if !confirm.confirm(&format!("Delete {} items?", targets.len())) {
            return;
        }

        let total = targets.len();
        let mut deleted = 0usize;
        let mut failures: Vec<String> = Vec::new();

        for (done, path) in targets.iter().enumerate() {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match self.file_ops.remove(path) {
                Ok(()) => deleted += 1,
                Err(e) => failures.push(format!("{label}: {e}")),
            }
            progress.report(done + 1, total, &label);
        }

        let mut msg = format!("Deleted {deleted} items");
        if deleted < total {
            msg.push_str(&format!(", failed {}", total - deleted));
        }
        if !failures.is_empty() {
            msg.push_str(&format!(" ({})", failures.join("; ")));
        }
        self.set_status(msg);
        self.tabs.active_mut().clear_selected_files();
        self.hard_refresh();
    }

    // Status messages

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires: Instant::now() + self.config.message_timeout(),
        });
    }
}
