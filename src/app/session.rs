//! Tabbed session state for faro.
//!
//! A [Session] is one tab's complete browsing state; the [SessionManager]
//! owns the ordered set of sessions and the active index. Sessions are
//! value types, so switching tabs persists the outgoing state for free.

use crate::app::history::NavigationHistory;
use crate::core::cache::DirRecord;
use crate::core::fm::SortMode;
use crate::core::search::SearchState;

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One independent tab: path, selection, preferences, search and history.
pub struct Session {
    current_path: PathBuf,
    selected_idx: usize,
    selected_files: HashSet<OsString>,
    sort_mode: SortMode,
    show_hidden: bool,
    /// Last successfully refreshed listing; kept on permission errors so
    /// the prior listing stays displayed.
    listing: Option<Arc<DirRecord>>,
    search: SearchState,
    history: NavigationHistory,
}

impl Session {
    pub fn new(path: PathBuf, sort_mode: SortMode, show_hidden: bool, batch_size: usize) -> Self {
        Self {
            history: NavigationHistory::seeded(path.clone()),
            current_path: path,
            selected_idx: 0,
            selected_files: HashSet::new(),
            sort_mode,
            show_hidden,
            listing: None,
            search: SearchState::new(batch_size),
        }
    }

    /// New-tab constructor: copies ambient settings (sort mode, hidden
    /// flag), keeps the current path, starts with fresh history, empty
    /// selection and no running search.
    pub fn clone_ambient(&self, batch_size: usize) -> Self {
        Session::new(
            self.current_path.clone(),
            self.sort_mode,
            self.show_hidden,
            batch_size,
        )
    }

    // Accessors

    #[inline]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[inline]
    pub fn selected_idx(&self) -> usize {
        self.selected_idx
    }

    #[inline]
    pub fn selected_files(&self) -> &HashSet<OsString> {
        &self.selected_files
    }

    #[inline]
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn listing(&self) -> Option<&Arc<DirRecord>> {
        self.listing.as_ref()
    }

    #[inline]
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    #[inline]
    pub fn search_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    #[inline]
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    #[inline]
    pub fn history_mut(&mut self) -> &mut NavigationHistory {
        &mut self.history
    }

    /// Number of rows currently visible: search hits in search mode,
    /// listing entries otherwise.
    pub fn visible_len(&self) -> usize {
        if self.search.is_active() {
            self.search.filtered().len()
        } else {
            self.listing.as_ref().map_or(0, |l| l.len())
        }
    }

    // Mutators used by the engine

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.current_path = path;
        self.selected_idx = 0;
        self.selected_files.clear();
    }

    pub(crate) fn set_listing(&mut self, listing: Arc<DirRecord>) {
        self.listing = Some(listing);
        self.clamp_selection();
    }

    pub(crate) fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    pub(crate) fn set_show_hidden(&mut self, show: bool) {
        self.show_hidden = show;
    }

    pub(crate) fn move_up(&mut self) {
        self.selected_idx = self.selected_idx.saturating_sub(1);
    }

    pub(crate) fn move_down(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected_idx = (self.selected_idx + 1).min(len - 1);
        }
    }

    pub(crate) fn reset_selection(&mut self) {
        self.selected_idx = 0;
    }

    /// Keeps the cursor valid whenever the visible list shrinks.
    pub(crate) fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected_idx = self.selected_idx.min(len.saturating_sub(1));
    }

    /// Toggles multi-select on the entry under the cursor and advances,
    /// matching the usual select-and-move-on flow.
    pub(crate) fn toggle_selected(&mut self) {
        let Some(listing) = &self.listing else {
            return;
        };
        let Some(entry) = listing.entries().get(self.selected_idx) else {
            return;
        };
        let name = entry.name().to_os_string();
        if !self.selected_files.remove(&name) {
            self.selected_files.insert(name);
        }
        self.move_down();
    }

    pub(crate) fn clear_selected_files(&mut self) {
        self.selected_files.clear();
    }

    /// Absolute paths of the action targets: the multi-select set if any,
    /// otherwise the entry under the cursor.
    pub fn action_targets(&self) -> Vec<PathBuf> {
        if !self.selected_files.is_empty() {
            let mut targets: Vec<PathBuf> = self
                .selected_files
                .iter()
                .map(|name| self.current_path.join(name))
                .collect();
            targets.sort();
            return targets;
        }
        self.listing
            .as_ref()
            .and_then(|l| l.entries().get(self.selected_idx))
            .map(|e| self.current_path.join(e.name()))
            .into_iter()
            .collect()
    }
}

/// Owns the tabs. Exactly one session is active at a time, and the last
/// remaining session can never be closed.
pub struct SessionManager {
    sessions: Vec<Session>,
    active: usize,
}

impl SessionManager {
    pub fn new(initial: Session) -> Self {
        Self {
            sessions: vec![initial],
            active: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[inline]
    pub fn active_idx(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Session {
        &self.sessions[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Session {
        &mut self.sessions[self.active]
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Session> {
        self.sessions.iter_mut()
    }

    /// Activates the next tab, or creates one cloned from the active
    /// session's ambient settings when already at the end.
    /// Returns true if the active session changed.
    pub fn next_tab(&mut self, batch_size: usize) -> bool {
        if self.active + 1 < self.sessions.len() {
            self.active += 1;
        } else {
            let fresh = self.active().clone_ambient(batch_size);
            self.sessions.push(fresh);
            self.active = self.sessions.len() - 1;
        }
        true
    }

    /// Activates the previous tab if one exists.
    pub fn prev_tab(&mut self) -> bool {
        if self.active > 0 {
            self.active -= 1;
            true
        } else {
            false
        }
    }

    /// Closes the active tab. Rejected when it is the sole session.
    pub fn close_active(&mut self) -> bool {
        if self.sessions.len() <= 1 {
            return false;
        }
        let old = self.active;
        self.sessions.remove(old);
        self.active = old.min(self.sessions.len() - 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::search::DEFAULT_BATCH_SIZE;

    fn session(path: &str) -> Session {
        Session::new(
            PathBuf::from(path),
            SortMode::Name,
            false,
            DEFAULT_BATCH_SIZE,
        )
    }

    #[test]
    fn clone_ambient_copies_prefs_but_not_history() {
        let mut original = session("/srv");
        original.set_show_hidden(true);
        original.set_sort_mode(SortMode::Size);
        original.history_mut().push(PathBuf::from("/srv/data"));

        let fresh = original.clone_ambient(DEFAULT_BATCH_SIZE);
        assert_eq!(fresh.current_path(), Path::new("/srv"));
        assert!(fresh.show_hidden());
        assert_eq!(fresh.sort_mode(), SortMode::Size);
        assert_eq!(fresh.history().len(), 1, "history must start fresh");
        assert!(fresh.selected_files().is_empty());
    }

    #[test]
    fn next_tab_advances_then_creates() {
        let mut tabs = SessionManager::new(session("/a"));
        assert_eq!(tabs.len(), 1);

        tabs.next_tab(DEFAULT_BATCH_SIZE);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.active_idx(), 1);

        tabs.prev_tab();
        assert_eq!(tabs.active_idx(), 0);

        // A tab exists after the active one: activate, don't create.
        tabs.next_tab(DEFAULT_BATCH_SIZE);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.active_idx(), 1);
    }

    #[test]
    fn prev_tab_at_first_is_noop() {
        let mut tabs = SessionManager::new(session("/a"));
        assert!(!tabs.prev_tab());
        assert_eq!(tabs.active_idx(), 0);
    }

    #[test]
    fn close_active_rejects_sole_session() {
        let mut tabs = SessionManager::new(session("/a"));
        assert!(!tabs.close_active());
        assert_eq!(tabs.len(), 1);

        tabs.next_tab(DEFAULT_BATCH_SIZE);
        tabs.next_tab(DEFAULT_BATCH_SIZE);
        assert_eq!(tabs.len(), 3);

        tabs.prev_tab();
        assert_eq!(tabs.active_idx(), 1);
        assert!(tabs.close_active());
        // Middle tab removed: active index stays on the replacement.
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.active_idx(), 1);

        assert!(tabs.close_active());
        assert_eq!(tabs.active_idx(), 0);
        assert!(!tabs.close_active());
    }
}
