//! Back/forward navigation history, one per session.
//!
//! Classic browser semantics: pushing truncates everything after the
//! cursor, and the entry at the cursor is always the session's current
//! path.

use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct NavigationHistory {
    visited: Vec<PathBuf>,
    cursor: usize,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with the session's starting path.
    pub fn seeded(path: PathBuf) -> Self {
        Self {
            visited: vec![path],
            cursor: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn current(&self) -> Option<&Path> {
        self.visited.get(self.cursor).map(|p| p.as_path())
    }

    pub fn can_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_forward(&self) -> bool {
        self.cursor + 1 < self.visited.len()
    }

    /// Appends `path`, discarding any forward entries past the cursor.
    /// Pushing the path already at the cursor is a no-op.
    pub fn push(&mut self, path: PathBuf) {
        if self.current() == Some(path.as_path()) {
            return;
        }
        if !self.visited.is_empty() {
            self.visited.truncate(self.cursor + 1);
        }
        self.visited.push(path);
        self.cursor = self.visited.len() - 1;
    }

    /// Steps back and returns the new current path, or None at the start.
    pub fn back(&mut self) -> Option<PathBuf> {
        if self.cursor > 0 {
            self.cursor -= 1;
            Some(self.visited[self.cursor].clone())
        } else {
            None
        }
    }

    /// Steps forward and returns the new current path, or None at the end.
    pub fn forward(&mut self) -> Option<PathBuf> {
        if self.cursor + 1 < self.visited.len() {
            self.cursor += 1;
            Some(self.visited[self.cursor].clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn push_after_back_truncates_forward_entries() {
        let mut history = NavigationHistory::seeded(p("/a"));
        history.push(p("/a/b"));
        history.push(p("/a/b/c"));

        assert_eq!(history.back(), Some(p("/a/b")));
        history.push(p("/a/b/d"));

        assert_eq!(history.len(), 3);
        assert!(!history.can_forward(), "forward branch should be gone");
        assert_eq!(history.back(), Some(p("/a/b")));
        assert_eq!(history.forward(), Some(p("/a/b/d")));
    }

    #[test]
    fn push_current_path_is_noop() {
        let mut history = NavigationHistory::seeded(p("/a"));
        history.push(p("/a"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn back_and_forward_clamp_at_edges() {
        let mut history = NavigationHistory::seeded(p("/a"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);

        history.push(p("/b"));
        assert_eq!(history.back(), Some(p("/a")));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(p("/b")));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut history = NavigationHistory::new();
        assert!(history.current().is_none());
        history.push(p("/x"));
        assert_eq!(history.current(), Some(Path::new("/x")));
    }
}
