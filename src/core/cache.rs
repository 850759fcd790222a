//! Directory listing cache for faro.
//!
//! Listings are cached per path and invalidated by the directory's
//! modification timestamp: a record is valid iff the current filesystem
//! mtime equals the one observed when the record was captured, with no
//! tolerance window. Records are replaced wholesale, never patched.
//!
//! The cache is only ever read and refreshed from the foreground thread,
//! so reads are linearizable per path. Growth is bounded by an LRU
//! eviction keyed on last access.

use crate::core::error::BrowseError;
use crate::core::fm::{Entry, SortMode, scan_dir, sort_entries};

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// One cached directory listing.
///
/// `entries` is the filtered, sorted sequence shown to the user;
/// `by_name` indexes into it for O(1) metadata lookups by entry name.
/// The record remembers the display preferences it was built under, so a
/// lookup with different preferences never reuses it.
#[derive(Debug)]
pub struct DirRecord {
    mtime: SystemTime,
    show_hidden: bool,
    sort: SortMode,
    entries: Vec<Entry>,
    by_name: HashMap<OsString, usize>,
}

impl DirRecord {
    #[inline]
    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached metadata lookup by entry name.
    pub fn metadata(&self, name: &OsStr) -> Option<&Entry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }
}

struct CacheSlot {
    record: Arc<DirRecord>,
    last_used: u64,
}

/// Mtime-validated, LRU-bounded cache of directory listings.
pub struct DirectoryCache {
    slots: HashMap<PathBuf, CacheSlot>,
    clock: u64,
    capacity: usize,
}

impl DirectoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: HashMap::new(),
            clock: 0,
            capacity: capacity.max(1),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the cached record for `path`, rescanning when the
    /// directory's mtime no longer matches the stored one or the record
    /// was built under different display preferences.
    ///
    /// On a rescan, items whose metadata cannot be read are skipped,
    /// hidden entries are filtered per `show_hidden`, and the listing is
    /// sorted per `sort`.
    pub fn get(
        &mut self,
        path: &Path,
        show_hidden: bool,
        sort: SortMode,
    ) -> Result<Arc<DirRecord>, BrowseError> {
        let current_mtime = fs::metadata(path)
            .and_then(|md| md.modified())
            .map_err(|e| BrowseError::classify(e, path))?;

        self.clock += 1;
        if let Some(slot) = self.slots.get_mut(path)
            && slot.record.mtime == current_mtime
            && slot.record.show_hidden == show_hidden
            && slot.record.sort == sort
        {
            slot.last_used = self.clock;
            return Ok(Arc::clone(&slot.record));
        }

        let mut entries =
            scan_dir(path).map_err(|e| BrowseError::classify(e, path))?;
        if !show_hidden {
            entries.retain(|e| !e.is_hidden());
        }
        sort_entries(&mut entries, sort);

        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name().to_os_string(), i))
            .collect();

        let record = Arc::new(DirRecord {
            mtime: current_mtime,
            show_hidden,
            sort,
            entries,
            by_name,
        });

        self.evict_if_full(path);
        self.slots.insert(
            path.to_path_buf(),
            CacheSlot {
                record: Arc::clone(&record),
                last_used: self.clock,
            },
        );
        Ok(record)
    }

    /// Drops the record for `path`, forcing a rescan on the next `get`.
    pub fn invalidate(&mut self, path: &Path) {
        self.slots.remove(path);
    }

    /// Drops everything. Used when display preferences change globally.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn evict_if_full(&mut self, incoming: &Path) {
        if self.slots.len() < self.capacity || self.slots.contains_key(incoming) {
            return;
        }
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(p, _)| p.clone());
        if let Some(path) = oldest {
            self.slots.remove(&path);
        }
    }
}
