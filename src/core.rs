//! Core runtime logic for faro.
//!
//! This module contains the non-UI engine pieces used by the application:
//! - [fm]: directory scanning, entry metadata and sort orders.
//! - [cache]: the mtime-validated directory listing cache.
//! - [search]: background recursive search with batched delivery.
//! - [fileops]: filesystem mutation seams (copy/move/delete/open/confirm).
//! - [error]: the error taxonomy surfaced to the status line.
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.

pub mod cache;
pub mod error;
pub mod fileops;
pub mod fm;
pub mod search;
pub mod terminal;

pub use cache::{DirRecord, DirectoryCache};
pub use error::BrowseError;
pub use fileops::{Confirmer, FileOps, Opener, Progress, SilentProgress, StdFileOps, SystemOpener};
pub use fm::{Entry, EntryKind, SortMode, scan_dir, sort_entries};
pub use search::{SearchPhase, SearchProgress, SearchState};
