//! Directory scanning and entry metadata for faro.
//!
//! Provides the [Entry] struct used throughout the engine, the [EntryKind]
//! classification and the [SortMode] orderings applied by the directory
//! cache. Entries are immutable once built for a given cache generation.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use serde::Deserialize;

/// Display classification of an entry, derived in priority order:
/// directory-ness, execute permission, extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Executable,
    Archive,
    Image,
    Default,
}

const ARCHIVE_EXTS: [&str; 4] = ["zip", "tar", "gz", "bz2"];
const IMAGE_EXTS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// A single filesystem item with its cached stat metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    name: Box<OsStr>,
    is_dir: bool,
    size: u64,
    modified: Option<SystemTime>,
    kind: EntryKind,
}

impl Entry {
    pub fn new(
        name: OsString,
        is_dir: bool,
        size: u64,
        modified: Option<SystemTime>,
        kind: EntryKind,
    ) -> Self {
        Entry {
            name: name.into_boxed_os_str(),
            is_dir,
            size,
            modified,
            kind,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Size in bytes. Directories report 0.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Hidden entries are dotfiles, as on most unix tools.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.name.as_encoded_bytes().first() == Some(&b'.')
    }
}

/// Derives the [EntryKind] for a scanned item.
///
/// Directory-ness wins over everything; the execute bit wins over the
/// extension lists.
fn classify(name: &OsStr, is_dir: bool, metadata: &fs::Metadata) -> EntryKind {
    if is_dir {
        return EntryKind::Directory;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 != 0 {
            return EntryKind::Executable;
        }
    }
    #[cfg(windows)]
    {
        let _ = metadata;
        if let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) {
            match ext.to_ascii_lowercase().as_str() {
                "exe" | "com" | "bat" | "cmd" | "ps1" => return EntryKind::Executable,
                _ => {}
            }
        }
    }

    if let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) {
        let lowered = ext.to_ascii_lowercase();
        if ARCHIVE_EXTS.contains(&lowered.as_str()) {
            return EntryKind::Archive;
        }
        if IMAGE_EXTS.contains(&lowered.as_str()) {
            return EntryKind::Image;
        }
    }
    EntryKind::Default
}

/// Reads the contents of `path` and returns one [Entry] per readable item.
///
/// Items whose metadata cannot be read (a race with concurrent external
/// deletion) are skipped without failing the whole scan.
pub fn scan_dir(path: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(256);

    for dirent in fs::read_dir(path)? {
        let dirent = match dirent {
            Ok(e) => e,
            Err(_) => continue,
        };

        let metadata = match dirent.metadata() {
            Ok(md) => md,
            Err(_) => continue,
        };

        let name = dirent.file_name();
        let is_dir = metadata.is_dir();
        let kind = classify(&name, is_dir, &metadata);
        let size = if is_dir { 0 } else { metadata.len() };

        entries.push(Entry::new(name, is_dir, size, metadata.modified().ok(), kind));
    }
    Ok(entries)
}

/// Listing orderings supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Name,
    Size,
    Modified,
}

impl SortMode {
    /// Cycle order used by the sort command: name -> size -> modified.
    pub fn next(self) -> SortMode {
        match self {
            SortMode::Name => SortMode::Size,
            SortMode::Size => SortMode::Modified,
            SortMode::Modified => SortMode::Name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Name => "Name",
            SortMode::Size => "Size",
            SortMode::Modified => "Modified",
        }
    }
}

/// Sorts a listing in place.
///
/// `Name` places all directories before all files, case-insensitively
/// within each group. `Size` is ascending with directories at 0.
/// `Modified` is newest first.
pub fn sort_entries(entries: &mut [Entry], mode: SortMode) {
    match mode {
        SortMode::Name => {
            entries.sort_by(|a, b| {
                (!a.is_dir, a.name_str().to_lowercase())
                    .cmp(&(!b.is_dir, b.name_str().to_lowercase()))
            });
        }
        SortMode::Size => {
            entries.sort_by_key(|e| e.size);
        }
        SortMode::Modified => {
            entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn plain(name: &str, is_dir: bool, size: u64) -> Entry {
        let kind = if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::Default
        };
        Entry::new(OsString::from(name), is_dir, size, None, kind)
    }

    #[test]
    fn name_sort_puts_directories_first() {
        let mut entries = vec![
            plain("zeta.txt", false, 1),
            plain("Alpha", true, 0),
            plain("beta.txt", false, 2),
            plain("gamma", true, 0),
        ];
        sort_entries(&mut entries, SortMode::Name);

        let names: Vec<_> = entries.iter().map(|e| e.name_str().into_owned()).collect();
        assert_eq!(names, vec!["Alpha", "gamma", "beta.txt", "zeta.txt"]);
    }

    #[test]
    fn size_sort_is_ascending_with_dirs_at_zero() {
        let mut entries = vec![
            plain("big.bin", false, 500),
            plain("dir", true, 0),
            plain("small.bin", false, 3),
        ];
        sort_entries(&mut entries, SortMode::Size);
        assert_eq!(entries[0].name_str(), "dir");
        assert_eq!(entries[1].name_str(), "small.bin");
        assert_eq!(entries[2].name_str(), "big.bin");
    }

    #[test]
    fn kind_derivation_priority() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("sub.zip"))?;
        File::create(dir.path().join("pic.PNG"))?;
        File::create(dir.path().join("pack.tar"))?;
        File::create(dir.path().join("notes.txt"))?;

        let entries = scan_dir(dir.path())?;
        let kind_of = |name: &str| {
            entries
                .iter()
                .find(|e| e.name_str() == name)
                .map(|e| e.kind())
        };

        // A directory named like an archive is still a directory.
        assert_eq!(kind_of("sub.zip"), Some(EntryKind::Directory));
        assert_eq!(kind_of("pic.PNG"), Some(EntryKind::Image));
        assert_eq!(kind_of("pack.tar"), Some(EntryKind::Archive));
        assert_eq!(kind_of("notes.txt"), Some(EntryKind::Default));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_beats_extension() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let path = dir.path().join("script.png");
        File::create(&path)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

        let entries = scan_dir(dir.path())?;
        assert_eq!(entries[0].kind(), EntryKind::Executable);
        Ok(())
    }

    #[test]
    fn scan_nonexistent_errors() {
        assert!(scan_dir(Path::new("/path/does/not/exist")).is_err());
    }
}
