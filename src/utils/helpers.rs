//! Helpers for faro.
//!
//! This module provides utility functions used throughout faro:
//! - Recursive copying for directory paste operations
//! - Displaying home directories as "~" in file paths
//! - Formatting entry sizes and modification times for the listing
//! - Width-aware truncation for narrow terminals

use chrono::{DateTime, Local};
use humansize::{DECIMAL, format_size as humansize_format};
use unicode_width::UnicodeWidthStr;

use std::path::{MAIN_SEPARATOR, Path};
use std::time::SystemTime;
use std::{fs, io};

/// Recursively copies files and directories from `src` to `dest`.
///
/// If `src` is a directory, it creates the directory at `dest` and copies all its contents recursively.
pub fn copy_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            let entry_path = entry.path();
            let dest_path = dest.join(entry.file_name());
            copy_recursive(&entry_path, &dest_path)?;
        }
    } else {
        fs::copy(src, dest)?;
    }
    Ok(())
}

/// Util function to shorten home directory to ~.
/// Is used by the header path in the ui render function.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        } else {
            let mut short = stripped.display().to_string();
            if short.starts_with(MAIN_SEPARATOR) {
                short.remove(0);
            }
            return format!("~{}{}", MAIN_SEPARATOR, short);
        }
    }
    path.display().to_string()
}

/// Human readable size, decimal units ("1.5 kB"). Directories show "-".
pub fn format_entry_size(size: u64, is_dir: bool) -> String {
    if is_dir {
        "-".to_string()
    } else {
        humansize_format(size, DECIMAL)
    }
}

/// Local modification time as "YYYY-MM-DD HH:MM", or "-" when unknown.
pub fn format_mtime(modified: Option<SystemTime>) -> String {
    match modified {
        Some(time) => {
            let local: DateTime<Local> = time.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        None => "-".to_string(),
    }
}

/// Truncates `text` to at most `max_width` display columns, appending an
/// ellipsis when anything was cut. Width-aware so wide glyphs never
/// overflow the column.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0usize;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_copy_recursive_preserves_source() -> Result<(), Box<dyn error::Error>> {
        let base = tempdir()?;
        let src = base.path().join("src");
        fs::create_dir_all(src.join("nested"))?;
        File::create(src.join("nested").join("file.txt"))?;

        let dest = base.path().join("dest");
        copy_recursive(&src, &dest)?;

        assert!(dest.join("nested").join("file.txt").exists());
        assert!(src.join("nested").join("file.txt").exists());
        Ok(())
    }

    #[test]
    fn test_format_entry_size() {
        assert_eq!(format_entry_size(0, true), "-");
        assert_eq!(format_entry_size(0, false), "0 B");
        assert_eq!(format_entry_size(1500, false), "1.5 kB");
    }

    #[test]
    fn test_format_mtime_unknown() {
        assert_eq!(format_mtime(None), "-");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a_longer_name.txt", 8), "a_longe…");
        assert_eq!(truncate_to_width("anything", 0), "");
    }
}
