//! Capability traits at the filesystem-mutation seam.
//!
//! The engine never copies, moves, deletes or opens anything directly; it
//! goes through these traits so destructive behavior stays testable with
//! scripted implementations. The std implementations live here too.

use crate::utils::copy_recursive;

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

/// Raw filesystem mutation primitives used by paste and delete.
pub trait FileOps {
    /// Copies `src` to `dst`, recursing into directories.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()>;
    /// Moves `src` to `dst`.
    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()>;
    /// Removes `path`, recursing into directories.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Launches the platform default handler for a file.
pub trait Opener {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Synchronous yes/no prompt for destructive or overwrite actions.
/// Blocks the foreground loop only for the duration of the prompt.
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Receives one report per processed item while a multi-item operation
/// (paste, delete) runs, so long batches show movement before the final
/// summary lands in the status line.
pub trait Progress {
    fn report(&mut self, done: usize, total: usize, item: &str);
}

/// Progress sink that discards every report.
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn report(&mut self, _done: usize, _total: usize, _item: &str) {}
}

/// Std-backed [FileOps].
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        if src.is_dir() {
            copy_recursive(src, dst)
        } else {
            fs::copy(src, dst).map(|_| ())
        }
    }

    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()> {
        fs::rename(src, dst)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

/// Opens files with `xdg-open`/`open`/`cmd start` depending on platform.
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        #[cfg(target_os = "macos")]
        let mut cmd = {
            let mut c = Command::new("open");
            c.arg(path);
            c
        };
        #[cfg(target_os = "windows")]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        };
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let mut cmd = {
            let mut c = Command::new("xdg-open");
            c.arg(path);
            c
        };

        cmd.spawn().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn std_ops_copy_recurses_into_directories() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        let src = base.path().join("tree");
        std::fs::create_dir_all(src.join("inner"))?;
        std::fs::write(src.join("inner").join("leaf.txt"), "x")?;

        let dst = base.path().join("copy");
        StdFileOps.copy(&src, &dst)?;

        assert!(dst.join("inner").join("leaf.txt").exists());
        assert!(src.join("inner").join("leaf.txt").exists(), "copy must not move");
        Ok(())
    }

    #[test]
    fn std_ops_remove_handles_both_kinds() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        let file = base.path().join("gone.txt");
        let dir = base.path().join("nest");
        std::fs::write(&file, "")?;
        std::fs::create_dir_all(dir.join("deep"))?;

        StdFileOps.remove(&file)?;
        StdFileOps.remove(&dir)?;
        assert!(!file.exists());
        assert!(!dir.exists());
        Ok(())
    }
}
