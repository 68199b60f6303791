//! On-disk location and write discipline for persisted client state.
//!
//! Nonce counters and cookie jars live as small files in one directory. Every
//! mutation runs under an exclusive advisory lock on a sibling `.lock` file and
//! lands through write-to-temp-then-rename, so readers observe either the old
//! or the new contents and concurrent writers (threads or processes) never
//! interleave.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Environment variable overriding the default state directory.
pub const STATE_DIR_VAR: &str = "YOBIT_STATE_DIR";

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".yobit";

/// Directory holding persisted nonce and session files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// Use `root` as the state directory. It is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$YOBIT_STATE_DIR`, falling back to `./.yobit`.
    pub fn from_env() -> Self {
        match std::env::var_os(STATE_DIR_VAR) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_STATE_DIR),
        }
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Full path of a state file.
    pub(crate) fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Run `f` while holding the exclusive lock guarding `name`.
    pub(crate) fn with_lock<T>(
        &self,
        name: &str,
        f: impl FnOnce(&Path) -> io::Result<T>,
    ) -> io::Result<T> {
        fs::create_dir_all(&self.root)?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.file(&format!("{name}.lock")))?;
        lock.lock()?;
        let result = f(&self.file(name));
        // Dropping the handle unlocks too.
        let _ = lock.unlock();
        result
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Read a state file, mapping "does not exist" to `None`.
pub(crate) fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replace `path` with `contents` durably.
///
/// Must be called under the lock for `path`, since the temp file name is fixed.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

/// Remove `path`, treating "does not exist" as success.
pub(crate) fn remove_optional(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path());

        state
            .with_lock("value.txt", |path| write_atomic(path, b"1"))
            .unwrap();
        state
            .with_lock("value.txt", |path| write_atomic(path, b"2"))
            .unwrap();

        let contents = read_optional(&state.file("value.txt")).unwrap();
        assert_eq!(contents.as_deref(), Some("2"));
        assert!(!state.file("value.tmp").exists());
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path().join("nested"));
        assert!(read_optional(&state.file("absent.txt")).unwrap().is_none());
        remove_optional(&state.file("absent.txt")).unwrap();
    }

    #[test]
    fn test_directory_created_on_first_lock() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path().join("a").join("b"));
        state.with_lock("x", |_| Ok(())).unwrap();
        assert!(state.path().is_dir());
    }
}
