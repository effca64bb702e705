//! Resilient local writes.
//!
//! [`WriteCoordinator`] makes sure the destination directory exists, then
//! hands the encoded text to a [`WriteSink`] under the configured retry
//! policy. The default sink writes to a sibling temp file and renames it over
//! the destination, which is enough for a single writer. Nothing is cleaned
//! up after a failed attempt.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use yamldoc_core::{Error, Result, RetryConfig, retry_with_backoff};

/// Destination for encoded document text
pub trait WriteSink: Send + Sync {
    /// Replace the contents of `path` with `contents`
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Write-to-temp then rename.
///
/// Symlinks are followed so the link target is replaced, and an existing
/// file keeps its permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicFileSink;

impl AtomicFileSink {
    /// File the rename lands on: `path` itself, or its symlink target
    fn resolve_target(path: &Path) -> io::Result<PathBuf> {
        if path.file_name().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} does not name a file", path.display()),
            ));
        }

        match fs::canonicalize(path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
            Err(e) => Err(e),
        }
    }

    fn temp_path(path: &Path) -> io::Result<PathBuf> {
        let Some(file_name) = path.file_name() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} does not name a file", path.display()),
            ));
        };
        let mut name = file_name.to_os_string();
        name.push(".tmp");
        Ok(path.with_file_name(name))
    }
}

impl WriteSink for AtomicFileSink {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let target = Self::resolve_target(path)?;
        let temp_path = Self::temp_path(&target)?;
        fs::write(&temp_path, contents)?;

        if let Ok(existing) = fs::metadata(&target) {
            fs::set_permissions(&temp_path, existing.permissions())?;
        }

        fs::rename(&temp_path, &target)
    }
}

/// Directory preparation plus retried writes
#[derive(Clone)]
pub struct WriteCoordinator {
    retry: RetryConfig,
    sink: Arc<dyn WriteSink>,
}

impl WriteCoordinator {
    /// Coordinator using the default atomic sink
    pub fn new(retry: RetryConfig) -> Self {
        Self::with_sink(retry, Arc::new(AtomicFileSink))
    }

    pub fn with_sink(retry: RetryConfig, sink: Arc<dyn WriteSink>) -> Self {
        Self { retry, sink }
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Make sure the parent directory of `path` exists.
    ///
    /// Fails without creating anything when the parent location is occupied
    /// by a non-directory.
    pub fn ensure_parent_dir(&self, path: &Path) -> Result<()> {
        let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        if dir.is_dir() {
            return Ok(());
        }

        if dir.exists() {
            return Err(Error::not_a_directory(dir));
        }

        create_dir_tree(dir).map_err(|e| Error::directory_creation(dir, e))?;
        log::debug!("Created directory {}", dir.display());
        Ok(())
    }

    /// Prepare the directory, then write with retries
    pub fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.ensure_parent_dir(path)?;
        self.write_contents(path, contents)
    }

    /// Write `contents` to `path`, retrying failed attempts.
    ///
    /// The error of the last attempt is returned as the source of
    /// [`Error::Io`], unchanged.
    pub fn write_contents(&self, path: &Path, contents: &str) -> Result<()> {
        let max_attempts = self.retry.max_attempts.max(1);
        retry_with_backoff(&self.retry, |attempt| {
            self.sink.write(path, contents).inspect_err(|e| {
                if attempt < max_attempts {
                    log::warn!(
                        "Write to {} failed (attempt {}/{}), retrying: {}",
                        path.display(),
                        attempt,
                        max_attempts,
                        e
                    );
                }
            })
        })
        .map_err(|e| Error::io(path, e))
    }
}

impl std::fmt::Debug for WriteCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteCoordinator")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(unix)]
fn create_dir_tree(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)
}

#[cfg(not(unix))]
fn create_dir_tree(dir: &Path) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).create(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    /// Fails the first `failures` calls, then delegates to the atomic sink
    struct FlakySink {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakySink {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl WriteSink for FlakySink {
        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(io::Error::new(
                    io::ErrorKind::ResourceBusy,
                    format!("busy on attempt {}", call),
                ));
            }
            AtomicFileSink.write(path, contents)
        }
    }

    #[test]
    fn test_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lock.yaml");
        fs::write(&path, "old: true\n").unwrap();

        WriteCoordinator::new(RetryConfig::immediate())
            .write(&path, "new: true\n")
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new: true\n");
        assert!(!temp_dir.path().join("lock.yaml.tmp").exists());
    }

    #[test]
    fn test_creates_missing_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c/lock.yaml");

        WriteCoordinator::new(RetryConfig::immediate())
            .write(&path, "x: 1\n")
            .unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_parent_occupied_by_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("vendor");
        fs::write(&blocker, "not a dir").unwrap();

        let sink = Arc::new(FlakySink::new(0));
        let coordinator = WriteCoordinator::with_sink(RetryConfig::immediate(), sink.clone());
        let err = coordinator
            .write(&blocker.join("lock.yaml"), "x: 1\n")
            .unwrap_err();

        assert!(matches!(err, Error::NotADirectory { ref path } if path == &blocker));
        assert!(blocker.is_file());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_directory_creation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("vendor");
        fs::write(&blocker, "not a dir").unwrap();

        // Parent does not exist, but one of its ancestors is a file
        let path = blocker.join("nested/lock.yaml");
        let err = WriteCoordinator::new(RetryConfig::immediate())
            .write(&path, "x: 1\n")
            .unwrap_err();

        assert!(matches!(err, Error::DirectoryCreation { .. }));
        assert!(err.to_string().contains("could not be created"));
    }

    #[test]
    fn test_retry_absorbs_transient_failures() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lock.yaml");

        let sink = Arc::new(FlakySink::new(2));
        WriteCoordinator::with_sink(RetryConfig::immediate(), sink.clone())
            .write(&path, "ok: true\n")
            .unwrap();

        assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "ok: true\n");
    }

    #[test]
    fn test_final_error_propagates_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lock.yaml");

        let sink = Arc::new(FlakySink::new(3));
        let err = WriteCoordinator::with_sink(RetryConfig::immediate(), sink.clone())
            .write(&path, "ok: true\n")
            .unwrap_err();

        assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
        match err {
            Error::Io { path: failed, source } => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), io::ErrorKind::ResourceBusy);
                assert_eq!(source.to_string(), "busy on attempt 3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let err = AtomicFileSink
            .write(&temp_dir.path().join("nested/.."), "x: 1\n")
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(!temp_dir.path().join(".tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth.yaml");
        fs::write(&path, "token: old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        AtomicFileSink.write(&path, "token: new\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "token: new\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink_updates_target() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.yaml");
        let link = temp_dir.path().join("link.yaml");
        fs::write(&real, "a: 1\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        AtomicFileSink.write(&link, "a: 2\n").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "a: 2\n");
        assert!(!temp_dir.path().join("link.yaml.tmp").exists());
    }

    #[test]
    fn test_relative_file_name_has_no_parent_to_create() {
        let coordinator = WriteCoordinator::new(RetryConfig::immediate());
        assert!(coordinator.ensure_parent_dir(Path::new("lock.yaml")).is_ok());
    }
}
