//! Raw content retrieval: local storage or an injected remote fetcher.

use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use yamldoc_core::{Error, Result};

use crate::logging::DebugLog;

/// Matches http:// and https:// locations, any case
static REMOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid remote pattern"));

/// Boxed error returned by fetcher implementations
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Capability to retrieve a document's raw text from somewhere other than
/// the local disk (HTTP, a proxy, an in-memory mirror...).
///
/// Timeouts and cancellation are the implementation's business.
pub trait RemoteFetcher: Send + Sync {
    fn get_contents(&self, location: &str) -> std::result::Result<String, FetchError>;
}

/// Check whether a path denotes an http/https URL
pub fn is_remote(path: &str) -> bool {
    REMOTE_PATTERN.is_match(path)
}

/// Where `read` gets its bytes from, chosen once at construction
#[derive(Clone)]
pub enum Source {
    Local,
    Remote(Arc<dyn RemoteFetcher>),
}

impl Source {
    /// Pick the source for `path`. Remote URLs require a fetcher.
    pub fn select(path: &str, fetcher: Option<Arc<dyn RemoteFetcher>>) -> Result<Self> {
        match fetcher {
            Some(fetcher) => Ok(Source::Remote(fetcher)),
            None if is_remote(path) => Err(Error::invalid_argument(format!(
                "a remote fetcher is required to load {}",
                path
            ))),
            None => Ok(Source::Local),
        }
    }

    /// Retrieve raw text for `path`
    pub fn fetch(&self, path: &str, logger: Option<&dyn DebugLog>) -> Result<String> {
        match self {
            Source::Remote(fetcher) => fetcher
                .get_contents(path)
                .map_err(|e| Error::fetch(path, e.to_string())),
            Source::Local => {
                if let Some(logger) = logger
                    && logger.is_debug_enabled()
                {
                    logger.debug(&format!("Reading {}", path));
                }
                std::fs::read_to_string(path).map_err(|e| Error::io(Path::new(path), e))
            }
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Local => f.write_str("Local"),
            Source::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

/// Blocking HTTP(S) fetcher backed by `reqwest`
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Create a fetcher with reqwest's default client
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Create a fetcher whose requests give up after `timeout`
    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config_error(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl RemoteFetcher for HttpFetcher {
    fn get_contents(&self, location: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(location).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StaticFetcher(&'static str);

    impl RemoteFetcher for StaticFetcher {
        fn get_contents(&self, _location: &str) -> std::result::Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingFetcher;

    impl RemoteFetcher for FailingFetcher {
        fn get_contents(&self, _location: &str) -> std::result::Result<String, FetchError> {
            Err("503 Service Unavailable".into())
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        debug: bool,
        lines: Mutex<Vec<String>>,
    }

    impl DebugLog for RecordingLog {
        fn is_debug_enabled(&self) -> bool {
            self.debug
        }

        fn debug(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://repo.example.org/packages.yaml"));
        assert!(is_remote("HTTP://repo.example.org/packages.yaml"));
        assert!(!is_remote("ftp://repo.example.org/packages.yaml"));
        assert!(!is_remote("/srv/https://not-a-url.yaml"));
        assert!(!is_remote("packages.yaml"));
    }

    #[test]
    fn test_select_requires_fetcher_for_remote() {
        let err = Source::select("https://example.org/a.yaml", None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let source =
            Source::select("https://example.org/a.yaml", Some(Arc::new(StaticFetcher("a: 1"))))
                .unwrap();
        assert!(matches!(source, Source::Remote(_)));

        assert!(matches!(
            Source::select("local.yaml", None).unwrap(),
            Source::Local
        ));
    }

    #[test]
    fn test_fetcher_is_used_for_local_paths_too() {
        let source = Source::select("proxied.yaml", Some(Arc::new(StaticFetcher("a: 1")))).unwrap();
        assert_eq!(source.fetch("proxied.yaml", None).unwrap(), "a: 1");
    }

    #[test]
    fn test_transport_error_is_rewrapped() {
        let source = Source::Remote(Arc::new(FailingFetcher));
        let err = source.fetch("https://example.org/a.yaml", None).unwrap_err();
        match err {
            Error::Fetch { url, message } => {
                assert_eq!(url, "https://example.org/a.yaml");
                assert_eq!(message, "503 Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_local_read_logs_when_debug_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.yaml");
        std::fs::write(&path, "a: 1\n").unwrap();
        let path = path.to_str().unwrap();

        let verbose = RecordingLog {
            debug: true,
            ..Default::default()
        };
        assert_eq!(Source::Local.fetch(path, Some(&verbose)).unwrap(), "a: 1\n");
        assert_eq!(
            verbose.lines.lock().unwrap().as_slice(),
            &[format!("Reading {}", path)]
        );

        let quiet = RecordingLog::default();
        Source::Local.fetch(path, Some(&quiet)).unwrap();
        assert!(quiet.lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_local_read_failure_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yaml");
        let err = Source::Local.fetch(path.to_str().unwrap(), None).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }
}
