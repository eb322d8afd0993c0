//! Source resolution: turning a path-or-URL descriptor into raw bytes.
//!
//! The resolver only decides "needs a network fetch" vs "pass through"; it
//! never reads local files itself. Materializing a local path into bytes is
//! [`ResolvedSource::into_bytes`]'s job, so the distinction stays visible to
//! callers.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Matches `proto://host/...` or protocol-relative `//host/...` where the
/// host contains a dot or is `localhost[:port]`.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\w+:)?//([^\s.]+\.\S{2}|localhost[:?\d]*)\S*$")
        .expect("Invalid source URL regex")
});

/// Whether a source descriptor needs a network fetch.
pub fn is_remote(source: &str) -> bool {
    URL_RE.is_match(source)
}

/// A resolved source descriptor.
#[derive(Debug, Clone)]
pub enum ResolvedSource {
    /// Response body of a remote fetch
    Remote(Vec<u8>),
    /// Local descriptor passed through unread
    Local(PathBuf),
}

impl ResolvedSource {
    /// Materialize the source into a byte buffer, reading the file for
    /// local descriptors.
    pub async fn into_bytes(self) -> Result<Vec<u8>, PipelineError> {
        match self {
            Self::Remote(bytes) => Ok(bytes),
            Self::Local(path) => {
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| PipelineError::SourceUnavailable {
                        src: path.display().to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

/// Resolves source descriptors, fetching remote ones over HTTP.
pub struct SourceResolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl SourceResolver {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(limits.fetch_timeout_ms),
        }
    }

    /// Resolve a descriptor. Remote fetch failures (non-2xx, network error,
    /// timeout) are `SourceUnavailable` and are never retried here.
    pub async fn resolve(&self, source: &str) -> Result<ResolvedSource, PipelineError> {
        if !is_remote(source) {
            return Ok(ResolvedSource::Local(PathBuf::from(source)));
        }

        let unavailable = |message: String| PipelineError::SourceUnavailable {
            src: source.to_string(),
            message,
        };

        let response = self
            .client
            .get(source)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| unavailable(e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        tracing::debug!(source, bytes = body.len(), "remote source fetched");
        Ok(ResolvedSource::Remote(body.to_vec()))
    }
}
