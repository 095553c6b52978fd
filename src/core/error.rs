use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launcher pipeline.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── Resolution ──────────────────────────────────────
    #[error("Version {0} not found in manifest")]
    VersionNotFound(String),

    #[error("Version document mismatch: requested {requested}, got {actual}")]
    VersionMismatch { requested: String, actual: String },

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Size mismatch for {path:?}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid content hash {0:?}")]
    InvalidHash(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Platform ────────────────────────────────────────
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ── Pipeline ────────────────────────────────────────
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<LauncherError>,
    },
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

/// Coarse classification used by callers to decide whether a re-run can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    FetchError,
    UnsupportedPlatform,
    FilesystemError,
    InvalidConfig,
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Manifest,
    Version,
    Libraries,
    Client,
    AssetIndex,
    Assets,
    LaunchScript,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Manifest => "manifest",
            Stage::Version => "version",
            Stage::Libraries => "libraries",
            Stage::Client => "client",
            Stage::AssetIndex => "asset-index",
            Stage::Assets => "assets",
            Stage::LaunchScript => "launch-script",
        };
        f.write_str(name)
    }
}

impl LauncherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LauncherError::VersionNotFound(_) => ErrorKind::NotFound,
            LauncherError::VersionMismatch { .. }
            | LauncherError::Http(_)
            | LauncherError::DownloadFailed { .. }
            | LauncherError::Sha1Mismatch { .. }
            | LauncherError::SizeMismatch { .. }
            | LauncherError::InvalidHash(_)
            | LauncherError::Json(_) => ErrorKind::FetchError,
            LauncherError::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            LauncherError::Io { .. } => ErrorKind::FilesystemError,
            LauncherError::Config(_) => ErrorKind::InvalidConfig,
            LauncherError::Stage { source, .. } => source.kind(),
        }
    }

    /// Only network-side failures are worth retrying; completed targets are
    /// skipped on the next run.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::FetchError
    }

    /// Stage label attached by the pipeline, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            LauncherError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attaches a pipeline stage to any error on its way out.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> LauncherResult<T>;
}

impl<T> StageContext<T> for LauncherResult<T> {
    fn stage(self, stage: Stage) -> LauncherResult<T> {
        self.map_err(|e| match e {
            already @ LauncherError::Stage { .. } => already,
            other => LauncherError::Stage {
                stage,
                source: Box::new(other),
            },
        })
    }
}
