use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::stream::{self, TryStreamExt};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::get_ok;

/// A single file to download with optional SHA-1 for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub url: String,
    pub dest: PathBuf,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

impl DownloadEntry {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            sha1: None,
            size: None,
        }
    }

    pub fn with_sha1(mut self, sha1: Option<String>) -> Self {
        self.sha1 = sha1.filter(|s| !s.is_empty());
        self
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }
}

/// What happened to one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded,
    /// Already present on disk (or nothing to download).
    Skipped,
}

/// Counters for a batch of fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub downloaded: usize,
    pub skipped: usize,
}

impl FetchStats {
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: FetchStats) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
    }
}

/// Idempotent, create-only downloader with bounded concurrency.
pub struct Downloader {
    client: Client,
    /// Maximum number of parallel downloads.
    concurrency: usize,
    /// Hash existing files instead of trusting their presence.
    verify_existing: bool,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: 8,
            verify_existing: false,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_existing = verify;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    // ── Single file download ────────────────────────────

    /// Fetch `entry.url` into `entry.dest` unless the file is already there.
    ///
    /// An empty URL is a successful no-op. The body is written to a sibling
    /// `.part` file and renamed into place, so the final path only ever holds
    /// a complete body.
    pub async fn download_file(&self, entry: &DownloadEntry) -> LauncherResult<FetchOutcome> {
        if entry.url.is_empty() {
            return Ok(FetchOutcome::Skipped);
        }

        if self.is_present(entry).await? {
            debug!("Cached: {:?}", entry.dest);
            return Ok(FetchOutcome::Skipped);
        }

        // Ensure parent dir exists
        if let Some(parent) = entry.dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let bytes = get_ok(&self.client, &entry.url).await?.bytes().await?;

        // Validate SHA-1 before writing (compute on the in-memory buffer)
        if let Some(expected) = entry.sha1.as_deref() {
            let actual = sha1_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::Sha1Mismatch {
                    path: entry.dest.clone(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        if let Some(expected) = entry.size {
            let actual = bytes.len() as u64;
            if actual != expected {
                return Err(LauncherError::SizeMismatch {
                    path: entry.dest.clone(),
                    expected,
                    actual,
                });
            }
        }

        let part = part_path(&entry.dest);
        {
            let mut file = tokio::fs::File::create(&part)
                .await
                .map_err(|e| LauncherError::io(&part, e))?;
            file.write_all(&bytes)
                .await
                .map_err(|e| LauncherError::io(&part, e))?;
            file.flush().await.map_err(|e| LauncherError::io(&part, e))?;
        }
        tokio::fs::rename(&part, &entry.dest)
            .await
            .map_err(|e| LauncherError::io(&entry.dest, e))?;

        debug!("Downloaded: {} -> {:?}", entry.url, entry.dest);
        Ok(FetchOutcome::Downloaded)
    }

    async fn is_present(&self, entry: &DownloadEntry) -> LauncherResult<bool> {
        match tokio::fs::metadata(&entry.dest).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(LauncherError::io(&entry.dest, e)),
        }

        let expected = match (self.verify_existing, entry.sha1.as_deref()) {
            (true, Some(expected)) => expected,
            _ => return Ok(true),
        };

        if Self::validate_sha1(&entry.dest, expected).await? {
            return Ok(true);
        }

        warn!("Hash mismatch on disk, re-fetching {:?}", entry.dest);
        tokio::fs::remove_file(&entry.dest)
            .await
            .map_err(|e| LauncherError::io(&entry.dest, e))?;
        Ok(false)
    }

    // ── Batch concurrent downloads ──────────────────────

    /// Download many files with at most `concurrency` in flight.
    ///
    /// Targets sharing a destination are fetched once. The first failure
    /// stops the batch: queued entries are never started and in-flight ones
    /// are dropped.
    pub async fn download_batch(&self, entries: Vec<DownloadEntry>) -> LauncherResult<FetchStats> {
        let mut seen = HashSet::new();
        let entries: Vec<DownloadEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.dest.clone()))
            .collect();

        info!(
            "Starting batch download: {} files, concurrency={}",
            entries.len(),
            self.concurrency
        );

        let downloaded = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);

        stream::iter(entries.iter().map(Ok::<_, LauncherError>))
            .try_for_each_concurrent(self.concurrency, |entry| {
                let downloaded = &downloaded;
                let skipped = &skipped;
                async move {
                    match self.download_file(entry).await? {
                        FetchOutcome::Downloaded => downloaded.fetch_add(1, Ordering::Relaxed),
                        FetchOutcome::Skipped => skipped.fetch_add(1, Ordering::Relaxed),
                    };
                    Ok(())
                }
            })
            .await?;

        Ok(FetchStats {
            downloaded: downloaded.into_inner(),
            skipped: skipped.into_inner(),
        })
    }

    /// Validate an existing file's SHA-1.
    pub async fn validate_sha1(path: &Path, expected: &str) -> LauncherResult<bool> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Ok(sha1_hex(&bytes).eq_ignore_ascii_case(expected))
    }
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Sibling `<name>.part` used while a body is being written.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::http::build_http_client;
    use std::time::Duration;

    fn downloader() -> Downloader {
        Downloader::new(build_http_client(Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn empty_url_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nothing.jar");

        let outcome = downloader()
            .download_file(&DownloadEntry::new("", &dest))
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Skipped);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn existing_file_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/lib.jar")
            .with_body("remote")
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("lib.jar");
        std::fs::write(&dest, b"local").unwrap();

        let entry = DownloadEntry::new(format!("{}/lib.jar", server.url()), &dest);
        let outcome = downloader().download_file(&entry).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Skipped);
        assert_eq!(std::fs::read(&dest).unwrap(), b"local");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn creates_parent_dirs_and_writes_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/a/b.bin")
            .with_body("payload")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deep").join("nested").join("b.bin");
        let entry = DownloadEntry::new(format!("{}/a/b.bin", server.url()), &dest);

        let outcome = downloader().download_file(&entry).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded);
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn non_success_status_is_retryable_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing");
        let entry = DownloadEntry::new(format!("{}/missing", server.url()), &dest);

        let err = downloader().download_file(&entry).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(err.is_retryable());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn rejects_body_with_wrong_sha1() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/obj")
            .with_body("tampered")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("obj");
        let entry = DownloadEntry::new(format!("{}/obj", server.url()), &dest)
            .with_sha1(Some(sha1_hex(b"original")));

        let err = downloader().download_file(&entry).await.unwrap_err();
        assert!(matches!(err, LauncherError::Sha1Mismatch { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn rejects_body_with_wrong_size() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/short")
            .with_body("abc")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("short");
        let entry =
            DownloadEntry::new(format!("{}/short", server.url()), &dest).with_size(Some(10));

        let err = downloader().download_file(&entry).await.unwrap_err();
        assert!(matches!(
            err,
            LauncherError::SizeMismatch { expected: 10, actual: 3, .. }
        ));
        assert!(err.is_retryable());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn stalled_response_times_out_as_retryable() {
        use std::io::Write;

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/slow")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(b"late")
            })
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("slow");
        let entry = DownloadEntry::new(format!("{}/slow", server.url()), &dest);

        let downloader = Downloader::new(build_http_client(Duration::from_secs(1)).unwrap());
        let err = downloader.download_file(&entry).await.unwrap_err();

        assert!(matches!(err, LauncherError::Http(_)));
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(err.is_retryable());
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn verification_refetches_corrupted_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/obj")
            .with_body("good")
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("obj");
        std::fs::write(&dest, b"bad").unwrap();
        let entry = DownloadEntry::new(format!("{}/obj", server.url()), &dest)
            .with_sha1(Some(sha1_hex(b"good")));

        let outcome = downloader()
            .with_verification(true)
            .download_file(&entry)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded);
        assert_eq!(std::fs::read(&dest).unwrap(), b"good");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn batch_dedupes_by_destination() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/shared")
            .with_body("blob")
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("ab").join("shared");
        let url = format!("{}/shared", server.url());
        let entries = vec![
            DownloadEntry::new(&url, &dest),
            DownloadEntry::new(&url, &dest),
            DownloadEntry::new(&url, &dest),
        ];

        let stats = downloader()
            .with_concurrency(3)
            .download_batch(entries)
            .await
            .unwrap();

        assert_eq!(stats, FetchStats { downloaded: 1, skipped: 0 });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn batch_fails_fast_with_single_error() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server.mock("GET", "/ok").with_body("x").create_async().await;
        let _bad = server
            .mock("GET", "/bad")
            .with_status(500)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            DownloadEntry::new(format!("{}/bad", server.url()), dir.path().join("bad")),
            DownloadEntry::new(format!("{}/ok", server.url()), dir.path().join("ok")),
        ];

        let err = downloader()
            .with_concurrency(1)
            .download_batch(entries)
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::DownloadFailed { status: 500, .. }));
        // Sequential order: the second target is never started.
        assert!(!dir.path().join("ok").exists());
    }

    #[test]
    fn part_path_is_sibling() {
        assert_eq!(
            part_path(Path::new("/x/y/file.jar")),
            PathBuf::from("/x/y/file.jar.part")
        );
    }
}
