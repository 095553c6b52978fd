// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version index.

use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::get_ok;

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub latest: Option<LatestVersions>,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type", default)]
    pub version_type: String,
    pub url: String,
    #[serde(rename = "releaseTime", default)]
    pub release_time: String,
}

impl VersionManifest {
    /// Fetch the version manifest using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let manifest: VersionManifest = get_ok(client, url).await?.json().await?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.16.1").
    ///
    /// Exact, case-sensitive match; the first entry wins. `latest` and
    /// `latest-snapshot` go through the manifest's `latest` block when no
    /// entry carries that literal id.
    pub fn find_version(&self, id: &str) -> LauncherResult<&VersionEntry> {
        if let Some(entry) = self.versions.iter().find(|v| v.id == id) {
            return Ok(entry);
        }

        let alias = match (&self.latest, id) {
            (Some(latest), "latest") => Some(latest.release.as_str()),
            (Some(latest), "latest-snapshot") => Some(latest.snapshot.as_str()),
            _ => None,
        };

        alias
            .and_then(|target| self.versions.iter().find(|v| v.id == target))
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))
    }

    /// List all official stable versions (release only).
    pub fn releases(&self) -> Vec<&VersionEntry> {
        self.versions
            .iter()
            .filter(|v| v.version_type == "release")
            .collect()
    }
}
