// ─── Version File ───
// Parses a Mojang version JSON: main class, client download, asset index
// reference and the flat library list.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::downloader::part_path;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::get_ok;

/// A fully parsed Mojang version JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: String,
    pub main_class: String,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    pub downloads: Option<VersionDownloads>,
    pub asset_index: AssetIndexInfo,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    /// Size of the index document itself.
    #[serde(default)]
    pub size: Option<u64>,
    /// Sum of all objects the index lists.
    #[serde(default)]
    pub total_size: Option<u64>,
}

// ─── Library Entry ───

#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    /// Mojang OS name → classifier key, e.g. `{"linux": "natives-linux"}`.
    #[serde(default)]
    pub natives: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
    #[serde(default)]
    pub classifiers: Option<BTreeMap<String, LibDownloadArtifact>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibDownloadArtifact {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: String,
}

impl VersionJson {
    /// Fetch and parse a version JSON from the given URL using a shared client.
    ///
    /// Returns the raw body too so it can be persisted verbatim.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<(Self, String)> {
        let raw = get_ok(client, url).await?.text().await?;
        let version_json: VersionJson = serde_json::from_str(&raw)?;
        Ok((version_json, raw))
    }

    /// Reject a document whose `id` differs from the manifest entry that
    /// pointed to it.
    pub fn ensure_id(&self, requested: &str) -> LauncherResult<()> {
        if self.id != requested {
            return Err(LauncherError::VersionMismatch {
                requested: requested.to_string(),
                actual: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Persist the raw version JSON unless a copy is already on disk.
    ///
    /// Returns `false` when the existing file was kept. New files go through
    /// a `.part` sibling and a rename.
    pub async fn save_to(raw_json: &str, path: &Path) -> LauncherResult<bool> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        if exists {
            debug!("Keeping existing version JSON {:?}", path);
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }
        let part = part_path(path);
        tokio::fs::write(&part, raw_json)
            .await
            .map_err(|e| LauncherError::io(&part, e))?;
        tokio::fs::rename(&part, path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        info!("Saved version JSON to {:?}", path);
        Ok(true)
    }

    /// Client download, if the document declares one.
    pub fn client_download(&self) -> Option<&DownloadArtifact> {
        self.downloads.as_ref()?.client.as_ref()
    }
}
