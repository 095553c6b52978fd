use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::downloader::{DownloadEntry, Downloader, FetchOutcome};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::{hash_shard, InstallLayout};
use crate::core::version::AssetIndexInfo;

/// Manages Minecraft asset downloads (sounds, textures referenced by asset index).
pub struct AssetManager;

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl AssetManager {
    /// Fetch target for the asset index document itself.
    pub fn index_target(info: &AssetIndexInfo, layout: &InstallLayout) -> DownloadEntry {
        DownloadEntry::new(info.url.clone(), layout.asset_index(&info.id))
            .with_sha1(info.sha1.clone())
            .with_size(info.size)
    }

    /// Materialize `assets/indexes/<id>.json` (skipped when present) and
    /// parse it from disk.
    ///
    /// A cached copy that no longer parses is removed and fetched once more.
    pub async fn load_index(
        info: &AssetIndexInfo,
        layout: &InstallLayout,
        downloader: &Downloader,
    ) -> LauncherResult<(AssetIndex, FetchOutcome)> {
        let target = Self::index_target(info, layout);
        let mut outcome = downloader.download_file(&target).await?;

        let index = match Self::read_index(&target.dest).await {
            Ok(index) => index,
            Err(e) if outcome == FetchOutcome::Skipped && !target.url.is_empty() => {
                warn!("Cached asset index {:?} is unreadable ({}), re-fetching", target.dest, e);
                outcome = downloader.download_file(&target).await?;
                Self::read_index(&target.dest).await?
            }
            Err(e) => return Err(e),
        };

        info!(
            "Asset index {} lists {} objects",
            info.id,
            index.objects.len()
        );
        Ok((index, outcome))
    }

    /// Parse an index file. A file that is not valid JSON is deleted so the
    /// next attempt downloads it again.
    async fn read_index(path: &Path) -> LauncherResult<AssetIndex> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        match serde_json::from_str(&raw) {
            Ok(index) => Ok(index),
            Err(e) => {
                tokio::fs::remove_file(path)
                    .await
                    .map_err(|e| LauncherError::io(path, e))?;
                Err(e.into())
            }
        }
    }

    /// One fetch target per distinct content hash:
    /// `<resources>/<hash[0:2]>/<hash>` → `assets/objects/<hash[0:2]>/<hash>`.
    pub fn object_targets(
        index: &AssetIndex,
        resources_url: &str,
        layout: &InstallLayout,
    ) -> LauncherResult<Vec<DownloadEntry>> {
        let base = resources_url.trim_end_matches('/');

        let mut by_hash: BTreeMap<&str, &AssetObject> = BTreeMap::new();
        for obj in index.objects.values() {
            by_hash.entry(obj.hash.as_str()).or_insert(obj);
        }

        let mut entries = Vec::with_capacity(by_hash.len());
        for (hash, obj) in by_hash {
            let shard = hash_shard(hash)?;
            let url = format!("{}/{}/{}", base, shard, hash);
            entries.push(
                DownloadEntry::new(url, layout.asset_object(hash)?)
                    .with_sha1(Some(hash.to_string()))
                    .with_size(Some(obj.size)),
            );
        }

        info!(
            "Resolved {} asset objects ({} logical names)",
            entries.len(),
            index.objects.len()
        );
        Ok(entries)
    }
}
