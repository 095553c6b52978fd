pub mod libraries;
pub mod manifest;
pub mod version_file;

pub use libraries::library_targets;
pub use manifest::{LatestVersions, VersionEntry, VersionManifest};
pub use version_file::{
    AssetIndexInfo, DownloadArtifact, LibDownloadArtifact, LibraryDownloads, LibraryEntry,
    VersionDownloads, VersionJson,
};
