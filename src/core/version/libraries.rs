// ─── Library Resolution ───
// Turns the flat library list into ordered fetch targets for one platform.

use tracing::{debug, info};

use crate::core::downloader::DownloadEntry;
use crate::core::layout::InstallLayout;
use crate::core::platform::Platform;

use super::version_file::{LibDownloadArtifact, LibraryEntry};

impl LibraryEntry {
    /// The platform-specific classifier artifact that applies, if any.
    ///
    /// A `natives` map decides the classifier key when present (with `${arch}`
    /// substituted); otherwise the conventional `natives-<os>` keys are tried.
    pub fn native_artifact(&self, platform: Platform) -> Option<&LibDownloadArtifact> {
        let classifiers = self.downloads.as_ref()?.classifiers.as_ref()?;

        if let Some(natives) = &self.natives {
            let key = natives.get(platform.mojang_name())?.replace("${arch}", arch_bits());
            return classifiers.get(&key);
        }

        platform
            .classifier_keys()
            .iter()
            .find_map(|key| classifiers.get(*key))
    }

    /// Default artifact first, then the platform variant when one applies.
    pub fn download_entries(&self, layout: &InstallLayout, platform: Platform) -> Vec<DownloadEntry> {
        let mut entries = Vec::with_capacity(2);

        if let Some(artifact) = self.downloads.as_ref().and_then(|d| d.artifact.as_ref()) {
            entries.push(to_entry(artifact, layout));
        }

        if let Some(native) = self.native_artifact(platform) {
            debug!("Native variant for {} on {}: {}", self.name, platform, native.path);
            entries.push(to_entry(native, layout));
        }

        entries
    }
}

/// Fetch targets for every library, in declaration order.
pub fn library_targets(
    libraries: &[LibraryEntry],
    layout: &InstallLayout,
    platform: Platform,
) -> Vec<DownloadEntry> {
    let targets: Vec<DownloadEntry> = libraries
        .iter()
        .flat_map(|lib| lib.download_entries(layout, platform))
        .collect();

    info!(
        "Resolved {} library targets from {} libraries for {}",
        targets.len(),
        libraries.len(),
        platform
    );
    targets
}

fn to_entry(artifact: &LibDownloadArtifact, layout: &InstallLayout) -> DownloadEntry {
    DownloadEntry::new(artifact.url.clone(), layout.library(&artifact.path))
        .with_sha1(artifact.sha1.clone())
        .with_size(artifact.size)
}

fn arch_bits() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "64"
    } else {
        "32"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lib(json: serde_json::Value) -> LibraryEntry {
        serde_json::from_value(json).unwrap()
    }

    fn plain() -> LibraryEntry {
        lib(serde_json::json!({
            "name": "com.x:lib:1.0",
            "downloads": { "artifact": { "path": "com/x/lib-1.0.jar", "url": "https://example/lib.jar" } }
        }))
    }

    fn with_variants() -> LibraryEntry {
        lib(serde_json::json!({
            "name": "org.lwjgl:lwjgl:3.2.2",
            "downloads": {
                "artifact": { "path": "org/lwjgl/lwjgl-3.2.2.jar", "url": "https://example/lwjgl.jar" },
                "classifiers": {
                    "natives-linux": { "path": "org/lwjgl/lwjgl-3.2.2-natives-linux.jar", "url": "https://example/l.jar" },
                    "natives-windows": { "path": "org/lwjgl/lwjgl-3.2.2-natives-windows.jar", "url": "https://example/w.jar" }
                }
            }
        }))
    }

    #[test]
    fn library_without_variants_yields_one_target() {
        let layout = InstallLayout::new("/mc");
        let entries = plain().download_entries(&layout, Platform::Linux);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].dest, PathBuf::from("/mc/libraries/com/x/lib-1.0.jar"));
        assert_eq!(entries[0].url, "https://example/lib.jar");
    }

    #[test]
    fn absolute_artifact_path_lands_under_install_root() {
        let entry = lib(serde_json::json!({
            "name": "com.x:lib:1.0",
            "downloads": { "artifact": { "path": "/com/x/lib-1.0.jar", "url": "https://example/lib.jar" } }
        }));
        let layout = InstallLayout::new("/mc");
        let entries = entry.download_entries(&layout, Platform::Linux);
        assert_eq!(entries[0].dest, PathBuf::from("/mc/libraries/com/x/lib-1.0.jar"));
    }

    #[test]
    fn covered_platform_yields_default_then_variant() {
        let layout = InstallLayout::new("/mc");
        let entries = with_variants().download_entries(&layout, Platform::Windows);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].dest.ends_with("org/lwjgl/lwjgl-3.2.2.jar"));
        assert!(entries[1]
            .dest
            .ends_with("org/lwjgl/lwjgl-3.2.2-natives-windows.jar"));
    }

    #[test]
    fn uncovered_platform_yields_default_only() {
        let layout = InstallLayout::new("/mc");
        let entries = with_variants().download_entries(&layout, Platform::MacOs);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn natives_map_selects_classifier_with_arch() {
        let entry = lib(serde_json::json!({
            "name": "tv.twitch:twitch-platform:5.16",
            "natives": { "windows": "natives-windows-${arch}", "osx": "natives-osx" },
            "downloads": {
                "classifiers": {
                    "natives-windows-32": { "path": "w32.jar", "url": "https://example/w32.jar" },
                    "natives-windows-64": { "path": "w64.jar", "url": "https://example/w64.jar" },
                    "natives-osx": { "path": "osx.jar", "url": "https://example/osx.jar" }
                }
            }
        }));

        let osx = entry.native_artifact(Platform::MacOs).unwrap();
        assert_eq!(osx.path, "osx.jar");

        let win = entry.native_artifact(Platform::Windows).unwrap();
        assert_eq!(win.path, format!("w{}.jar", arch_bits()));

        assert!(entry.native_artifact(Platform::Linux).is_none());
    }

    #[test]
    fn macos_falls_back_to_osx_classifier_key() {
        let entry = lib(serde_json::json!({
            "name": "a:b:1",
            "downloads": {
                "classifiers": { "natives-osx": { "path": "osx.jar", "url": "https://example/osx.jar" } }
            }
        }));
        let layout = InstallLayout::new("/mc");
        let entries = entry.download_entries(&layout, Platform::MacOs);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].dest.ends_with("osx.jar"));
    }

    #[test]
    fn targets_preserve_declaration_order() {
        let layout = InstallLayout::new("/mc");
        let targets = library_targets(&[with_variants(), plain()], &layout, Platform::Linux);
        let names: Vec<_> = targets
            .iter()
            .map(|t| t.dest.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "lwjgl-3.2.2.jar",
                "lwjgl-3.2.2-natives-linux.jar",
                "lib-1.0.jar"
            ]
        );
    }
}
