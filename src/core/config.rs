use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::Platform;

const APP_DIR_NAME: &str = "mcstart";
const SETTINGS_FILE: &str = "settings.json";

pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";
pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Everything one pipeline run needs. Passed explicitly, never global.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    /// Installation root (`libraries/`, `versions/`, `assets/` live here).
    pub install_dir: PathBuf,
    pub username: String,
    /// Version id to resolve, or `latest` / `latest-snapshot`.
    pub version: String,
    pub access_token: String,
    pub initial_heap_mb: u32,
    pub max_heap_mb: u32,

    pub version_manifest_url: String,
    pub resources_url: String,
    /// Parallel fetches per stage. `1` downloads strictly in order.
    pub concurrency: usize,
    pub timeout_secs: u64,
    /// Hash existing files and re-fetch on mismatch instead of trusting existence.
    pub verify_hashes: bool,
    /// Override the detected OS (`linux`, `windows`, `macos`).
    pub platform: Option<String>,
    /// Directory the launch script is written to.
    pub script_dir: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("temp"),
            username: "playername".into(),
            version: "1.16.1".into(),
            access_token: "youracctoken".into(),
            initial_heap_mb: 512,
            max_heap_mb: 2048,
            version_manifest_url: VERSION_MANIFEST_URL.into(),
            resources_url: RESOURCES_URL.into(),
            concurrency: 8,
            timeout_secs: 60,
            verify_hashes: false,
            platform: None,
            script_dir: PathBuf::from("."),
        }
    }
}

impl LaunchConfig {
    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(LauncherError::io(path, e)),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| LauncherError::io(path, e))
    }

    /// `<config dir>/mcstart/settings.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(SETTINGS_FILE)
    }

    pub fn validate(&self) -> LauncherResult<()> {
        if self.version.trim().is_empty() {
            return Err(LauncherError::Config("version id is empty".into()));
        }
        if self.install_dir.as_os_str().is_empty() {
            return Err(LauncherError::Config("install dir is empty".into()));
        }
        if self.concurrency == 0 {
            return Err(LauncherError::Config("concurrency must be at least 1".into()));
        }
        if self.initial_heap_mb > self.max_heap_mb {
            return Err(LauncherError::Config(format!(
                "initial heap {}M exceeds maximum heap {}M",
                self.initial_heap_mb, self.max_heap_mb
            )));
        }
        Ok(())
    }

    pub fn resolve_platform(&self) -> LauncherResult<Platform> {
        match &self.platform {
            Some(tag) => Platform::from_tag(tag),
            None => Platform::current(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
