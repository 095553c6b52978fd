// ─── Install Pipeline ───
// manifest → version JSON → libraries → client → asset index → assets →
// classpath → launch command. Every stage is fail-fast.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::assets::AssetManager;
use crate::core::config::LaunchConfig;
use crate::core::downloader::{DownloadEntry, Downloader, FetchStats};
use crate::core::error::{LauncherError, LauncherResult, Stage, StageContext};
use crate::core::http::build_http_client;
use crate::core::launch::{build_classpath, LaunchCommand, LaunchParams};
use crate::core::layout::{clean_path, InstallLayout};
use crate::core::platform::Platform;
use crate::core::version::{library_targets, VersionJson, VersionManifest};

/// Outcome of a successful install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub version_id: String,
    pub platform: Platform,
    pub install_dir: PathBuf,
    pub classpath: String,
    pub command: LaunchCommand,
    pub stats: FetchStats,
}

/// Resolve `config.version`, materialize every file it needs under
/// `config.install_dir`, and compose the launch command.
///
/// Safe to re-run: files already on disk are not fetched again.
pub async fn install(config: &LaunchConfig) -> LauncherResult<InstallReport> {
    config.validate()?;
    let platform = config.resolve_platform()?;

    let root = absolute_root(&config.install_dir)?;
    let layout = InstallLayout::new(&root);

    let client = build_http_client(config.timeout())?;
    let downloader = Downloader::new(client)
        .with_concurrency(config.concurrency)
        .with_verification(config.verify_hashes);

    info!(
        "Installing {} into {:?} for {}",
        config.version, root, platform
    );

    // 1. Resolve the version entry
    let manifest = VersionManifest::fetch(downloader.client(), &config.version_manifest_url)
        .await
        .stage(Stage::Manifest)?;
    let entry = manifest
        .find_version(&config.version)
        .stage(Stage::Manifest)?;

    // 2. Fetch and save version JSON
    let version_id = entry.id.clone();
    let version_json = fetch_version_json(&downloader, &entry.url, &version_id, &layout)
        .await
        .stage(Stage::Version)?;

    let mut stats = FetchStats::default();

    // 3. Libraries (default artifacts plus platform variants)
    let libraries = library_targets(&version_json.libraries, &layout, platform);
    stats.merge(
        downloader
            .download_batch(libraries.clone())
            .await
            .stage(Stage::Libraries)?,
    );

    // 4. Client JAR
    let client_jar = layout.client_jar(&version_id);
    let client_entry = match version_json.client_download() {
        Some(dl) => DownloadEntry::new(dl.url.clone(), &client_jar)
            .with_sha1(dl.sha1.clone())
            .with_size(dl.size),
        None => DownloadEntry::new("", &client_jar),
    };
    stats.record(
        downloader
            .download_file(&client_entry)
            .await
            .stage(Stage::Client)?,
    );

    // 5. Asset index document
    let (asset_index, outcome) =
        AssetManager::load_index(&version_json.asset_index, &layout, &downloader)
            .await
            .stage(Stage::AssetIndex)?;
    stats.record(outcome);

    // 6. Asset objects
    let objects = AssetManager::object_targets(&asset_index, &config.resources_url, &layout)
        .stage(Stage::Assets)?;
    stats.merge(
        downloader
            .download_batch(objects)
            .await
            .stage(Stage::Assets)?,
    );

    // 7. Classpath + command
    let classpath = build_classpath(
        platform,
        libraries.iter().map(|t| t.dest.as_path()),
        &client_jar,
    );
    let assets_dir = layout.assets_dir();
    let command = LaunchCommand::compose(&LaunchParams {
        classpath: &classpath,
        main_class: &version_json.main_class,
        game_dir: layout.root(),
        assets_dir: &assets_dir,
        asset_index_id: &version_json.asset_index.id,
        version_id: &version_id,
        username: &config.username,
        access_token: &config.access_token,
        initial_heap_mb: config.initial_heap_mb,
        max_heap_mb: config.max_heap_mb,
    });

    info!(
        "Version {} ready: {} downloaded, {} already present",
        version_id, stats.downloaded, stats.skipped
    );

    Ok(InstallReport {
        version_id,
        platform,
        install_dir: root,
        classpath,
        command,
        stats,
    })
}

/// `install` followed by writing the start script into `config.script_dir`.
pub async fn run(config: &LaunchConfig) -> LauncherResult<(InstallReport, PathBuf)> {
    let report = install(config).await?;
    let script = report
        .command
        .write_script(&config.script_dir, report.platform)
        .stage(Stage::LaunchScript)?;
    Ok((report, script))
}

async fn fetch_version_json(
    downloader: &Downloader,
    url: &str,
    version_id: &str,
    layout: &InstallLayout,
) -> LauncherResult<VersionJson> {
    let (version_json, raw_json) = VersionJson::fetch(downloader.client(), url).await?;
    version_json.ensure_id(version_id)?;
    VersionJson::save_to(&raw_json, &layout.version_json(version_id)).await?;
    Ok(version_json)
}

fn absolute_root(dir: &Path) -> LauncherResult<PathBuf> {
    if dir.is_absolute() {
        return Ok(clean_path(dir));
    }
    let cwd = std::env::current_dir().map_err(|e| LauncherError::io(".", e))?;
    Ok(clean_path(&cwd.join(dir)))
}
