use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::LaunchConfig;

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (JSON). Defaults to `<config dir>/mcstart/settings.json`
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[clap(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Download a version into the install dir and write a start script
    Install(InstallArgs),
    /// List release versions from the version manifest
    Versions {
        /// Include snapshots and old betas
        #[clap(long)]
        all: bool,
    },
}

/// Flags override values from the settings file.
#[derive(Debug, Args, Clone, Default)]
pub struct InstallArgs {
    /// Folder where the game should be installed
    #[clap(long)]
    pub path: Option<PathBuf>,
    /// Player name passed to the game
    #[clap(long)]
    pub username: Option<String>,
    /// Version id, `latest` or `latest-snapshot`
    #[clap(long)]
    pub version: Option<String>,
    /// Access token passed to the game
    #[clap(long)]
    pub token: Option<String>,
    /// Initial JVM heap in megabytes
    #[clap(long = "init-memory")]
    pub init_memory: Option<u32>,
    /// Maximum JVM heap in megabytes
    #[clap(long = "max-memory")]
    pub max_memory: Option<u32>,
    /// Parallel downloads per stage (1 = sequential)
    #[clap(long, short = 'j')]
    pub jobs: Option<usize>,
    /// Per-request timeout in seconds
    #[clap(long)]
    pub timeout: Option<u64>,
    /// Re-fetch files whose SHA-1 does not match the manifest
    #[clap(long)]
    pub verify: bool,
    /// Lay files out for another OS (linux, windows, macos)
    #[clap(long)]
    pub platform: Option<String>,
    /// Where to write the start script
    #[clap(long = "script-dir")]
    pub script_dir: Option<PathBuf>,
    /// Write the effective settings back to the settings file
    #[clap(long)]
    pub save: bool,
}

impl InstallArgs {
    pub fn apply(self, mut config: LaunchConfig) -> LaunchConfig {
        if let Some(path) = self.path {
            config.install_dir = path;
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(version) = self.version {
            config.version = version;
        }
        if let Some(token) = self.token {
            config.access_token = token;
        }
        if let Some(mb) = self.init_memory {
            config.initial_heap_mb = mb;
        }
        if let Some(mb) = self.max_memory {
            config.max_heap_mb = mb;
        }
        if let Some(jobs) = self.jobs {
            config.concurrency = jobs;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if self.verify {
            config.verify_hashes = true;
        }
        if let Some(platform) = self.platform {
            config.platform = Some(platform);
        }
        if let Some(dir) = self.script_dir {
            config.script_dir = dir;
        }
        config
    }
}
