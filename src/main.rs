use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mcstart::cli::{Cli, Command};
use mcstart::core::config::LaunchConfig;
use mcstart::core::http::build_http_client;
use mcstart::core::version::VersionManifest;
use mcstart::LauncherResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize structured logging
    let default_filter = if cli.quiet { "warn" } else { "info,mcstart=debug" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let started = Instant::now();
    let result = execute(cli).await;

    match result {
        Ok(()) => {
            info!("Done in {:.2}s", started.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = ?e.kind(), retryable = e.is_retryable(), "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> LauncherResult<()> {
    let config_path = cli.config.unwrap_or_else(LaunchConfig::default_path);
    let config = LaunchConfig::load(&config_path)?;

    match cli.command {
        Command::Install(args) => {
            let save = args.save;
            let config = args.apply(config);
            if save {
                config.save(&config_path)?;
                info!("Saved settings to {:?}", config_path);
            }
            let (report, script) = mcstart::run(&config).await?;
            info!(
                "Version {} installed at {:?}; start with {:?}",
                report.version_id, report.install_dir, script
            );
        }
        Command::Versions { all } => {
            let client = build_http_client(config.timeout())?;
            let manifest = VersionManifest::fetch(&client, &config.version_manifest_url).await?;
            let entries: Vec<_> = if all {
                manifest.versions.iter().collect()
            } else {
                manifest.releases()
            };
            for entry in entries {
                println!("{}\t{}\t{}", entry.id, entry.version_type, entry.release_time);
            }
        }
    }

    Ok(())
}
