// ─── Launch Command ───
// Assembles the java invocation and renders it as a start script.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::clean_path;
use crate::core::platform::Platform;

const JAVA_BIN: &str = "java";

/// Run-time values substituted into the game arguments.
#[derive(Debug, Clone)]
pub struct LaunchParams<'a> {
    pub classpath: &'a str,
    pub main_class: &'a str,
    pub game_dir: &'a Path,
    pub assets_dir: &'a Path,
    pub asset_index_id: &'a str,
    pub version_id: &'a str,
    pub username: &'a str,
    pub access_token: &'a str,
    pub initial_heap_mb: u32,
    pub max_heap_mb: u32,
}

/// Program plus argument vector, ready to be rendered or spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Values are passed through as given; only the shape is fixed.
    pub fn compose(params: &LaunchParams<'_>) -> Self {
        let args = vec![
            format!("-Xms{}m", params.initial_heap_mb),
            format!("-Xmx{}m", params.max_heap_mb),
            "-cp".to_string(),
            params.classpath.to_string(),
            params.main_class.to_string(),
            "--username".to_string(),
            params.username.to_string(),
            "--gameDir".to_string(),
            path_str(params.game_dir),
            "--assetIndex".to_string(),
            params.asset_index_id.to_string(),
            "--assetsDir".to_string(),
            path_str(params.assets_dir),
            "--accessToken".to_string(),
            params.access_token.to_string(),
            "--version".to_string(),
            params.version_id.to_string(),
        ];

        Self {
            program: JAVA_BIN.to_string(),
            args,
        }
    }

    /// Render a start script: interpreter line (or batch header) followed by
    /// a single invocation line.
    pub fn render_script(&self, platform: Platform) -> String {
        let eol = platform.line_ending();
        let line = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|arg| quote_arg(arg, platform))
            .collect::<Vec<_>>()
            .join(" ");

        format!("{}{eol}{}{eol}", platform.script_header(), line, eol = eol)
    }

    /// Write `start.sh` / `start.bat` into `dir` and return its path.
    pub fn write_script(&self, dir: &Path, platform: Platform) -> LauncherResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| LauncherError::io(dir, e))?;

        let path = dir.join(platform.script_file_name());
        std::fs::write(&path, self.render_script(platform))
            .map_err(|e| LauncherError::io(&path, e))?;
        make_executable(&path)?;

        info!("Wrote launch script {:?}", path);
        debug!("Command (copy/paste): {}", self);
        Ok(path)
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> LauncherResult<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| LauncherError::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> LauncherResult<()> {
    Ok(())
}

fn path_str(path: &Path) -> String {
    clean_path(path).to_string_lossy().to_string()
}

fn quote_arg(raw: &str, platform: Platform) -> String {
    let is_safe = !raw.is_empty()
        && raw.chars().all(|ch| {
            ch.is_ascii_alphanumeric()
                || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=' | '+' | ',' | '@')
        });
    if is_safe {
        return raw.to_string();
    }

    match platform {
        Platform::Linux | Platform::MacOs => format!("'{}'", raw.replace('\'', r"'\''")),
        Platform::Windows => format!("\"{}\"", raw.replace('"', "\"\"").replace('%', "%%")),
    }
}
