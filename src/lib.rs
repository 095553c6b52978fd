pub mod cli;
pub mod core;

pub use crate::core::config::LaunchConfig;
pub use crate::core::error::{ErrorKind, LauncherError, LauncherResult, Stage};
pub use crate::core::pipeline::{install, run, InstallReport};
pub use crate::core::platform::Platform;
