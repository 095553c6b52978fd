// ─── Platform ───
// Closed set of operating systems the launcher can lay out files for.

use std::fmt;

use crate::core::error::{LauncherError, LauncherResult};

/// Supported platforms — strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Platform {
    /// Parse an OS tag. Accepts the Rust/Go/Mojang spellings for macOS.
    pub fn from_tag(tag: &str) -> LauncherResult<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "macos" | "osx" | "darwin" => Ok(Platform::MacOs),
            _ => Err(LauncherError::UnsupportedPlatform(tag.to_string())),
        }
    }

    /// The platform this binary is running on.
    pub fn current() -> LauncherResult<Self> {
        Self::from_tag(std::env::consts::OS)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
        }
    }

    /// OS name as it appears in Mojang `natives` maps and rules.
    pub fn mojang_name(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOs => "osx",
        }
    }

    /// Java classpath separator.
    pub fn classpath_separator(self) -> &'static str {
        match self {
            Platform::Linux | Platform::MacOs => ":",
            Platform::Windows => ";",
        }
    }

    pub fn script_file_name(self) -> &'static str {
        match self {
            Platform::Linux | Platform::MacOs => "start.sh",
            Platform::Windows => "start.bat",
        }
    }

    pub fn script_header(self) -> &'static str {
        match self {
            Platform::Linux | Platform::MacOs => "#!/bin/sh",
            Platform::Windows => "@echo off",
        }
    }

    pub fn line_ending(self) -> &'static str {
        match self {
            Platform::Linux | Platform::MacOs => "\n",
            Platform::Windows => "\r\n",
        }
    }

    /// Fallback classifier keys tried when a library has no `natives` map.
    pub fn classifier_keys(self) -> &'static [&'static str] {
        match self {
            Platform::Linux => &["natives-linux"],
            Platform::Windows => &["natives-windows"],
            Platform::MacOs => &["natives-macos", "natives-osx"],
        }
    }
}
