use std::path::{Component, Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

/// On-disk installation tree.
///
/// ```text
/// <root>/
///   libraries/<library path>
///   versions/<id>/<id>.jar
///   versions/<id>/<id>.json
///   assets/indexes/<index id>.json
///   assets/objects/<hash[0:2]>/<hash>
/// ```
#[derive(Debug, Clone)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn client_jar(&self, version_id: &str) -> PathBuf {
        self.versions_dir()
            .join(version_id)
            .join(format!("{}.jar", version_id))
    }

    pub fn version_json(&self, version_id: &str) -> PathBuf {
        self.versions_dir()
            .join(version_id)
            .join(format!("{}.json", version_id))
    }

    pub fn asset_index(&self, index_id: &str) -> PathBuf {
        self.assets_dir()
            .join("indexes")
            .join(format!("{}.json", index_id))
    }

    /// `assets/objects/<hash[0:2]>/<hash>`.
    pub fn asset_object(&self, hash: &str) -> LauncherResult<PathBuf> {
        let shard = hash_shard(hash)?;
        Ok(self.assets_dir().join("objects").join(shard).join(hash))
    }

    /// Library artifact path under `libraries/`.
    ///
    /// Only the normal segments of the manifest path are kept: a leading
    /// root or drive prefix is dropped and `..` never climbs above
    /// `libraries/`.
    pub fn library(&self, relative: &str) -> PathBuf {
        let mut path = self.libraries_dir();
        let mut depth = 0usize;
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::ParentDir if depth > 0 => {
                    path.pop();
                    depth -= 1;
                }
                _ => {}
            }
        }
        path
    }
}

/// First two characters of a lowercase hex digest.
pub fn hash_shard(hash: &str) -> LauncherResult<&str> {
    let valid = hash.len() >= 2
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !valid {
        return Err(LauncherError::InvalidHash(hash.to_string()));
    }
    Ok(&hash[..2])
}

/// Lexically clean a path: drop `.` segments, fold `..` into its parent and
/// collapse redundant separators. Does not touch the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
