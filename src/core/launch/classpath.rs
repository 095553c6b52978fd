// ─── Classpath Builder ───
// Constructs the classpath string for launching Minecraft.

use std::path::Path;

use tracing::debug;

use crate::core::layout::clean_path;
use crate::core::platform::Platform;

/// Builds the full classpath string for launching the game.
///
/// Every library path is cleaned and joined with the platform separator
/// (`;` on Windows, `:` elsewhere). The client JAR always comes last.
/// Library order is kept as given; when two JARs provide the same class the
/// JVM picks the first one.
pub fn build_classpath<'a, I>(platform: Platform, libraries: I, client_jar: &Path) -> String
where
    I: IntoIterator<Item = &'a Path>,
{
    let separator = platform.classpath_separator();

    let mut entries: Vec<String> = libraries
        .into_iter()
        .map(path_str)
        .collect();
    entries.push(path_str(client_jar));

    debug!("Classpath has {} entries", entries.len());
    entries.join(separator)
}

fn path_str(path: &Path) -> String {
    clean_path(path).to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(unix)]
    #[test]
    fn unix_like_platforms_use_colon() {
        let libs = [
            PathBuf::from("/mc/libraries/a.jar"),
            PathBuf::from("/mc/libraries/b.jar"),
        ];
        let client = PathBuf::from("/mc/versions/1.16.1/1.16.1.jar");

        for platform in [Platform::Linux, Platform::MacOs] {
            let cp = build_classpath(platform, libs.iter().map(PathBuf::as_path), &client);
            assert_eq!(
                cp,
                "/mc/libraries/a.jar:/mc/libraries/b.jar:/mc/versions/1.16.1/1.16.1.jar"
            );
        }
    }

    #[test]
    fn windows_uses_semicolon() {
        let libs = [PathBuf::from("a.jar"), PathBuf::from("b.jar")];
        let cp = build_classpath(
            Platform::Windows,
            libs.iter().map(PathBuf::as_path),
            Path::new("client.jar"),
        );
        assert_eq!(cp, "a.jar;b.jar;client.jar");
    }

    #[test]
    fn client_alone_has_no_separator() {
        let cp = build_classpath(Platform::Linux, std::iter::empty(), Path::new("/mc/client.jar"));
        assert_eq!(cp, "/mc/client.jar");
    }

    #[cfg(unix)]
    #[test]
    fn entries_are_normalized() {
        let libs = [PathBuf::from("temp/./libraries//com/x/../y/lib.jar")];
        let cp = build_classpath(
            Platform::Linux,
            libs.iter().map(PathBuf::as_path),
            Path::new("temp/versions/1.16.1/./1.16.1.jar"),
        );
        assert_eq!(
            cp,
            "temp/libraries/com/y/lib.jar:temp/versions/1.16.1/1.16.1.jar"
        );
        assert!(cp.ends_with("1.16.1.jar"));
        assert!(!cp.ends_with(':'));
    }
}
