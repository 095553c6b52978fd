// ─── mcstart Core ───
// Resolve a release, materialize its files, compose the launch command.
//
// Architecture:
//   core/
//     config/     — Explicit run configuration + settings file
//     platform/   — Closed OS enum (separator, script flavor, classifiers)
//     layout/     — Installation tree paths + lexical path cleaning
//     version/    — Mojang manifest + version JSON + library targets
//     assets/     — Asset index + content-addressed object targets
//     downloader/ — Create-only, bounded-concurrency fetcher
//     launch/     — Classpath builder + launch command/script
//     pipeline/   — Ordered, fail-fast install stages

pub mod assets;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod layout;
pub mod pipeline;
pub mod platform;
pub mod version;
