pub mod client;

pub use client::{part_path, DownloadEntry, Downloader, FetchOutcome, FetchStats};
