pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::git::GitPublisher;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::EtlEngine,
    fetcher::{output_file_name, CityFetcher, FetchError},
    sanitize::{normalize_forecast, sanitize_astro},
    ExitStatus, FailureKind, FetchResult, ForecastSummary, RunSummary,
};
pub use utils::error::{EtlError, Result};
