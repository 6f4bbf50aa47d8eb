use crate::core::{ConfigProvider, ExitStatus, RunSummary};
use crate::utils::error::EtlError;
use crate::utils::logger::mask_secret;
use crate::utils::validation::Validate;
use crate::{CityFetcher, EtlEngine, GitPublisher, LocalStorage, TomlConfig};
use std::future::Future;
use tokio::task::{JoinError, JoinHandle};

#[cfg(feature = "cli")]
use crate::config::CliConfig;

/// 命令列解析失敗時的結束碼；`None` 代表交給 clap 處理 (help / version)
#[cfg(feature = "cli")]
pub fn parse_failure_status(kind: clap::error::ErrorKind) -> Option<ExitStatus> {
    use clap::error::ErrorKind;

    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => Some(ExitStatus::Unhandled),
    }
}

#[cfg(feature = "cli")]
pub async fn run(cli: CliConfig) -> ExitStatus {
    match cli.config.clone() {
        Some(path) => run_with_toml(&path, cli.publish).await,
        None => {
            let publisher = cli.publish.then(GitPublisher::new);
            execute(cli, publisher).await
        }
    }
}

/// 讀取 TOML 設定後執行；`force_publish` 對應命令列的 `--publish`
pub async fn run_with_toml(path: &str, force_publish: bool) -> ExitStatus {
    tracing::info!("📁 Loading configuration from: {}", path);
    let config = match TomlConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            return ExitStatus::Unhandled;
        }
    };

    let publisher = (force_publish || config.publish_enabled()).then(|| {
        let publisher = GitPublisher::new();
        match config.commit_prefix() {
            Some(prefix) => publisher.with_commit_prefix(prefix),
            None => publisher,
        }
    });

    execute(config, publisher).await
}

/// Validates the configuration, runs every city and maps the outcome to an
/// exit status. Errors outside the per-city handling become `Unhandled`.
pub async fn execute<C>(config: C, publisher: Option<GitPublisher>) -> ExitStatus
where
    C: ConfigProvider + Validate + 'static,
{
    if let Err(e) = config.validate() {
        report_error(&e);
        return ExitStatus::Unhandled;
    }

    tracing::info!(
        "🌤️  {} cities, {} forecast days, AQI: {}, API key: {}",
        config.cities().len(),
        config.forecast_days(),
        if config.include_air_quality() { "yes" } else { "no" },
        mask_secret(config.api_key())
    );

    let storage = LocalStorage::new(config.output_path());
    let fetcher = match CityFetcher::new(storage, config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            report_error(&e);
            return ExitStatus::Unhandled;
        }
    };

    let mut engine = EtlEngine::new(fetcher);
    if let Some(publisher) = publisher {
        engine = engine.with_publisher(Box::new(publisher));
    }

    match engine.run().await {
        Ok(summary) => {
            print_summary(&summary);
            summary.exit_status()
        }
        Err(e) => {
            report_error(&e);
            ExitStatus::Unhandled
        }
    }
}

/// 等待執行結束或中斷訊號。無法註冊訊號時只記錄警告，繼續等待執行結果。
pub async fn wait_for_run<F>(mut handle: JoinHandle<ExitStatus>, interrupt: F) -> ExitStatus
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        joined = &mut handle => joined_status(joined),
        signal = interrupt => match signal {
            Ok(()) => {
                handle.abort();
                tracing::warn!("⚠️  Interrupted by user");
                eprintln!("\n⚠️  Interrupted by user");
                ExitStatus::Interrupted
            }
            Err(e) => {
                tracing::warn!("⚠️  Could not listen for Ctrl-C, running without it: {}", e);
                joined_status((&mut handle).await)
            }
        },
    }
}

fn joined_status(joined: std::result::Result<ExitStatus, JoinError>) -> ExitStatus {
    match joined {
        Ok(status) => status,
        Err(e) => {
            tracing::error!("💥 Unexpected error: {}", e);
            eprintln!("💥 Unexpected error: {}", e);
            ExitStatus::Unhandled
        }
    }
}

fn report_error(e: &EtlError) {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn print_summary(summary: &RunSummary) {
    let total = summary.total();
    println!("✅ Successful: {}/{} cities", summary.succeeded.len(), total);
    println!("❌ Failed: {}/{} cities", summary.failed.len(), total);
    println!("⏱️  Execution Time: {:.2} seconds", summary.elapsed.as_secs_f64());
    println!("📁 Data Directory: {}", summary.output_dir.display());

    for city in &summary.succeeded {
        println!("   ✓ {}", city);
    }
    for city in &summary.failed {
        println!("   ✗ {}", city);
    }
}
