use clap::Parser;
use forecast_etl::app::runner::{self, parse_failure_status};
use forecast_etl::utils::logger;
use forecast_etl::CliConfig;

#[tokio::main]
async fn main() {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) => match parse_failure_status(e.kind()) {
            Some(status) => {
                let _ = e.print();
                std::process::exit(status.code());
            }
            None => e.exit(),
        },
    };

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting forecast-etl");

    let handle = tokio::spawn(runner::run(config));
    let status = runner::wait_for_run(handle, tokio::signal::ctrl_c()).await;

    std::process::exit(status.code());
}
