use crate::config::{
    default_cities, DEFAULT_API_ENDPOINT, DEFAULT_FORECAST_DAYS, DEFAULT_OUTPUT_PATH,
    DEFAULT_PACING_DELAY_MS, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "forecast-etl")]
#[command(about = "Fetch 14-day forecasts with air quality for a list of cities")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, env = "WEATHER_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = default_cities()
    )]
    pub cities: Vec<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
    pub forecast_days: u32,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = DEFAULT_PACING_DELAY_MS)]
    pub pacing_delay_ms: u64,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Commit and push the output directory with git after the run")]
    pub publish: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn cities(&self) -> &[String] {
        &self.cities
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn forecast_days(&self) -> u32 {
        self.forecast_days
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["forecast-etl", "--api-key", "abc123"]);

        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.cities.len(), 9);
        assert_eq!(config.cities[3], "New Delhi");
        assert_eq!(config.forecast_days(), 14);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.pacing_delay(), Duration::from_secs(1));
        assert!(config.include_air_quality());
        assert!(!config.include_alerts());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_city_list_flag() {
        let config = CliConfig::parse_from([
            "forecast-etl",
            "--api-key",
            "abc123",
            "--cities",
            "Rio-Branco,New Delhi",
        ]);

        assert_eq!(config.cities, vec!["Rio-Branco", "New Delhi"]);
    }

    #[test]
    fn test_forecast_days_out_of_range() {
        let config = CliConfig::parse_from([
            "forecast-etl",
            "--api-key",
            "abc123",
            "--forecast-days",
            "30",
        ]);

        assert!(config.validate().is_err());
    }
}
