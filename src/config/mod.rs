pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
mod args;

#[cfg(feature = "cli")]
pub use args::CliConfig;

pub const DEFAULT_API_ENDPOINT: &str = "http://api.weatherapi.com/v1/forecast.json";
pub const DEFAULT_OUTPUT_PATH: &str = "weather_data";
pub const DEFAULT_FORECAST_DAYS: u32 = 14;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_PACING_DELAY_MS: u64 = 1000;

/// 報表使用的九個城市
pub const DEFAULT_CITIES: [&str; 9] = [
    "Bengaluru",
    "Mumbai",
    "Mysuru",
    "New Delhi",
    "Mandya",
    "Madikeri",
    "Hassan",
    "Bhagamandala",
    "Ghaziabad",
];

pub fn default_cities() -> Vec<String> {
    DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()
}
