use crate::config::{
    default_cities, DEFAULT_API_ENDPOINT, DEFAULT_FORECAST_DAYS, DEFAULT_OUTPUT_PATH,
    DEFAULT_PACING_DELAY_MS, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_provider, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
    pub source: SourceConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub publish: Option<PublishConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestConfig {
    pub forecast_days: Option<u32>,
    pub air_quality: Option<bool>,
    pub alerts: Option<bool>,
    pub pacing_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    pub enabled: bool,
    pub commit_prefix: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEATHER_API_KEY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        // 未替換的 ${VAR} 代表環境變數沒有設定
        if env_var_pattern().is_match(&self.source.api_key) {
            return Err(EtlError::MissingConfigError {
                field: format!("source.api_key ({})", self.source.api_key),
            });
        }
        validate_provider(self)
    }

    pub fn publish_enabled(&self) -> bool {
        self.publish.as_ref().map(|p| p.enabled).unwrap_or(false)
    }

    pub fn commit_prefix(&self) -> Option<&str> {
        self.publish
            .as_ref()
            .and_then(|p| p.commit_prefix.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn api_key(&self) -> &str {
        &self.source.api_key
    }

    fn cities(&self) -> &[String] {
        &self.cities
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn forecast_days(&self) -> u32 {
        self.request.forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.source
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn pacing_delay(&self) -> Duration {
        Duration::from_millis(
            self.request
                .pacing_delay_ms
                .unwrap_or(DEFAULT_PACING_DELAY_MS),
        )
    }

    fn include_air_quality(&self) -> bool {
        self.request.air_quality.unwrap_or(true)
    }

    fn include_alerts(&self) -> bool {
        self.request.alerts.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
