use crate::core::sanitize::normalize_forecast;
use crate::core::{ConfigProvider, FailureKind, FetchResult, ForecastSummary, Storage};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Sections every forecast document must carry before it is normalized.
pub const REQUIRED_SECTIONS: [&str; 3] = ["location", "current", "forecast"];

const OUTPUT_SUFFIX: &str = "_latest.json";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("{}", http_status_message(.code, .detail))]
    HttpStatus { code: Option<u16>, detail: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unexpected schema: missing '{0}' section")]
    UnexpectedSchema(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

fn http_status_message(code: &Option<u16>, detail: &str) -> String {
    match code {
        Some(code) => format!("HTTP status {}: {}", code, detail),
        None => format!("HTTP status error: {}", detail),
    }
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Connection(_) => FailureKind::Connection,
            FetchError::Timeout(_) => FailureKind::Timeout,
            FetchError::HttpStatus { code, .. } => FailureKind::HttpStatus(*code),
            FetchError::MalformedPayload(_) => FailureKind::MalformedPayload,
            FetchError::UnexpectedSchema(_) => FailureKind::UnexpectedSchema,
            FetchError::Unknown(_) => FailureKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // timeout 要先判斷，連線逾時同時也是 connect error
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_status() {
            FetchError::HttpStatus {
                code: e.status().map(|s| s.as_u16()),
                detail: e.to_string(),
            }
        } else if e.is_decode() || e.is_body() {
            FetchError::MalformedPayload(e.to_string())
        } else {
            FetchError::Unknown(e.to_string())
        }
    }
}

impl From<EtlError> for FetchError {
    fn from(e: EtlError) -> Self {
        FetchError::Unknown(e.to_string())
    }
}

/// 將城市名稱轉成固定檔名，每次執行覆寫同一個檔案
pub fn output_file_name(city: &str) -> String {
    let safe: String = city
        .chars()
        .map(|c| match c {
            ' ' | '-' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{}{}", safe, OUTPUT_SUFFIX)
}

/// Checks the three top-level sections; the error names the first one missing.
pub fn validate_document(document: &Value) -> std::result::Result<(), FetchError> {
    let Some(object) = document.as_object() else {
        return Err(FetchError::UnexpectedSchema("location".to_string()));
    };

    match REQUIRED_SECTIONS.iter().find(|s| !object.contains_key(**s)) {
        Some(missing) => Err(FetchError::UnexpectedSchema(missing.to_string())),
        None => Ok(()),
    }
}

pub fn summarize(city: &str, document: &Value) -> ForecastSummary {
    ForecastSummary {
        location_name: document["location"]["name"]
            .as_str()
            .unwrap_or(city)
            .to_string(),
        current_temp_c: document["current"]["temp_c"].as_f64(),
        forecast_days: document["forecast"]["forecastday"]
            .as_array()
            .map_or(0, Vec::len),
    }
}

/// 處理單一城市：下載、檢查、清理、寫檔
pub struct CityFetcher<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> CityFetcher<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Fetches, normalizes and stores one city. Never returns an error:
    /// every failure is classified into [`FetchResult::Failure`].
    pub async fn fetch_city(&self, city: &str) -> FetchResult {
        match self.try_fetch(city).await {
            Ok((saved_path, summary)) => FetchResult::Success {
                city: city.to_string(),
                saved_path,
                summary,
            },
            Err(e) => FetchResult::Failure {
                city: city.to_string(),
                kind: e.kind(),
                detail: e.to_string(),
            },
        }
    }

    async fn try_fetch(
        &self,
        city: &str,
    ) -> std::result::Result<(PathBuf, ForecastSummary), FetchError> {
        let document = self.request_forecast(city).await?;
        validate_document(&document)?;

        let document = normalize_forecast(document);
        let summary = summarize(city, &document);

        let file_name = output_file_name(city);
        let body = serde_json::to_vec_pretty(&document)
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        tracing::debug!("Writing {} ({} bytes)", file_name, body.len());
        let saved_path = self.storage.write_file(&file_name, &body).await?;

        Ok((saved_path, summary))
    }

    async fn request_forecast(&self, city: &str) -> std::result::Result<Value, FetchError> {
        let days = self.config.forecast_days().to_string();
        let params = [
            ("key", self.config.api_key()),
            ("q", city),
            ("days", days.as_str()),
            ("aqi", yes_no(self.config.include_air_quality())),
            ("alerts", yes_no(self.config.include_alerts())),
        ];

        tracing::debug!("Making API request to: {} (q={})", self.config.api_endpoint(), city);
        let response = self
            .client
            .get(self.config.api_endpoint())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: Some(status.as_u16()),
                detail: provider_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            });
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// weatherapi 的錯誤格式: {"error": {"code": 1006, "message": "..."}}
fn provider_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value["error"]["message"].as_str().map(str::to_string)
}
