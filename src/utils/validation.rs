use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        // 不回傳原值，這個欄位可能是 API key
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_cities(field_name: &str, cities: &[String]) -> Result<()> {
    if cities.is_empty() {
        return Err(EtlError::ConfigValidationError {
            field: field_name.to_string(),
            message: "At least one city is required".to_string(),
        });
    }

    if let Some(blank) = cities.iter().find(|c| c.trim().is_empty()) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: blank.clone(),
            reason: "City name cannot be blank".to_string(),
        });
    }

    // 城市名稱會變成輸出檔名，不能跳出輸出目錄
    if let Some(unsafe_name) = cities
        .iter()
        .find(|c| c.contains(['/', '\\']) || c.trim() == "..")
    {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: unsafe_name.clone(),
            reason: "City name cannot contain path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 所有 `ConfigProvider` 共用的檢查
pub fn validate_provider<C: crate::core::ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("api_endpoint", config.api_endpoint())?;
    validate_non_empty_string("api_key", config.api_key())?;
    validate_cities("cities", config.cities())?;
    validate_path("output_path", config.output_path())?;
    validate_range("forecast_days", config.forecast_days(), 1, 14)?;
    validate_range(
        "timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        u64::MAX,
    )?;
    Ok(())
}
