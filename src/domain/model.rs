use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// 單一城市成功寫檔後的摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub location_name: String,
    pub current_temp_c: Option<f64>,
    pub forecast_days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Connection,
    Timeout,
    HttpStatus(Option<u16>),
    MalformedPayload,
    UnexpectedSchema,
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Connection => write!(f, "Connection Error"),
            FailureKind::Timeout => write!(f, "Timeout Error"),
            FailureKind::HttpStatus(Some(code)) => write!(f, "HTTP Error {}", code),
            FailureKind::HttpStatus(None) => write!(f, "HTTP Error"),
            FailureKind::MalformedPayload => write!(f, "JSON Parse Error"),
            FailureKind::UnexpectedSchema => write!(f, "Invalid Response Structure"),
            FailureKind::Unknown => write!(f, "Unexpected Error"),
        }
    }
}

/// 每個城市的處理結果，由 fetcher 產生、engine 彙整，不落地
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Success {
        city: String,
        saved_path: PathBuf,
        summary: ForecastSummary,
    },
    Failure {
        city: String,
        kind: FailureKind,
        detail: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            FetchResult::Failure { kind, .. } => Some(*kind),
            FetchResult::Success { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub results: Vec<FetchResult>,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub elapsed: Duration,
    pub output_dir: PathBuf,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.is_success() {
            ExitStatus::Success
        } else {
            ExitStatus::PartialFailure
        }
    }
}

/// 行程結束碼，排程器依此判斷結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    PartialFailure,
    Interrupted,
    Unhandled,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::PartialFailure => 1,
            ExitStatus::Interrupted => 2,
            ExitStatus::Unhandled => 3,
        }
    }
}
