pub mod etl;
pub mod fetcher;
pub mod sanitize;

pub use crate::domain::model::{
    ExitStatus, FailureKind, FetchResult, ForecastSummary, RunSummary,
};
pub use crate::domain::ports::{ConfigProvider, Publisher, Storage};
pub use crate::utils::error::Result;
