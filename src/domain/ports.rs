use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// 輸出目錄的位置
    fn root(&self) -> &Path;
    /// 建立輸出目錄 (已存在則略過)
    fn prepare(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 覆寫整個檔案，回傳完整路徑
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> &str;
    fn cities(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn forecast_days(&self) -> u32;
    fn request_timeout(&self) -> Duration;
    fn pacing_delay(&self) -> Duration;

    fn include_air_quality(&self) -> bool {
        true
    }

    fn include_alerts(&self) -> bool {
        false
    }
}

/// 執行結束後上傳輸出目錄 (例如 git push)，失敗不影響結果
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, output_dir: &Path) -> Result<()>;
}
