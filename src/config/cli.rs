use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    fn root(&self) -> &Path {
        &self.base_path
    }

    async fn prepare(&self) -> Result<()> {
        if self.base_path.is_dir() {
            tracing::debug!("Output directory exists: {}", self.base_path.display());
        } else {
            fs::create_dir_all(&self.base_path)?;
            tracing::info!("📁 Created directory: {}", self.base_path.display());
        }
        Ok(())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 整個覆寫，不保留舊版本
        fs::write(&full_path, data)?;
        Ok(full_path)
    }
}
