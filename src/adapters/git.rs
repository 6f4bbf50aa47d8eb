use crate::core::Publisher;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

const DEFAULT_COMMIT_PREFIX: &str = "Weather data update";

/// 將輸出目錄 add / commit / push 到 git 遠端
#[derive(Debug, Clone)]
pub struct GitPublisher {
    program: String,
    commit_prefix: String,
}

impl GitPublisher {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            commit_prefix: DEFAULT_COMMIT_PREFIX.to_string(),
        }
    }

    pub fn with_commit_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.commit_prefix = prefix.into();
        self
    }

    /// 測試時可換成其他執行檔
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn commit_message(&self, now: chrono::DateTime<chrono::Local>) -> String {
        format!("{} - {}", self.commit_prefix, now.format("%Y-%m-%d %H:%M"))
    }

    async fn git(&self, output_dir: &Path, args: &[&str]) -> Result<()> {
        tracing::debug!("Running {} {} in {}", self.program, args.join(" "), output_dir.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(output_dir)
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(EtlError::PublishError {
                message: format!(
                    "`{} {}` exited with {}: {}",
                    self.program,
                    args.first().copied().unwrap_or_default(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}

impl Default for GitPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for GitPublisher {
    async fn publish(&self, output_dir: &Path) -> Result<()> {
        let message = self.commit_message(chrono::Local::now());

        self.git(output_dir, &["add", "."]).await?;
        self.git(output_dir, &["commit", "-m", &message]).await?;
        self.git(output_dir, &["push"]).await?;

        Ok(())
    }
}
