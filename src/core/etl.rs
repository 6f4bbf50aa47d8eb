use crate::core::fetcher::CityFetcher;
use crate::core::{ConfigProvider, FetchResult, Publisher, RunSummary, Storage};
use crate::utils::error::Result;
use std::time::Instant;

/// 依序處理所有城市，彙整成功與失敗
pub struct EtlEngine<S: Storage, C: ConfigProvider> {
    fetcher: CityFetcher<S, C>,
    publisher: Option<Box<dyn Publisher>>,
}

impl<S: Storage, C: ConfigProvider> EtlEngine<S, C> {
    pub fn new(fetcher: CityFetcher<S, C>) -> Self {
        Self {
            fetcher,
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Runs every configured city once.
    ///
    /// Per-city failures end up in the summary; only output directory setup
    /// can make this return `Err`.
    pub async fn run(&self) -> Result<RunSummary> {
        let storage = self.fetcher.storage();
        let config = self.fetcher.config();
        let cities = config.cities();
        let total = cities.len();

        storage.prepare().await?;
        tracing::info!("📁 Using output directory: {}", storage.root().display());

        let start = Instant::now();
        let mut results = Vec::with_capacity(total);
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for (index, city) in cities.iter().enumerate() {
            tracing::info!("[{}/{}] 🌤️  Fetching data for: {}", index + 1, total, city);

            let result = self.fetcher.fetch_city(city).await;
            log_result(&result);

            if result.is_success() {
                succeeded.push(city.clone());
            } else {
                failed.push(city.clone());
            }
            results.push(result);

            // 最後一個城市之後不等待
            if index + 1 < total && !config.pacing_delay().is_zero() {
                tokio::time::sleep(config.pacing_delay()).await;
            }
        }

        let summary = RunSummary {
            results,
            succeeded,
            failed,
            elapsed: start.elapsed(),
            output_dir: storage.root().to_path_buf(),
        };
        log_summary(&summary);

        if let Some(publisher) = &self.publisher {
            match publisher.publish(&summary.output_dir).await {
                Ok(()) => tracing::info!("🚀 Successfully uploaded weather data"),
                Err(e) => tracing::warn!("⚠️  Upload failed (optional): {}", e),
            }
        }

        Ok(summary)
    }
}

fn log_result(result: &FetchResult) {
    match result {
        FetchResult::Success {
            city,
            saved_path,
            summary,
        } => {
            let temp = summary
                .current_temp_c
                .map_or_else(|| "n/a".to_string(), |t| format!("{}°C", t));
            tracing::info!(
                "✅ SUCCESS: {} (location: {}, current temp: {}, forecast days: {}, saved as: {})",
                city,
                summary.location_name,
                temp,
                summary.forecast_days,
                saved_path.display()
            );
        }
        FetchResult::Failure { city, kind, detail } => {
            tracing::error!("❌ {} for {}: {}", kind, city, detail);
        }
    }
}

fn log_summary(summary: &RunSummary) {
    let total = summary.total();
    tracing::info!(
        "📊 Successful: {}/{} cities, Failed: {}/{} cities, Execution time: {:.2}s",
        summary.succeeded.len(),
        total,
        summary.failed.len(),
        total,
        summary.elapsed.as_secs_f64()
    );

    if !summary.succeeded.is_empty() {
        tracing::info!("🎉 Fetched: {}", summary.succeeded.join(", "));
    }

    if summary.failed.is_empty() {
        tracing::info!("🎉 All cities processed successfully");
    } else {
        tracing::warn!("⚠️  Failed: {}", summary.failed.join(", "));
        tracing::warn!("💡 Check your internet connection and API key validity");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FailureKind;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    const CITIES: [&str; 9] = [
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

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        root: PathBuf,
        fail_prepare: bool,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                root: PathBuf::from("test_output"),
                fail_prepare: false,
            }
        }

        async fn file_names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().await.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        fn root(&self) -> &Path {
            &self.root
        }

        async fn prepare(&self) -> Result<()> {
            if self.fail_prepare {
                return Err(EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only file system",
                )));
            }
            Ok(())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<PathBuf> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(self.root.join(path))
        }
    }

    struct MockConfig {
        api_endpoint: String,
        cities: Vec<String>,
        timeout: Duration,
        pacing_delay: Duration,
    }

    impl MockConfig {
        fn new(api_endpoint: String, cities: &[&str]) -> Self {
            Self {
                api_endpoint,
                cities: cities.iter().map(|c| c.to_string()).collect(),
                timeout: Duration::from_secs(5),
                pacing_delay: Duration::ZERO,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn api_key(&self) -> &str {
            "test-key"
        }

        fn cities(&self) -> &[String] {
            &self.cities
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn forecast_days(&self) -> u32 {
            14
        }

        fn request_timeout(&self) -> Duration {
            self.timeout
        }

        fn pacing_delay(&self) -> Duration {
            self.pacing_delay
        }
    }

    struct CountingPublisher {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Publisher for CountingPublisher {
        async fn publish(&self, output_dir: &Path) -> Result<()> {
            assert_eq!(output_dir, Path::new("test_output"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EtlError::PublishError {
                    message: "git push rejected".to_string(),
                });
            }
            Ok(())
        }
    }

    fn forecast_body(name: &str) -> serde_json::Value {
        json!({
            "location": {"name": name},
            "current": {"temp_c": 25.0},
            "forecast": {"forecastday": [
                {"date": "2025-07-18", "astro": {"sunrise": "06:00 AM", "sunset": "06:50 PM", "moonrise": "No moonrise", "moonset": "01:00 PM"}}
            ]}
        })
    }

    fn mock_city(server: &MockServer, city: &str, status: u16) {
        let body = forecast_body(city);
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/forecast.json")
                .query_param("q", city);
            then.status(status)
                .header("Content-Type", "application/json")
                .json_body(body);
        });
    }

    #[tokio::test]
    async fn test_nine_cities_with_fifth_failing() {
        let server = MockServer::start();
        for (index, city) in CITIES.iter().enumerate() {
            let status = if index == 4 { 503 } else { 200 };
            mock_city(&server, city, status);
        }

        let storage = MockStorage::new();
        let config = MockConfig::new(server.url("/v1/forecast.json"), &CITIES);
        let engine = EtlEngine::new(CityFetcher::new(storage.clone(), config).unwrap());

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.succeeded.len(), 8);
        assert_eq!(summary.failed, vec!["Mandya".to_string()]);
        assert_eq!(summary.results.len(), 9);
        assert_eq!(
            summary.results[4].failure_kind(),
            Some(FailureKind::HttpStatus(Some(503)))
        );
        assert!(!summary.is_success());
        assert_eq!(summary.exit_status().code(), 1);

        let names = storage.file_names().await;
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"New_Delhi_latest.json".to_string()));
        assert!(!names.contains(&"Mandya_latest.json".to_string()));
    }

    #[tokio::test]
    async fn test_timeout_does_not_stop_the_run() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/forecast.json")
                .query_param("q", "Mumbai");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(forecast_body("Mumbai"));
        });
        mock_city(&server, "Hassan", 200);

        let mut config = MockConfig::new(server.url("/v1/forecast.json"), &["Mumbai", "Hassan"]);
        config.timeout = Duration::from_millis(500);
        let engine = EtlEngine::new(CityFetcher::new(MockStorage::new(), config).unwrap());

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.results[0].failure_kind(), Some(FailureKind::Timeout));
        assert_eq!(summary.succeeded, vec!["Hassan".to_string()]);
        assert_eq!(summary.failed, vec!["Mumbai".to_string()]);
    }

    #[tokio::test]
    async fn test_all_cities_ok() {
        let server = MockServer::start();
        mock_city(&server, "Mysuru", 200);
        mock_city(&server, "Hassan", 200);

        let config = MockConfig::new(server.url("/v1/forecast.json"), &["Mysuru", "Hassan"]);
        let engine = EtlEngine::new(CityFetcher::new(MockStorage::new(), config).unwrap());

        let summary = engine.run().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.exit_status().code(), 0);
        assert_eq!(summary.succeeded, vec!["Mysuru".to_string(), "Hassan".to_string()]);
    }

    #[tokio::test]
    async fn test_pacing_delay_only_between_cities() {
        let server = MockServer::start();
        mock_city(&server, "Mysuru", 200);
        mock_city(&server, "Hassan", 200);

        let mut config = MockConfig::new(server.url("/v1/forecast.json"), &["Mysuru", "Hassan"]);
        config.pacing_delay = Duration::from_millis(300);
        let engine = EtlEngine::new(CityFetcher::new(MockStorage::new(), config).unwrap());

        let summary = engine.run().await.unwrap();

        // 兩個城市只等待一次
        assert!(summary.elapsed >= Duration::from_millis(300));
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_prepare_failure_is_an_error() {
        let mut storage = MockStorage::new();
        storage.fail_prepare = true;
        let config = MockConfig::new("http://127.0.0.1:1/".to_string(), &["Mysuru"]);
        let engine = EtlEngine::new(CityFetcher::new(storage, config).unwrap());

        let result = engine.run().await;

        assert!(matches!(result, Err(EtlError::IoError(_))));
    }

    #[tokio::test]
    async fn test_publisher_runs_after_fetching() {
        let server = MockServer::start();
        mock_city(&server, "Mysuru", 200);

        let calls = Arc::new(AtomicUsize::new(0));
        let config = MockConfig::new(server.url("/v1/forecast.json"), &["Mysuru"]);
        let engine = EtlEngine::new(CityFetcher::new(MockStorage::new(), config).unwrap())
            .with_publisher(Box::new(CountingPublisher {
                calls: calls.clone(),
                fail: false,
            }));

        let summary = engine.run().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publisher_failure_is_not_fatal() {
        let server = MockServer::start();
        mock_city(&server, "Mysuru", 200);

        let calls = Arc::new(AtomicUsize::new(0));
        let config = MockConfig::new(server.url("/v1/forecast.json"), &["Mysuru"]);
        let engine = EtlEngine::new(CityFetcher::new(MockStorage::new(), config).unwrap())
            .with_publisher(Box::new(CountingPublisher {
                calls: calls.clone(),
                fail: true,
            }));

        let summary = engine.run().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.exit_status().code(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
