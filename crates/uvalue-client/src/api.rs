//! Typed API client over the calculation backend

use crate::readiness::{LivenessProbe, ProbeTarget};
use crate::retry::RetryPolicy;
use crate::transport::Transport;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use uvalue_core::config::LayeredConfig;
use uvalue_core::error::{Result, UvalueError};
use uvalue_core::models::{
    AssemblyType, CalculationRequest, CalculationResult, FilmCoefficients, MaterialEntry,
    SaveDesignRequest, SavedDesign, SavedDesignRef,
};
use uvalue_core::ports::EnvelopeService;

/// Per-operation retry policies and timeouts
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub read_policy: RetryPolicy,
    pub read_timeout: Duration,
    pub calculate_policy: RetryPolicy,
    pub calculate_timeout: Duration,
    pub films_timeout: Duration,
    pub save_timeout: Duration,
    pub load_timeout: Duration,
}

impl ClientSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        let read_timeout = config.read_timeout();
        Self {
            read_policy: RetryPolicy::idempotent_read(
                config.read_attempts.value,
                Duration::from_millis(config.read_backoff_ms.value),
                config.backoff_growth.value,
            ),
            read_timeout,
            calculate_policy: RetryPolicy::network_only(
                config.calculate_attempts.value,
                Duration::from_millis(config.calculate_backoff_ms.value),
            ),
            calculate_timeout: config.calculate_timeout(),
            films_timeout: read_timeout,
            save_timeout: read_timeout,
            load_timeout: read_timeout,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::with_defaults())
    }
}

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    cities: Vec<String>,
}

/// HTTP client for the thermal calculation service
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
    settings: ClientSettings,
}

impl ApiClient {
    pub fn new(api_base: impl Into<String>, settings: ClientSettings) -> Result<Self> {
        Ok(Self { transport: Transport::new(api_base)?, settings })
    }

    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(config.api_base(), ClientSettings::from_config(config))
    }

    pub fn api_base(&self) -> &str {
        self.transport.base()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn fetch_films(&self, city: &str, assembly: AssemblyType) -> Result<FilmCoefficients> {
        let mut url = self.transport.parsed_url("films")?;
        url.query_pairs_mut()
            .append_pair("city", city)
            .append_pair("assembly", assembly.as_str());

        self.transport
            .fetch_json(self.transport.get_url(url), self.settings.films_timeout)
            .await
    }
}

#[async_trait]
impl EnvelopeService for ApiClient {
    async fn materials(&self) -> Result<Vec<MaterialEntry>> {
        let timeout = self.settings.read_timeout;
        let materials: Vec<MaterialEntry> = self
            .settings
            .read_policy
            .run("fetch materials", |_| {
                self.transport.fetch_json(self.transport.get("materials"), timeout)
            })
            .await?;

        tracing::debug!("Fetched {} materials", materials.len());
        Ok(materials)
    }

    async fn cities(&self) -> Result<Vec<String>> {
        let timeout = self.settings.read_timeout;
        let response: CitiesResponse = self
            .settings
            .read_policy
            .run("fetch cities", |_| {
                self.transport.fetch_json(self.transport.get("cities"), timeout)
            })
            .await?;

        tracing::debug!("Fetched {} cities", response.cities.len());
        Ok(response.cities)
    }

    async fn films(&self, city: &str, assembly: AssemblyType) -> FilmCoefficients {
        if city.trim().is_empty() {
            return FilmCoefficients::default();
        }

        match self.fetch_films(city, assembly).await {
            Ok(films) => films,
            Err(e) => {
                tracing::warn!(
                    "Film coefficients unavailable for {} / {}: {}",
                    city,
                    assembly.as_str(),
                    e
                );
                FilmCoefficients::default()
            }
        }
    }

    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        let timeout = self.settings.calculate_timeout;
        let body = self
            .settings
            .calculate_policy
            .run("calculate", |_| {
                self.transport.fetch_text(self.transport.post_json("calculate", request), timeout)
            })
            .await?;

        CalculationResult::from_json(&body)
    }

    async fn save_design(&self, request: &SaveDesignRequest) -> Result<SavedDesignRef> {
        let saved: SavedDesignRef = self
            .transport
            .fetch_json(
                self.transport.post_json("save-design", request),
                self.settings.save_timeout,
            )
            .await?;

        tracing::info!("Design saved as {}", saved.public_id);
        Ok(saved)
    }

    async fn load_design(&self, public_id: &str) -> Result<Option<SavedDesign>> {
        let mut url = self.transport.parsed_url("design")?;
        url.path_segments_mut()
            .map_err(|_| UvalueError::ConfigInvalid {
                key: "api_base".to_string(),
                reason: format!("'{}' cannot carry path segments", self.transport.base()),
            })?
            .push(public_id);

        let result = self
            .transport
            .fetch_json::<SavedDesign>(self.transport.get_url(url), self.settings.load_timeout)
            .await;

        match result {
            Ok(design) => {
                design.result.validate()?;
                Ok(Some(design))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("Saved design {} not found", public_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl LivenessProbe for ApiClient {
    async fn probe(&self, target: ProbeTarget, timeout: Duration) -> bool {
        match self.transport.check(target.path(), timeout).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", target.path(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvalue_core::config::ConfigSource;

    #[test]
    fn test_settings_follow_config() {
        let mut config = LayeredConfig::with_defaults();
        config.read_attempts.update(4, ConfigSource::Cli);
        config.calculate_timeout_ms.update(45_000, ConfigSource::Cli);

        let settings = ClientSettings::from_config(&config);

        assert_eq!(settings.read_policy.max_attempts, 4);
        assert_eq!(settings.read_policy.base_delay, Duration::from_millis(1500));
        assert_eq!(settings.calculate_policy.max_attempts, 3);
        assert_eq!(settings.calculate_policy.growth, 1.0);
        assert_eq!(settings.calculate_timeout, Duration::from_secs(45));
        assert_eq!(settings.read_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_client_uses_trimmed_base() {
        let client =
            ApiClient::new("http://localhost:8000/api/", ClientSettings::default()).unwrap();
        assert_eq!(client.api_base(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_films_skip_request_without_city() {
        // Unroutable base: any request would fail, but none should be made
        let client = ApiClient::new("http://127.0.0.1:9/api", ClientSettings::default()).unwrap();
        let films = client.films("  ", AssemblyType::Wall).await;
        assert_eq!(films, FilmCoefficients::default());
    }
}
