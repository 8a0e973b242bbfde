use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::models::AnalyticsEvent;
use crate::config::AnalyticsConfig;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("collector returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request to collector failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Destination for analytics events
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: &AnalyticsEvent) -> Result<(), DeliveryError>;
}

/// Sends events to a Measurement Protocol collector
pub struct MeasurementProtocolSink {
    client: Client,
    endpoint: Url,
}

impl MeasurementProtocolSink {
    pub fn new(
        endpoint: &str,
        measurement_id: &str,
        api_secret: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("signpost/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let endpoint = Url::parse_with_params(
            endpoint,
            &[("measurement_id", measurement_id), ("api_secret", api_secret)],
        )?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl EventSink for MeasurementProtocolSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&event.payload())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status { status, body });
        }

        Ok(())
    }
}

/// Fire-and-forget front for an optional [`EventSink`]
#[derive(Clone)]
pub struct AnalyticsReporter {
    sink: Option<Arc<dyn EventSink>>,
}

impl AnalyticsReporter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Build a Measurement Protocol reporter, or a disabled one when credentials are missing.
    pub fn from_config(config: &AnalyticsConfig) -> anyhow::Result<Self> {
        let Some((measurement_id, api_secret)) = config.credentials() else {
            warn!("GA_MEASUREMENT_ID or GA_API_SECRET is not set. Analytics events will not be sent.");
            warn!(
                "GA_MEASUREMENT_ID: {}, GA_API_SECRET: {}",
                if config.measurement_id.is_some() { "Set" } else { "Not Set" },
                if config.api_secret.is_some() { "Set" } else { "Not Set" },
            );
            return Ok(Self::disabled());
        };

        let sink = MeasurementProtocolSink::new(
            &config.endpoint,
            measurement_id,
            api_secret,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(endpoint = %config.endpoint, "📈 Analytics reporting enabled");
        Ok(Self::new(Arc::new(sink)))
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Deliver the event in a background task.
    ///
    /// Returns immediately. Delivery failures are logged inside the task and
    /// never reach the caller. `None` when reporting is disabled.
    pub fn report(&self, event: AnalyticsEvent) -> Option<JoinHandle<()>> {
        let sink = Arc::clone(self.sink.as_ref()?);

        Some(tokio::spawn(async move {
            match sink.send(&event).await {
                Ok(()) => info!(
                    event = event.name,
                    client_id = %event.client_id,
                    "analytics event sent"
                ),
                Err(err) => error!(
                    event = event.name,
                    client_id = %event.client_id,
                    error = %err,
                    "failed to send analytics event"
                ),
            }
        }))
    }
}
