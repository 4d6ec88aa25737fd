use std::sync::Arc;
use std::time::Duration;

use crate::config::WebhookConfig;

use super::client::WebhookTransport;
use super::domain::Application;
use super::interpret::{interpret, SubmissionResult};
use super::transport::{build_request, FileEncoding, WebhookTarget};

pub const DEFAULT_SIMULATION_DELAY: Duration = Duration::from_millis(1000);

/// Submission boundary: picks the encoding, sends once and interprets the reply.
///
/// Callers are expected to have validated the application already. Every failure is
/// folded into a [`SubmissionResult`]; nothing escapes as an error.
pub struct SubmissionService<T> {
    transport: Arc<T>,
    target: Option<WebhookTarget>,
    encoding: FileEncoding,
    simulation_delay: Duration,
}

impl<T> SubmissionService<T>
where
    T: WebhookTransport,
{
    pub fn new(transport: Arc<T>, target: Option<WebhookTarget>, encoding: FileEncoding) -> Self {
        if target.is_none() {
            tracing::warn!("webhook URL is not configured; submissions will be simulated");
        }

        Self {
            transport,
            target,
            encoding,
            simulation_delay: DEFAULT_SIMULATION_DELAY,
        }
    }

    pub fn from_config(config: &WebhookConfig, transport: Arc<T>) -> Self {
        Self::new(transport, config.target(), config.file_encoding)
            .with_simulation_delay(config.simulation_delay)
    }

    pub fn with_simulation_delay(mut self, delay: Duration) -> Self {
        self.simulation_delay = delay;
        self
    }

    pub fn is_simulated(&self) -> bool {
        self.target.is_none()
    }

    pub fn encoding(&self) -> FileEncoding {
        self.encoding
    }

    pub async fn submit(&self, application: &Application) -> SubmissionResult {
        let kind = application.kind();
        let Some(target) = &self.target else {
            tracing::info!(
                %kind,
                delay_ms = self.simulation_delay.as_millis() as u64,
                "simulating submission"
            );
            tokio::time::sleep(self.simulation_delay).await;
            tracing::debug!(%kind, ?application, "simulated submission payload");
            return SubmissionResult::simulated();
        };

        tracing::info!(
            %kind,
            url = %target.url,
            auth = target.auth.is_some(),
            encoding = %self.encoding,
            "submitting application to webhook"
        );

        let request = match build_request(application, target, self.encoding) {
            Ok(request) => request,
            Err(err) => {
                tracing::error!(%kind, error = %err, "could not build webhook request");
                return SubmissionResult::unknown(err);
            }
        };

        let result = interpret(self.transport.send(request).await);
        if result.success {
            tracing::info!(%kind, status = ?result.status, "submission delivered");
        } else {
            tracing::warn!(
                %kind,
                outcome = ?result.kind,
                status = ?result.status,
                "submission failed"
            );
        }
        result
    }
}
