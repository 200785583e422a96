use tracing::{debug, info, warn};

use super::client::{ApiClient, ResponseMode};
use super::retry::RetryPolicy;
use crate::cancel::CancelSignal;
use crate::endpoint::{Endpoint, EndpointGroup};
use crate::error::{ApiError, RequestOutcome};

/// Drives [`ApiClient`] across an endpoint group.
///
/// Endpoints of one group are tried strictly one after another, never
/// concurrently; the first success wins.
#[derive(Debug, Clone, Default)]
pub struct FallbackOrchestrator {
    client: ApiClient,
}

impl FallbackOrchestrator {
    /// Tries every endpoint of `group` in fallback order with flat-text responses.
    pub async fn translate(
        &self,
        group: &EndpointGroup,
        text: &str,
        cancel: &CancelSignal,
    ) -> RequestOutcome {
        self.translate_with_mode(group, text, ResponseMode::Text, cancel)
            .await
    }

    /// Fallback loop with an explicit response mode.
    ///
    /// Returns the first success, `Cancelled` as soon as cancellation is seen,
    /// or the error of the last endpoint tried.
    pub async fn translate_with_mode(
        &self,
        group: &EndpointGroup,
        text: &str,
        mode: ResponseMode,
        cancel: &CancelSignal,
    ) -> RequestOutcome {
        let order: Vec<&Endpoint> = group.fallback_order().collect();
        let Some(last_index) = order.len().checked_sub(1) else {
            warn!("No valid endpoints configured");
            return Err(ApiError::NoEndpoints);
        };

        let mut last_error = None;

        for (index, endpoint) in order.iter().enumerate() {
            debug!(
                endpoint = %endpoint.name,
                attempt = index + 1,
                of = order.len(),
                "Calling endpoint"
            );

            match self.client.call(endpoint, text, mode, cancel).await {
                Ok(payload) => {
                    if index > 0 {
                        info!(endpoint = %endpoint.name, "Fallback endpoint succeeded");
                    }
                    return Ok(payload);
                }
                Err(ApiError::Cancelled) => {
                    info!(endpoint = %endpoint.name, "Request cancelled");
                    return Err(ApiError::Cancelled);
                }
                Err(err) if index == last_index => {
                    warn!(endpoint = %endpoint.name, error = %err, "All endpoints failed");
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        endpoint = %endpoint.name,
                        error = %err,
                        "Endpoint failed, trying next"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::NoEndpoints))
    }

    /// Calls one endpoint up to `policy.max_attempts()` times.
    ///
    /// Waits `retry_delay * attempt` between attempts. Cancellation, including
    /// during a wait, aborts immediately.
    pub async fn retry_single(
        &self,
        endpoint: &Endpoint,
        text: &str,
        mode: ResponseMode,
        policy: RetryPolicy,
        cancel: &CancelSignal,
    ) -> RequestOutcome {
        if !endpoint.has_url() {
            return Err(ApiError::NoEndpoints);
        }

        let max_attempts = policy.max_attempts();
        let mut attempt = 1;

        loop {
            match self.client.call(endpoint, text, mode, cancel).await {
                Ok(payload) => return Ok(payload),
                Err(ApiError::Cancelled) => return Err(ApiError::Cancelled),
                Err(err) if attempt >= max_attempts => {
                    warn!(
                        endpoint = %endpoint.name,
                        attempts = attempt,
                        error = %err,
                        "All retry attempts exhausted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = policy.delay_after(attempt);
                    warn!(
                        endpoint = %endpoint.name,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );

                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(ApiError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Picks the strategy for a group: a single usable endpoint gets the
    /// retry helper, several get the fallback loop.
    pub async fn dispatch(
        &self,
        group: &EndpointGroup,
        text: &str,
        mode: ResponseMode,
        policy: RetryPolicy,
        cancel: &CancelSignal,
    ) -> RequestOutcome {
        let mut order = group.fallback_order();
        match (order.next(), order.next()) {
            (Some(only), None) => {
                self.retry_single(only, text, mode, policy, cancel)
                    .await
            }
            _ => self.translate_with_mode(group, text, mode, cancel).await,
        }
    }
}
