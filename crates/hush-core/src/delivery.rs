//! Request delivery against target endpoints.
//!
//! The engine sends each descriptor exactly once, honoring its TLS,
//! redirect, timeout, and credential policy, and classifies the result
//! against an acceptance policy. Failures are recorded per request; one
//! failing request never prevents the remaining requests from being
//! attempted.

use reqwest::redirect::Policy;
use tracing::{debug, info, warn};

use crate::error::{Result, SilenceError};
use crate::types::{AcceptPolicy, DeliveryOutcome, Method, RequestDescriptor};

/// Sends fully-specified requests and validates their responses.
#[derive(Debug, Clone, Default)]
pub struct DeliveryEngine {
    accept: AcceptPolicy,
}

impl DeliveryEngine {
    /// Creates an engine with the given acceptance policy.
    #[must_use]
    pub const fn new(accept: AcceptPolicy) -> Self {
        Self { accept }
    }

    /// Returns the acceptance policy.
    #[must_use]
    pub const fn accept(&self) -> &AcceptPolicy {
        &self.accept
    }

    /// Delivers each request once, sequentially, in input order.
    ///
    /// Always returns exactly one outcome per descriptor.
    pub async fn deliver(&self, descriptors: &[RequestDescriptor]) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            outcomes.push(self.deliver_one(descriptor).await);
        }
        outcomes
    }

    /// Delivers a single request and classifies the outcome.
    pub async fn deliver_one(&self, descriptor: &RequestDescriptor) -> DeliveryOutcome {
        match self.execute(descriptor).await {
            Ok((status, body)) => {
                if self.accept.accepts(status) {
                    info!(url = %descriptor.url, status, "request accepted");
                    DeliveryOutcome::success(&descriptor.url)
                        .with_status(status)
                        .with_body(body)
                } else {
                    warn!(url = %descriptor.url, status, "response status outside accepted set");
                    DeliveryOutcome::failure(
                        &descriptor.url,
                        format!("HTTP {status} outside accepted set"),
                    )
                    .with_status(status)
                    .with_body(body)
                }
            }
            Err(e) => {
                warn!(url = %descriptor.url, error = %e, "request failed in transport");
                DeliveryOutcome::failure(&descriptor.url, e.to_string())
            }
        }
    }

    /// Executes a request, returning the raw status code and body.
    ///
    /// # Errors
    ///
    /// Returns `SilenceError::Transport` when no HTTP response was received
    /// (DNS, connect, TLS, or timeout failure).
    pub(crate) async fn execute(&self, descriptor: &RequestDescriptor) -> Result<(u16, String)> {
        let client = build_client(descriptor)?;
        let method = match descriptor.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut request = client.request(method, &descriptor.url);
        for (name, value) in descriptor.headers.iter() {
            request = request.header(name, value);
        }
        if let Some(credentials) = &descriptor.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(body) = &descriptor.body {
            request = request.body(body.clone());
        }

        debug!(
            method = %descriptor.method,
            url = %descriptor.url,
            tls_verify = descriptor.tls_verify,
            follow_redirects = descriptor.follow_redirects,
            timeout_secs = descriptor.timeout.as_secs(),
            "sending request"
        );

        let response = request
            .send()
            .await
            .map_err(|e| transport(descriptor, &e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport(descriptor, &e))?;

        Ok((status, body))
    }
}

fn build_client(descriptor: &RequestDescriptor) -> Result<reqwest::Client> {
    let redirects = if descriptor.follow_redirects {
        Policy::limited(10)
    } else {
        Policy::none()
    };

    reqwest::Client::builder()
        .danger_accept_invalid_certs(!descriptor.tls_verify)
        .redirect(redirects)
        .timeout(descriptor.timeout)
        .build()
        .map_err(|e| SilenceError::Transport {
            url: descriptor.url.clone(),
            reason: format!("failed to build HTTP client: {e}"),
        })
}

fn transport(descriptor: &RequestDescriptor, err: &reqwest::Error) -> SilenceError {
    SilenceError::Transport {
        url: descriptor.url.clone(),
        reason: err.to_string(),
    }
}
