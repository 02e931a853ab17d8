//! End-to-end orchestration of silence actions.
//!
//! The manager walks the pipeline for one invocation: render the payload
//! (create only), build one request per target, deliver, and hand the
//! outcomes back for reporting. Template and configuration failures abort
//! before any request leaves the process; per-target failures are data in
//! the outcomes, not control flow.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{info, warn};

use crate::delivery::DeliveryEngine;
use crate::error::{Result, SilenceError};
use crate::lookup::{self, SilenceQuery};
use crate::request::{self, BuildAction};
use crate::template::{self, TemplateContext, TemplateSelector};
use crate::types::{AcceptPolicy, Action, DeliveryOutcome, Matcher, Target};

/// Everything one invocation needs to run.
#[derive(Debug, Clone)]
pub struct SilenceConfig {
    /// Destination endpoints with their delivery policies.
    pub targets: Vec<Target>,
    /// Template selection for the create payload.
    pub template: TemplateSelector,
    /// Silence duration in seconds; required for create.
    pub duration_secs: Option<u64>,
    /// Matchers the silence applies to.
    pub matchers: Vec<Matcher>,
    /// Restrict deletion to silences with exactly this matcher set.
    pub strict_match: bool,
    /// Response acceptance policy.
    pub accept: AcceptPolicy,
    /// Author recorded in the silence document.
    pub created_by: String,
    /// Free-text comment recorded in the silence document.
    pub comment: String,
    /// Environment snapshot for custom template interpolation, captured at
    /// invocation start.
    pub env: BTreeMap<String, String>,
}

/// Orchestrates render, build, and deliver for one invocation.
#[derive(Debug)]
pub struct SilenceManager {
    config: SilenceConfig,
    engine: DeliveryEngine,
}

impl SilenceManager {
    /// Creates a manager for one invocation.
    ///
    /// # Errors
    ///
    /// Returns `SilenceError::InvalidConfig` when no targets are configured.
    pub fn new(config: SilenceConfig) -> Result<Self> {
        if config.targets.is_empty() {
            return Err(SilenceError::InvalidConfig {
                reason: "at least one target URL is required".to_string(),
            });
        }

        let engine = DeliveryEngine::new(config.accept.clone());
        Ok(Self { config, engine })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SilenceConfig {
        &self.config
    }

    /// Runs the configured action against every target.
    ///
    /// # Errors
    ///
    /// Template and configuration failures abort before any delivery
    /// attempt. Transport and status failures never surface here; they are
    /// recorded in the returned outcomes.
    pub async fn run(&self, action: Action) -> Result<Vec<DeliveryOutcome>> {
        info!(action = %action, targets = self.config.targets.len(), "running silence action");
        match action {
            Action::Create => self.create().await,
            Action::Delete => self.delete().await,
        }
    }

    async fn create(&self) -> Result<Vec<DeliveryOutcome>> {
        let duration = self
            .config
            .duration_secs
            .filter(|secs| *secs > 0)
            .ok_or_else(|| SilenceError::InvalidConfig {
                reason: "a positive duration is required to create a silence".to_string(),
            })?;

        let mut context = TemplateContext::new(
            Utc::now(),
            duration,
            &self.config.created_by,
            &self.config.comment,
            &self.config.matchers,
        )?;
        if self.config.template.is_custom() {
            context = context.with_env(self.config.env.clone());
        }
        let body = template::render(&self.config.template, &context)?;

        let descriptors = request::build(BuildAction::Create { body: &body }, &self.config.targets);
        let outcomes = self.engine.deliver(&descriptors).await;

        for outcome in &outcomes {
            if outcome.succeeded {
                if let Some(id) = outcome.body.as_deref().and_then(silence_id_from_response) {
                    info!(url = %outcome.url, silence_id = %id, "silence created");
                }
            }
        }

        Ok(outcomes)
    }

    async fn delete(&self) -> Result<Vec<DeliveryOutcome>> {
        let query = SilenceQuery {
            created_by: self.config.created_by.clone(),
            comment: self.config.comment.clone(),
            matchers: self
                .config
                .strict_match
                .then(|| self.config.matchers.clone()),
        };

        let mut outcomes = Vec::new();
        for target in &self.config.targets {
            match lookup::find_silences(target, &query).await {
                Ok(ids) if ids.is_empty() => {
                    warn!(url = %target.url, "no matching silences, possibly already expired");
                    outcomes.push(
                        DeliveryOutcome::success(&target.url).with_detail("no matching silences"),
                    );
                }
                Ok(ids) => {
                    for id in ids {
                        info!(url = %target.url, silence_id = %id, "deleting silence");
                        let descriptors = request::build(
                            BuildAction::Delete { silence_id: &id },
                            std::slice::from_ref(target),
                        );
                        outcomes.extend(self.engine.deliver(&descriptors).await);
                    }
                }
                Err(e) => {
                    warn!(url = %target.url, error = %e, "silence lookup failed");
                    outcomes.push(DeliveryOutcome::failure(&target.url, e.to_string()));
                }
            }
        }

        Ok(outcomes)
    }
}

/// Extracts the assigned silence id from a create response body.
fn silence_id_from_response(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("silenceID")?
        .as_str()
        .map(ToString::to_string)
}
