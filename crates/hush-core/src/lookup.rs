//! Discovery of previously-created silences.
//!
//! Deletion has no ids of its own: the alert-management service is the only
//! source of truth for which silences this tool created earlier. The lookup
//! lists a target's silences under that target's delivery policy and keeps
//! the non-expired ones written by the same author with the same comment,
//! optionally requiring an exact matcher set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delivery::DeliveryEngine;
use crate::error::{Result, SilenceError};
use crate::request;
use crate::types::{AcceptPolicy, Matcher, Target};

/// Selection criteria for silences eligible for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilenceQuery {
    /// Only silences created by this author.
    pub created_by: String,
    /// Only silences carrying this comment.
    pub comment: String,
    /// When set, only silences whose matcher set equals this one,
    /// order-insensitively.
    pub matchers: Option<Vec<Matcher>>,
}

/// A silence as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedSilence {
    id: String,
    status: ListedStatus,
    created_by: String,
    comment: String,
    #[serde(default)]
    matchers: Vec<Matcher>,
}

/// Lifecycle state wrapper in the list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListedStatus {
    state: String,
}

/// Finds non-expired silences on one target matching the query.
///
/// # Errors
///
/// Returns `SilenceError::Transport` when the list request fails in
/// transport, `SilenceError::UnacceptedStatus` when the endpoint answers
/// outside the 2xx family, and `SilenceError::Serialization` when the
/// response body is not a silence list. All are scoped to this target.
pub async fn find_silences(target: &Target, query: &SilenceQuery) -> Result<Vec<String>> {
    let descriptor = request::build_list(target);
    let engine = DeliveryEngine::new(AcceptPolicy::SuccessFamily);

    let (status, body) = engine.execute(&descriptor).await?;
    if !engine.accept().accepts(status) {
        return Err(SilenceError::UnacceptedStatus {
            url: descriptor.url,
            status,
        });
    }

    let silences: Vec<ListedSilence> = serde_json::from_str(&body)?;
    let wanted = query.matchers.as_deref().map(sorted);

    let ids = silences
        .into_iter()
        .filter(|silence| silence.status.state != "expired")
        .filter(|silence| silence.created_by == query.created_by)
        .filter(|silence| silence.comment == query.comment)
        .filter(|silence| {
            wanted
                .as_ref()
                .is_none_or(|matchers| sorted(&silence.matchers) == *matchers)
        })
        .map(|silence| {
            debug!(url = %target.url, silence_id = %silence.id, "found matching silence");
            silence.id
        })
        .collect();

    Ok(ids)
}

fn sorted(matchers: &[Matcher]) -> Vec<Matcher> {
    let mut matchers = matchers.to_vec();
    matchers.sort();
    matchers
}
