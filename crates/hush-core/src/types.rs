//! Core types for silence construction and delivery.
//!
//! This module provides the fundamental types used throughout the hush-core
//! crate:
//! - [`Action`]: The operation to perform against the configured targets
//! - [`Matcher`]: A label condition a silence applies to
//! - [`Headers`]: A case-insensitive header map
//! - [`AcceptPolicy`]: Which response status codes count as success
//! - [`Target`]: One destination URL plus its delivery policy
//! - [`RequestDescriptor`]: A fully-specified request, ready for delivery
//! - [`DeliveryOutcome`]: The result of delivering one request

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SilenceError};

/// The operation to perform against the configured targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Open a new suppression window on every target.
    Create,
    /// Expire previously-created silences on every target.
    Delete,
}

impl Action {
    /// Returns the action as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = SilenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            other => Err(SilenceError::InvalidConfig {
                reason: format!("unsupported action '{other}'"),
            }),
        }
    }
}

/// A label condition a silence applies to.
///
/// Serializes to the wire form the alert-management API expects:
/// `{"isRegex": .., "name": .., "value": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    /// Whether the value is a regular expression.
    pub is_regex: bool,
    /// The label name to match.
    pub name: String,
    /// The label value (or pattern) to match.
    pub value: String,
}

impl Matcher {
    /// Creates an equality matcher.
    #[must_use]
    pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_regex: false,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a regex matcher.
    #[must_use]
    pub fn regex(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_regex: true,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl FromStr for Matcher {
    type Err = SilenceError;

    /// Parses `name=value` as an equality matcher and `name=~value` as a
    /// regex matcher.
    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = s.split_once('=').ok_or_else(|| SilenceError::InvalidConfig {
            reason: format!("matcher '{s}' is not in 'name=value' form"),
        })?;
        if name.is_empty() {
            return Err(SilenceError::InvalidConfig {
                reason: format!("matcher '{s}' has an empty label name"),
            });
        }
        match value.strip_prefix('~') {
            Some(pattern) => Ok(Self::regex(name, pattern)),
            None => Ok(Self::equals(name, value)),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.is_regex { "=~" } else { "=" };
        write!(f, "{}{}{}", self.name, op, self.value)
    }
}

/// Basic-auth credentials sent with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// The username.
    pub username: String,
    /// The password.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A header map with case-insensitive names; later writes win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any existing value under the same name
    /// regardless of case.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Inserts a header, builder-style.
    #[must_use]
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Merges another header map over this one; the other map's values win.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    /// Looks a header up by name, case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Iterates over the headers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no headers are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which response status codes count as success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptPolicy {
    /// Any status in the 2xx family is accepted.
    SuccessFamily,
    /// Only the listed status codes are accepted.
    Explicit(BTreeSet<u16>),
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self::SuccessFamily
    }
}

impl AcceptPolicy {
    /// Builds a policy from an explicit code list; an empty list means the
    /// default 2xx-family policy.
    #[must_use]
    pub fn from_codes(codes: &[u16]) -> Self {
        if codes.is_empty() {
            Self::SuccessFamily
        } else {
            Self::Explicit(codes.iter().copied().collect())
        }
    }

    /// Checks whether a status code is accepted under this policy.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::SuccessFamily => (200..300).contains(&status),
            Self::Explicit(codes) => codes.contains(&status),
        }
    }
}

/// One destination URL plus its delivery policy.
///
/// Targets are independent: the policy of one never leaks into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Base URL of the alert-management service.
    pub url: String,
    /// Extra headers merged over the base set.
    pub headers: Headers,
    /// Optional basic-auth credentials.
    pub credentials: Option<Credentials>,
    /// Whether to verify TLS certificates.
    pub tls_verify: bool,
    /// Whether to follow 3xx redirects.
    pub follow_redirects: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Target {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a target with the default policy: verify TLS, follow
    /// redirects, 60 second timeout, no extra headers or credentials.
    ///
    /// # Errors
    ///
    /// Returns `SilenceError::InvalidConfig` if the URL does not parse.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        url::Url::parse(&url).map_err(|e| SilenceError::InvalidConfig {
            reason: format!("invalid target URL '{url}': {e}"),
        })?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            headers: Headers::new(),
            credentials: None,
            tls_verify: true,
            follow_redirects: true,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Replaces the extra headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Adds one extra header.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets whether TLS certificates are verified.
    #[must_use]
    pub const fn tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Sets whether 3xx redirects are followed.
    #[must_use]
    pub const fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP method of a request descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Retrieve a resource.
    Get,
    /// Submit a resource.
    Post,
    /// Remove a resource.
    Delete,
}

impl Method {
    /// Returns the method as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully-specified request, ready for delivery.
///
/// Descriptors carry their own copy of the originating target's policy, so
/// delivering one never consults shared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,
    /// The fully-resolved URL.
    pub url: String,
    /// Headers to send, base set already merged.
    pub headers: Headers,
    /// The request body, if any.
    pub body: Option<String>,
    /// Optional basic-auth credentials.
    pub credentials: Option<Credentials>,
    /// Whether to verify TLS certificates.
    pub tls_verify: bool,
    /// Whether to follow 3xx redirects.
    pub follow_redirects: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// The result of delivering one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// The URL the request was sent to.
    pub url: String,
    /// Whether the response was accepted.
    pub succeeded: bool,
    /// The observed status code; absent on transport failure.
    pub status: Option<u16>,
    /// The response body, when a response was received.
    pub body: Option<String>,
    /// Failure description or informational detail.
    pub detail: Option<String>,
}

impl DeliveryOutcome {
    /// Creates a succeeded outcome.
    #[must_use]
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            succeeded: true,
            status: None,
            body: None,
            detail: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failure(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            succeeded: false,
            status: None,
            body: None,
            detail: Some(detail.into()),
        }
    }

    /// Sets the observed status code.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
