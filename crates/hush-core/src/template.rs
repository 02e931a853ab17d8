//! Template resolution and rendering for silence payloads.
//!
//! A template is plain text with `{{NAME}}` placeholders. Rendering
//! substitutes each placeholder from a [`TemplateContext`] built once per
//! invocation: built-in templates fail on undefined variables, while
//! user-supplied templates render them as empty strings. Rendering is a pure
//! function of its inputs; the context never reads live process state.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Result, SilenceError};
use crate::types::Matcher;

/// Name of the built-in default template.
pub const DEFAULT_TEMPLATE_NAME: &str = "default";

/// The built-in silence document, in the alert-management API's wire schema.
const DEFAULT_TEMPLATE: &str = r#"{
  "id": "",
  "createdBy": "{{SILENCE_CREATED_BY}}",
  "startsAt": "{{SILENCE_STARTS_AT}}",
  "endsAt": "{{SILENCE_ENDS_AT}}",
  "comment": "{{SILENCE_COMMENT}}",
  "matchers": {{SILENCE_MATCHERS}}
}
"#;

/// Which template text to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelector {
    /// A template shipped with hush, selected by name.
    Builtin(String),
    /// User-supplied inline template text.
    Custom(String),
}

impl TemplateSelector {
    /// Picks the effective template: non-empty custom text wins over a named
    /// built-in, and no selection at all falls back to the default built-in.
    #[must_use]
    pub fn resolve(name: Option<&str>, custom: Option<&str>) -> Self {
        match custom {
            Some(text) if !text.trim().is_empty() => Self::Custom(text.to_string()),
            _ => Self::Builtin(name.unwrap_or(DEFAULT_TEMPLATE_NAME).to_string()),
        }
    }

    /// Returns true for user-supplied template text.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// A finished request body produced by template rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody(String);

impl RenderedBody {
    /// Returns the body as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the body, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Variables available to placeholder substitution.
///
/// Immutable once built. Always carries the silence timestamps, author,
/// comment, and serialized matcher list; an environment snapshot can be
/// merged in for custom templates via [`TemplateContext::with_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Builds the context for one invocation.
    ///
    /// `SILENCE_STARTS_AT` is `starts_at`, `SILENCE_ENDS_AT` is `starts_at`
    /// plus the duration, both in RFC 3339 with millisecond precision.
    /// `SILENCE_CREATED_BY` and `SILENCE_COMMENT` are JSON-escaped so the
    /// built-in template always yields a valid document. `SILENCE_MATCHERS`
    /// is the matcher list serialized as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns `SilenceError::InvalidConfig` when the duration pushes the
    /// end timestamp out of range.
    pub fn new(
        starts_at: DateTime<Utc>,
        duration_secs: u64,
        created_by: &str,
        comment: &str,
        matchers: &[Matcher],
    ) -> Result<Self> {
        let ends_at = i64::try_from(duration_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|delta| starts_at.checked_add_signed(delta))
            .ok_or_else(|| SilenceError::InvalidConfig {
                reason: format!("duration of {duration_secs}s is out of range"),
            })?;

        let mut vars = BTreeMap::new();
        vars.insert("SILENCE_STARTS_AT".to_string(), rfc3339_millis(starts_at));
        vars.insert("SILENCE_ENDS_AT".to_string(), rfc3339_millis(ends_at));
        vars.insert(
            "SILENCE_CREATED_BY".to_string(),
            escape_json(created_by),
        );
        vars.insert("SILENCE_COMMENT".to_string(), escape_json(comment));
        vars.insert(
            "SILENCE_MATCHERS".to_string(),
            serde_json::to_string(matchers)?,
        );

        Ok(Self { vars })
    }

    /// Merges an environment snapshot under the declared variables.
    ///
    /// Declared keys win over snapshot keys. The snapshot is copied here,
    /// never read back from the live environment during rendering.
    #[must_use]
    pub fn with_env<I>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in env {
            self.vars.entry(key).or_insert(value);
        }
        self
    }

    /// Looks a variable up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true when the context has no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// How substitution treats undefined variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strictness {
    /// An undefined variable is a rendering error.
    Strict,
    /// An undefined variable renders as the empty string.
    Permissive,
}

/// Renders the selected template against the context.
///
/// # Errors
///
/// Returns `SilenceError::TemplateNotFound` for an unknown built-in name,
/// and `SilenceError::TemplateRender` for malformed placeholders or, in a
/// built-in template, undefined variables.
pub fn render(selector: &TemplateSelector, context: &TemplateContext) -> Result<RenderedBody> {
    match selector {
        TemplateSelector::Builtin(name) => {
            let text = builtin(name).ok_or_else(|| SilenceError::TemplateNotFound {
                name: name.clone(),
            })?;
            substitute(text, context, Strictness::Strict).map(RenderedBody)
        }
        TemplateSelector::Custom(text) => {
            substitute(text, context, Strictness::Permissive).map(RenderedBody)
        }
    }
}

fn builtin(name: &str) -> Option<&'static str> {
    match name {
        DEFAULT_TEMPLATE_NAME => Some(DEFAULT_TEMPLATE),
        _ => None,
    }
}

fn substitute(text: &str, context: &TemplateContext, strictness: Strictness) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err(SilenceError::TemplateRender {
                reason: "unterminated '{{' placeholder".to_string(),
            });
        };

        let name = after[..end].trim();
        if !is_identifier(name) {
            return Err(SilenceError::TemplateRender {
                reason: format!("malformed placeholder '{{{{{name}}}}}'"),
            });
        }

        match context.get(name) {
            Some(value) => out.push_str(value),
            None => {
                if strictness == Strictness::Strict {
                    return Err(SilenceError::TemplateRender {
                        reason: format!("variable '{name}' is not defined"),
                    });
                }
            }
        }

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Formats a UTC instant the way the alert-management API expects,
/// e.g. `2019-11-13T05:09:38.932Z`.
fn rfc3339_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Escapes a string for embedding inside a JSON string literal.
fn escape_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
