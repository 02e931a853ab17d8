//! Error types for the hush-core crate.

use thiserror::Error;

/// Errors that can occur while rendering or delivering silences.
#[derive(Debug, Error)]
pub enum SilenceError {
    /// A named built-in template does not exist.
    #[error("template not found: {name}")]
    TemplateNotFound {
        /// The template name that was not found.
        name: String,
    },

    /// Template rendering failed.
    #[error("template rendering failed: {reason}")]
    TemplateRender {
        /// The reason rendering failed.
        reason: String,
    },

    /// The invocation configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration is invalid.
        reason: String,
    },

    /// A request failed before an HTTP response was received.
    #[error("transport failure for {url}: {reason}")]
    Transport {
        /// The URL the request was sent to.
        url: String,
        /// The underlying failure description.
        reason: String,
    },

    /// A response carried a status code outside the accepted set.
    #[error("unaccepted status from {url}: HTTP {status}")]
    UnacceptedStatus {
        /// The URL that produced the response.
        url: String,
        /// The observed status code.
        status: u16,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SilenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for silence operations.
pub type Result<T> = std::result::Result<T, SilenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_template_not_found() {
        let err = SilenceError::TemplateNotFound {
            name: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "template not found: missing");
    }

    #[test]
    fn error_display_template_render() {
        let err = SilenceError::TemplateRender {
            reason: "unterminated placeholder".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "template rendering failed: unterminated placeholder"
        );
    }

    #[test]
    fn error_display_invalid_config() {
        let err = SilenceError::InvalidConfig {
            reason: "no targets".to_string(),
        };
        assert_eq!(err.to_string(), "invalid configuration: no targets");
    }

    #[test]
    fn error_display_transport() {
        let err = SilenceError::Transport {
            url: "http://am:9093".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "transport failure for http://am:9093: connection refused"
        );
    }

    #[test]
    fn error_display_unaccepted_status() {
        let err = SilenceError::UnacceptedStatus {
            url: "http://am:9093".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "unaccepted status from http://am:9093: HTTP 503"
        );
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<String>("invalid json");
        assert!(json_err.is_err());
        let err: SilenceError = json_err.unwrap_err().into();
        assert!(matches!(err, SilenceError::Serialization(_)));
    }
}
