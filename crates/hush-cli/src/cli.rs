//! Command-line argument parsing with clap.
//!
//! Every setting can also be supplied through a `PLUGIN_*` environment
//! variable, following the convention of CI plugin containers where the
//! pipeline passes settings through the environment rather than argv.

use clap::{ArgAction, Parser, ValueEnum};

/// hush - manage Alertmanager silences from CI pipelines.
#[derive(Parser, Debug, Clone)]
#[command(name = "hush")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Action to perform against the configured targets.
    #[arg(long, value_enum, env = "PLUGIN_ACTION")]
    pub action: ActionArg,

    /// Alert-management service base URLs (comma-separated).
    #[arg(long = "urls", env = "PLUGIN_URLS", value_delimiter = ',', required = true)]
    pub urls: Vec<String>,

    /// Built-in template to render the silence payload with.
    #[arg(long, env = "PLUGIN_TEMPLATE", default_value = "default")]
    pub template: String,

    /// Inline template text; takes precedence over --template.
    #[arg(long, env = "PLUGIN_CUSTOM_TEMPLATE")]
    pub custom_template: Option<String>,

    /// Silence duration in seconds (required for create).
    #[arg(long, env = "PLUGIN_DURATION")]
    pub duration: Option<u64>,

    /// Matchers as name=value, or name=~value for regex (comma-separated).
    #[arg(long = "matchers", env = "PLUGIN_MATCHERS", value_delimiter = ',')]
    pub matchers: Vec<String>,

    /// Delete only silences whose matcher set equals this invocation's.
    #[arg(long, env = "PLUGIN_STRICT_MATCH")]
    pub strict_match: bool,

    /// Response status codes treated as success (comma-separated; empty
    /// means any 2xx).
    #[arg(long = "valid-response-codes", env = "PLUGIN_VALID_RESPONSE_CODES", value_delimiter = ',')]
    pub valid_response_codes: Vec<u16>,

    /// Extra request headers as "Name: value" pairs (comma-separated).
    #[arg(long = "headers", env = "PLUGIN_HEADERS", value_delimiter = ',')]
    pub headers: Vec<String>,

    /// Basic-auth username.
    #[arg(long, env = "PLUGIN_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password.
    #[arg(long, env = "PLUGIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(long, env = "PLUGIN_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Follow 3xx redirects.
    #[arg(long, env = "PLUGIN_FOLLOW_REDIRECTS", action = ArgAction::Set, default_value_t = true)]
    pub follow_redirects: bool,

    /// Per-request timeout in seconds.
    #[arg(long, env = "PLUGIN_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,

    /// Comment recorded in the silence document.
    #[arg(long, env = "PLUGIN_COMMENT")]
    pub comment: Option<String>,

    /// Author recorded in the silence document.
    #[arg(long, env = "PLUGIN_CREATED_BY", default_value = "hush")]
    pub created_by: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable per-target report.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Action argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Create a silence on every target.
    Create,
    /// Expire previously-created silences on every target.
    Delete,
}

impl From<ActionArg> for hush_core::Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Create => Self::Create,
            ActionArg::Delete => Self::Delete,
        }
    }
}
