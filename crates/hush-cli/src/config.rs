//! Translation of parsed arguments into a core invocation config.
//!
//! This is where the process boundary lives: flags and `PLUGIN_*` variables
//! come in through clap, the `DRONE_*` build metadata and the environment
//! snapshot are read here, and everything past this point works on the
//! explicit [`SilenceConfig`] alone.

use std::collections::BTreeMap;
use std::time::Duration;

use hush_core::{
    AcceptPolicy, Credentials, Headers, Matcher, SilenceConfig, Target, TemplateSelector,
};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Builds the core configuration from CLI arguments and the environment.
///
/// # Errors
///
/// Returns `CliError::Config` for unparseable URLs, matchers, or headers,
/// and for a username supplied without a password (or vice versa).
pub fn build_config(cli: &Cli) -> Result<SilenceConfig, CliError> {
    let matchers = parse_matchers(&cli.matchers)?;
    let headers = parse_headers(&cli.headers)?;

    let credentials = match (&cli.username, &cli.password) {
        (Some(username), Some(password)) => Some(Credentials::new(username, password)),
        (None, None) => None,
        _ => {
            return Err(CliError::Config(
                "username and password must be provided together".to_string(),
            ));
        }
    };

    let mut targets = Vec::with_capacity(cli.urls.len());
    for url in &cli.urls {
        let mut target = Target::new(url.trim())
            .map_err(|e| CliError::Config(e.to_string()))?
            .with_headers(headers.clone())
            .tls_verify(!cli.skip_verify)
            .follow_redirects(cli.follow_redirects)
            .with_timeout(Duration::from_secs(cli.timeout));
        if let Some(credentials) = &credentials {
            target = target.with_credentials(credentials.clone());
        }
        targets.push(target);
    }

    let comment = cli.comment.clone().unwrap_or_else(ci_comment);
    debug!(targets = targets.len(), comment = %comment, "configuration assembled");

    Ok(SilenceConfig {
        targets,
        template: TemplateSelector::resolve(Some(&cli.template), cli.custom_template.as_deref()),
        duration_secs: cli.duration,
        matchers,
        strict_match: cli.strict_match,
        accept: AcceptPolicy::from_codes(&cli.valid_response_codes),
        created_by: cli.created_by.clone(),
        comment,
        env: env_snapshot(),
    })
}

fn parse_matchers(raw: &[String]) -> Result<Vec<Matcher>, CliError> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Matcher>()
                .map_err(|e| CliError::Config(e.to_string()))
        })
        .collect()
}

fn parse_headers(raw: &[String]) -> Result<Headers, CliError> {
    let mut headers = Headers::new();
    for entry in raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let (name, value) = entry.split_once(':').ok_or_else(|| {
            CliError::Config(format!("header '{entry}' is not in 'Name: value' form"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::Config(format!(
                "header '{entry}' has an empty name"
            )));
        }
        headers.insert(name, value.trim());
    }
    Ok(headers)
}

/// Comment tying the silence to the CI build that created it, so deletion
/// can find it again. Falls back to a fixed comment outside CI.
fn ci_comment() -> String {
    let build = std::env::var("DRONE_BUILD_NUMBER").unwrap_or_default();
    let owner = std::env::var("DRONE_REPO_OWNER").unwrap_or_default();
    let repo = std::env::var("DRONE_REPO_NAME").unwrap_or_default();
    let link = std::env::var("DRONE_BUILD_LINK").unwrap_or_default();

    if build.is_empty() || owner.is_empty() || repo.is_empty() {
        return "Created by hush".to_string();
    }
    format!("Created for build#{build} of {owner}/{repo}, see {link}")
}

/// Snapshot of the process environment, captured once per invocation.
fn env_snapshot() -> BTreeMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["hush"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn builds_minimal_create_config() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--duration",
            "600",
            "--comment",
            "maintenance",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].url, "http://am:9093");
        assert!(config.targets[0].tls_verify);
        assert_eq!(config.duration_secs, Some(600));
        assert_eq!(config.comment, "maintenance");
        assert_eq!(config.accept, AcceptPolicy::SuccessFamily);
        assert_eq!(
            config.template,
            TemplateSelector::Builtin("default".to_string())
        );
    }

    #[test]
    fn policy_flags_reach_every_target() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "https://am1:9093,https://am2:9093",
            "--skip-verify",
            "--follow-redirects",
            "false",
            "--timeout",
            "5",
            "--username",
            "ci",
            "--password",
            "secret",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.targets.len(), 2);
        for target in &config.targets {
            assert!(!target.tls_verify);
            assert!(!target.follow_redirects);
            assert_eq!(target.timeout, Duration::from_secs(5));
            assert_eq!(
                target.credentials,
                Some(Credentials::new("ci", "secret"))
            );
        }
    }

    #[test]
    fn matchers_and_headers_are_parsed() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--matchers",
            "service=api,env=~prod-.*",
            "--headers",
            "X-Scope-OrgID: tenant-1",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(
            config.matchers,
            vec![
                Matcher::equals("service", "api"),
                Matcher::regex("env", "prod-.*"),
            ]
        );
        assert_eq!(
            config.targets[0].headers.get("x-scope-orgid"),
            Some("tenant-1")
        );
    }

    #[test]
    fn explicit_response_codes_build_explicit_policy() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--valid-response-codes",
            "201",
        ]);
        let config = build_config(&cli).unwrap();

        assert!(config.accept.accepts(201));
        assert!(!config.accept.accepts(200));
    }

    #[test]
    fn custom_template_wins_over_named() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--template",
            "default",
            "--custom-template",
            "{{SILENCE_COMMENT}}",
        ]);
        let config = build_config(&cli).unwrap();

        assert!(config.template.is_custom());
    }

    #[test]
    fn rejects_bad_matcher() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--matchers",
            "noequals",
        ]);
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_bad_header() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--headers",
            "not-a-header",
        ]);
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_bad_url() {
        let cli = parse(&["--action", "create", "--urls", "not a url"]);
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_username_without_password() {
        let cli = parse(&[
            "--action",
            "create",
            "--urls",
            "http://am:9093",
            "--username",
            "ci",
        ]);
        assert!(matches!(build_config(&cli), Err(CliError::Config(_))));
    }
}
