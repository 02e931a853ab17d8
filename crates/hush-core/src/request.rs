//! Request construction for silence operations.
//!
//! Turns an action plus a target list into fully-specified request
//! descriptors. No network I/O happens here; every descriptor carries its
//! own copy of the originating target's policy.

use crate::template::RenderedBody;
use crate::types::{Headers, Method, RequestDescriptor, Target};

/// API path for creating and listing silences.
pub const SILENCES_PATH: &str = "/api/v2/silences";

/// API path prefix for operating on a single silence.
pub const SILENCE_PATH: &str = "/api/v2/silence";

/// User agent reported by every request.
pub const USER_AGENT: &str = concat!("hush/", env!("CARGO_PKG_VERSION"));

/// What the built requests should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildAction<'a> {
    /// POST the rendered silence payload.
    Create {
        /// The rendered silence document.
        body: &'a RenderedBody,
    },
    /// DELETE one silence by id.
    Delete {
        /// The silence id to delete.
        silence_id: &'a str,
    },
}

/// Base headers every request starts from; user headers are merged over
/// these, case-insensitively, last write winning.
#[must_use]
pub fn base_headers() -> Headers {
    Headers::new()
        .with("Content-Type", "application/json; charset=utf-8")
        .with("User-Agent", USER_AGENT)
}

/// Builds one fully-specified request per target, in target order.
#[must_use]
pub fn build(action: BuildAction<'_>, targets: &[Target]) -> Vec<RequestDescriptor> {
    targets
        .iter()
        .map(|target| build_one(action, target))
        .collect()
}

/// Builds the request that lists a target's silences.
#[must_use]
pub fn build_list(target: &Target) -> RequestDescriptor {
    let mut headers = base_headers();
    headers.merge(&target.headers);
    descriptor(Method::Get, join_path(&target.url, SILENCES_PATH), headers, None, target)
}

fn build_one(action: BuildAction<'_>, target: &Target) -> RequestDescriptor {
    let mut headers = base_headers();
    headers.merge(&target.headers);

    match action {
        BuildAction::Create { body } => descriptor(
            Method::Post,
            join_path(&target.url, SILENCES_PATH),
            headers,
            Some(body.as_str().to_string()),
            target,
        ),
        BuildAction::Delete { silence_id } => descriptor(
            Method::Delete,
            format!("{}/{silence_id}", join_path(&target.url, SILENCE_PATH)),
            headers,
            None,
            target,
        ),
    }
}

fn descriptor(
    method: Method,
    url: String,
    headers: Headers,
    body: Option<String>,
    target: &Target,
) -> RequestDescriptor {
    RequestDescriptor {
        method,
        url,
        headers,
        body,
        credentials: target.credentials.clone(),
        tls_verify: target.tls_verify,
        follow_redirects: target.follow_redirects,
        timeout: target.timeout,
    }
}

fn join_path(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::template::{render, TemplateContext, TemplateSelector};
    use crate::types::{Credentials, Matcher};

    fn rendered_body() -> RenderedBody {
        let context = TemplateContext::new(
            chrono::Utc::now(),
            600,
            "hush",
            "test",
            &[Matcher::equals("service", "api")],
        )
        .unwrap();
        render(&TemplateSelector::resolve(None, None), &context).unwrap()
    }

    fn targets(urls: &[&str]) -> Vec<Target> {
        urls.iter().map(|url| Target::new(*url).unwrap()).collect()
    }

    #[test]
    fn create_builds_post_to_silences_path() {
        let body = rendered_body();
        let targets = targets(&["http://am:9093"]);
        let descriptors = build(BuildAction::Create { body: &body }, &targets);

        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].method, Method::Post);
        assert_eq!(descriptors[0].url, "http://am:9093/api/v2/silences");
        assert_eq!(descriptors[0].body.as_deref(), Some(body.as_str()));
    }

    #[test]
    fn delete_extends_url_with_silence_id() {
        let targets = targets(&["http://am:9093"]);
        let descriptors = build(
            BuildAction::Delete {
                silence_id: "9c5c5bc2",
            },
            &targets,
        );

        assert_eq!(descriptors[0].method, Method::Delete);
        assert_eq!(descriptors[0].url, "http://am:9093/api/v2/silence/9c5c5bc2");
        assert!(descriptors[0].body.is_none());
    }

    #[test]
    fn one_descriptor_per_target_in_order() {
        let body = rendered_body();
        let targets = targets(&["http://am1:9093", "http://am2:9093", "http://am3:9093"]);
        let descriptors = build(BuildAction::Create { body: &body }, &targets);

        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].url, "http://am1:9093/api/v2/silences");
        assert_eq!(descriptors[1].url, "http://am2:9093/api/v2/silences");
        assert_eq!(descriptors[2].url, "http://am3:9093/api/v2/silences");
    }

    #[test]
    fn base_headers_are_present() {
        let body = rendered_body();
        let targets = targets(&["http://am:9093"]);
        let descriptors = build(BuildAction::Create { body: &body }, &targets);

        assert_eq!(
            descriptors[0].headers.get("content-type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(descriptors[0].headers.get("user-agent"), Some(USER_AGENT));
    }

    #[test]
    fn user_headers_override_base_set() {
        let body = rendered_body();
        let target = Target::new("http://am:9093")
            .unwrap()
            .with_header("CONTENT-TYPE", "application/json")
            .with_header("X-Scope-OrgID", "tenant-1");
        let descriptors = build(BuildAction::Create { body: &body }, &[target]);

        assert_eq!(
            descriptors[0].headers.get("content-type"),
            Some("application/json")
        );
        assert_eq!(
            descriptors[0].headers.get("x-scope-orgid"),
            Some("tenant-1")
        );
    }

    #[test]
    fn target_policy_is_copied_verbatim() {
        let body = rendered_body();
        let strict = Target::new("https://am1.example.com")
            .unwrap()
            .with_credentials(Credentials::new("ci", "secret"))
            .with_timeout(Duration::from_secs(5));
        let lax = Target::new("https://am2.example.com")
            .unwrap()
            .tls_verify(false)
            .follow_redirects(false);

        let descriptors = build(BuildAction::Create { body: &body }, &[strict, lax]);

        assert!(descriptors[0].tls_verify);
        assert!(descriptors[0].follow_redirects);
        assert_eq!(descriptors[0].timeout, Duration::from_secs(5));
        assert_eq!(
            descriptors[0].credentials,
            Some(Credentials::new("ci", "secret"))
        );

        assert!(!descriptors[1].tls_verify);
        assert!(!descriptors[1].follow_redirects);
        assert!(descriptors[1].credentials.is_none());
    }

    #[test]
    fn list_builds_get_to_silences_path() {
        let target = Target::new("http://am:9093/").unwrap();
        let descriptor = build_list(&target);

        assert_eq!(descriptor.method, Method::Get);
        assert_eq!(descriptor.url, "http://am:9093/api/v2/silences");
        assert!(descriptor.body.is_none());
    }
}
