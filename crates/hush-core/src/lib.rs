//! Template rendering and HTTP delivery for Alertmanager silences.
//!
//! `hush-core` implements the pipeline a CI step walks to open or close a
//! suppression window: render a silence document from a template, build one
//! request per target, deliver each request under its target's policy, and
//! fold the outcomes into an exit status.
//!
//! # Features
//!
//! - **Templates**: a built-in silence document plus user-supplied inline
//!   templates with environment-variable interpolation
//! - **Per-target policy**: headers, basic auth, TLS verification, redirect
//!   following, and timeout are configured per target, never globally
//! - **Independent delivery**: one attempt per request, outcomes in input
//!   order, one failing target never blocks the rest
//! - **Response validation**: accept the 2xx family or an explicit status
//!   code set
//!
//! # Example
//!
//! ```rust,no_run
//! use hush_core::{AcceptPolicy, Action, SilenceConfig, SilenceManager, Target, TemplateSelector};
//!
//! # async fn demo() -> hush_core::Result<()> {
//! let config = SilenceConfig {
//!     targets: vec![Target::new("http://alertmanager:9093")?],
//!     template: TemplateSelector::resolve(None, None),
//!     duration_secs: Some(3600),
//!     matchers: vec!["service=api".parse()?],
//!     strict_match: false,
//!     accept: AcceptPolicy::default(),
//!     created_by: "hush".to_string(),
//!     comment: "deploy window".to_string(),
//!     env: std::collections::BTreeMap::new(),
//! };
//!
//! let manager = SilenceManager::new(config)?;
//! let outcomes = manager.run(Action::Create).await?;
//! let summary = hush_core::summarize(outcomes);
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/hush-core/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod delivery;
pub mod error;
pub mod lookup;
pub mod manager;
pub mod report;
pub mod request;
pub mod template;
pub mod types;

// Re-export main types at crate root
pub use delivery::DeliveryEngine;
pub use error::{Result, SilenceError};
pub use lookup::{find_silences, SilenceQuery};
pub use manager::{SilenceConfig, SilenceManager};
pub use report::{summarize, Summary};
pub use request::{build, build_list, BuildAction};
pub use template::{render, RenderedBody, TemplateContext, TemplateSelector};
pub use types::{
    AcceptPolicy, Action, Credentials, DeliveryOutcome, Headers, Matcher, Method,
    RequestDescriptor, Target,
};
