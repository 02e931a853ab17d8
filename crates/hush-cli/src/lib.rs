//! hush command-line interface library.
//!
//! Exposes the argument parser, configuration assembly, error types, and
//! output formatting used by the `hush` binary. The actual silence pipeline
//! lives in `hush-core`; this crate only deals with the process boundary:
//! flags and environment in, report and exit status out.

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use error::CliError;
