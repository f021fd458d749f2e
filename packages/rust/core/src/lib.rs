//! Build orchestration for the docsite pipeline.
//!
//! This crate ties together version discovery, Markdown conversion, redirect
//! generation and the static site build into one end-to-end run
//! ([`pipeline::build_site`]).

pub mod content;
pub mod layout;
pub mod navigation;
pub mod pipeline;
pub mod site;
pub mod sources;

pub use pipeline::{BuildReport, ProgressReporter, SilentProgress, build_site, run_stage};
