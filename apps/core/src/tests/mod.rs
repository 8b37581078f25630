//! Test Module
//!
//! Cross-module test suites for the HGPT Pro chat core.
//!
//! ## Test Categories
//! - `brain_tests`: intent priority, game request analysis, image prompts
//! - `template_tests`: game documents, website snippet, puzzle shuffle model
//! - `artifact_tests`: artifact lifetime and saving
//! - `responder_tests`: end-to-end reply generation scenarios
//! - `supervisor_tests`: supervisor ordering, failure fallback, persona flow

pub mod brain_tests;
pub mod template_tests;
