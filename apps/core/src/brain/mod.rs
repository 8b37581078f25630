//! # Brain Module
//!
//! Keyword analysis of user input. Decides what kind of content to produce
//! and how to parameterize it. No model involved: pure Rust regex and
//! substring tables, evaluated in a fixed, inspectable order.
//!
//! ## Components
//! - `intent`: content type classification (image > video > game > code > text)
//! - `game_request`: game template selection and option overrides
//! - `image_prompt`: colors, subjects and styles named in media requests

pub mod game_request;
pub mod image_prompt;
pub mod intent;

pub use game_request::{GameRequest, GameRequestAnalyzer};
pub use image_prompt::{ImagePrompt, ImagePromptAnalyzer};
pub use intent::{IntentClassifier, RuleMatch};
