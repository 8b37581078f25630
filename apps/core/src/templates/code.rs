//! Code snippets returned for code requests.

use serde::Serialize;

use super::TemplateRenderer;
use crate::error::AppError;

const WEBSITE_KEYWORDS: &[&str] = &["сайт", "страниц"];
const DEFAULT_SITE_TITLE: &str = "Мой сайт";
const DEFAULT_ACCENT: &str = "#6E59A5";

const FUNCTION_SNIPPET: &str = r#"function createGame() {
  const canvas = document.createElement('canvas');
  const ctx = canvas.getContext('2d');
  document.body.appendChild(canvas);

  // Game logic
  const player = { x: 100, y: 100, width: 50, height: 50 };
  const obstacles = [];

  function gameLoop() {
    // Update game state
    // Render game
    requestAnimationFrame(gameLoop);
  }

  gameLoop();

  return "Game created successfully!";
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    /// HTML/CSS landing page.
    Website,
    /// Generic JavaScript function.
    Function,
}

impl CodeKind {
    /// Website when the request mentions a site or a page, otherwise a function.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        if WEBSITE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            CodeKind::Website
        } else {
            CodeKind::Function
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSnippet {
    pub kind: CodeKind,
    pub source: String,
}

impl CodeSnippet {
    pub fn function() -> Self {
        Self {
            kind: CodeKind::Function,
            source: FUNCTION_SNIPPET.to_string(),
        }
    }

    pub fn website(renderer: &TemplateRenderer, title: Option<&str>) -> Result<Self, AppError> {
        let title = title.unwrap_or(DEFAULT_SITE_TITLE);
        Ok(Self {
            kind: CodeKind::Website,
            source: renderer.render_website(title, DEFAULT_ACCENT)?,
        })
    }

    /// Saved as a script when it is JavaScript, as plain text otherwise.
    pub fn file_name(&self) -> &'static str {
        if self.source.contains("function") {
            "script.js"
        } else {
            "code.txt"
        }
    }

    pub fn mime(&self) -> &'static str {
        if self.file_name() == "script.js" {
            "text/javascript"
        } else {
            "text/plain"
        }
    }
}
