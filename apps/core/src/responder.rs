//! Reply generation.
//!
//! `TemplateResponder` is the production responder: it classifies the request,
//! builds the matching content from templates and publishes any document as an
//! artifact. The `Responder` trait is the seam the supervisor depends on.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::artifacts::{ArtifactHandle, ArtifactStore};
use crate::brain::{GameRequestAnalyzer, ImagePromptAnalyzer, IntentClassifier};
use crate::config::CapabilityPolicy;
use crate::error::AppError;
use crate::models::{ContentType, Persona};
use crate::templates::code::{CodeKind, CodeSnippet};
use crate::templates::{extract_game_code_snippet, TemplateRenderer};

/// Everything a responder needs to answer one message.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub text: String,
    pub persona: Persona,
    pub policy: CapabilityPolicy,
}

/// Assistant reply before it is attributed and appended to the history.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReply {
    pub content: String,
    pub content_type: ContentType,
    pub artifact: Option<ArtifactHandle>,
    pub preview: Option<String>,
}

impl GeneratedReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentType::Text,
            artifact: None,
            preview: None,
        }
    }
}

/// Produces assistant replies.
#[async_trait]
pub trait Responder: Send + Sync + 'static {
    async fn respond(&self, request: ReplyRequest) -> Result<GeneratedReply, AppError>;
}

pub struct TemplateResponder {
    classifier: IntentClassifier,
    games: GameRequestAnalyzer,
    images: ImagePromptAnalyzer,
    renderer: TemplateRenderer,
    store: ArtifactStore,
}

/// Longest slug, in chars. Keeps game file names under 255 bytes.
const MAX_SLUG_CHARS: usize = 64;

/// File-name-safe form of a game name.
fn slugify(name: &str) -> String {
    let joined = name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let truncated: String = joined.chars().take(MAX_SLUG_CHARS).collect();
    let slug = truncated.trim_end_matches('-');
    if slug.is_empty() {
        "game".to_string()
    } else {
        slug.to_string()
    }
}

impl TemplateResponder {
    pub fn new(store: ArtifactStore) -> Result<Self, AppError> {
        Ok(Self {
            classifier: IntentClassifier::new(),
            games: GameRequestAnalyzer::new(),
            images: ImagePromptAnalyzer::new(),
            renderer: TemplateRenderer::new()?,
            store,
        })
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Synchronous core of [`Responder::respond`].
    #[instrument(skip(self, persona), fields(persona = %persona.id))]
    pub fn generate(
        &self,
        text: &str,
        persona: &Persona,
        policy: CapabilityPolicy,
    ) -> Result<GeneratedReply, AppError> {
        let content_type = self.classifier.classify(text);
        if let Some(rule) = self.classifier.matched_rule(text) {
            debug!(content_type = %rule.content_type, fragment = %rule.fragment, "Intent rule matched");
        }

        if content_type != ContentType::Text && !persona.supports(content_type) {
            match policy {
                CapabilityPolicy::Advisory => {
                    warn!(%content_type, "Persona does not declare this capability; generating anyway");
                }
                CapabilityPolicy::Enforce => {
                    info!(%content_type, "Request refused by capability policy");
                    return Ok(GeneratedReply::text(format!(
                        "{} не умеет создавать {}. Выберите другую нейросеть.",
                        persona.display_name,
                        content_type.noun()
                    )));
                }
            }
        }

        let reply = match content_type {
            ContentType::Text => GeneratedReply::text(format!(
                "Я понял ваш запрос! {} готов помочь вам. Напишите подробнее, что именно вы хотите создать или узнать.",
                persona.display_name
            )),
            ContentType::Image => GeneratedReply {
                content: format!(
                    "Вот изображение по вашему запросу: {}",
                    self.images.analyze(text).caption()
                ),
                content_type,
                artifact: None,
                preview: None,
            },
            ContentType::Video => GeneratedReply {
                content: format!(
                    "Я создал видео по вашему запросу: {}",
                    self.images.analyze(text).caption()
                ),
                content_type,
                artifact: None,
                preview: None,
            },
            ContentType::Code => self.generate_code(text)?,
            ContentType::Game => self.generate_game(text)?,
        };

        info!(content_type = %reply.content_type, artifact = ?reply.artifact.as_ref().map(|a| a.url()), "Reply generated");
        Ok(reply)
    }

    fn generate_code(&self, text: &str) -> Result<GeneratedReply, AppError> {
        let snippet = match CodeKind::detect(text) {
            CodeKind::Website => {
                let title = crate::brain::game_request::extract_name(text);
                CodeSnippet::website(&self.renderer, title.as_deref())?
            }
            CodeKind::Function => CodeSnippet::function(),
        };
        let artifact = self
            .store
            .publish(snippet.source.as_bytes(), snippet.mime(), snippet.file_name())?;

        Ok(GeneratedReply {
            content: snippet.source,
            content_type: ContentType::Code,
            artifact: Some(artifact),
            preview: None,
        })
    }

    fn generate_game(&self, text: &str) -> Result<GeneratedReply, AppError> {
        let request = self.games.analyze(text);
        info!(
            template = %request.template,
            difficulty = ?request.options.difficulty,
            rules = ?request.applied_rules,
            "Game request analyzed"
        );

        let document = self.renderer.render_game(request.template, &request.options)?;
        let file_name = format!(
            "{}-{}.html",
            slugify(&request.options.name),
            Utc::now().timestamp_millis()
        );
        let preview = extract_game_code_snippet(&document);
        let artifact = self.store.publish(document, "text/html", &file_name)?;

        Ok(GeneratedReply {
            content: format!(
                "Я разработал игру «{}» по вашему запросу. Вы можете запустить её прямо сейчас или скачать.",
                request.options.name
            ),
            content_type: ContentType::Game,
            artifact: Some(artifact),
            preview: Some(preview),
        })
    }
}

#[async_trait]
impl Responder for TemplateResponder {
    async fn respond(&self, request: ReplyRequest) -> Result<GeneratedReply, AppError> {
        self.generate(&request.text, &request.persona, request.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Звёздный путь"), "звёздный-путь");
        assert_eq!(slugify("  !!  "), "game");
        assert_eq!(slugify("Space Run 2"), "space-run-2");
    }

    #[test]
    fn test_slugify_caps_length() {
        let slug = slugify(&"очень ".repeat(30));
        assert!(slug.chars().count() <= MAX_SLUG_CHARS);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("очень-очень"));
    }
}
