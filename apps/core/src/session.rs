//! Chat session state.
//!
//! `SessionState` owns the history, the persona catalog and the current
//! selection. Every mutation goes through one of the `apply_*`/`*_persona`
//! transitions; the history is append-only.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    builtin_personas, ChatEntry, ContentType, Persona, PersonaDraft, Role, DEFAULT_AVATAR,
};
use crate::responder::GeneratedReply;

pub const WELCOME_MESSAGE: &str =
    "Привет! Я ИИ-ассистент. Могу создать для вас изображения, видео, игры или код. Просто опишите, что вы хотите!";
pub const APOLOGY_MESSAGE: &str =
    "Извините, не удалось сгенерировать ответ. Попробуйте переформулировать запрос.";

const USER_NAME: &str = "Вы";

#[derive(Debug, Clone)]
pub struct SessionState {
    history: Vec<ChatEntry>,
    personas: Vec<Persona>,
    selected: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Built-in catalog, first persona selected, one welcome entry.
    pub fn new() -> Self {
        let mut state = Self {
            history: Vec::new(),
            personas: builtin_personas(),
            selected: 0,
        };
        state.push_assistant(WELCOME_MESSAGE.to_string(), ContentType::Text, None, None);
        state
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn selected_persona(&self) -> &Persona {
        &self.personas[self.selected]
    }

    fn push_assistant(
        &mut self,
        content: String,
        content_type: ContentType,
        artifact: Option<crate::artifacts::ArtifactHandle>,
        preview: Option<String>,
    ) -> &ChatEntry {
        let persona = &self.personas[self.selected];
        let entry = ChatEntry {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content,
            content_type,
            author_name: persona.display_name.clone(),
            author_avatar: persona.avatar_ref.clone(),
            timestamp: Utc::now(),
            artifact,
            preview,
        };
        self.history.push(entry);
        &self.history[self.history.len() - 1]
    }

    /// Appends the user's message. Blank text is rejected and nothing changes.
    pub fn apply_user_message(&mut self, text: &str) -> Result<&ChatEntry, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("Message is empty".to_string()));
        }

        self.history.push(ChatEntry {
            id: Uuid::new_v4(),
            role: Role::User,
            content: trimmed.to_string(),
            content_type: ContentType::Text,
            author_name: USER_NAME.to_string(),
            author_avatar: DEFAULT_AVATAR.to_string(),
            timestamp: Utc::now(),
            artifact: None,
            preview: None,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// Appends a reply attributed to the currently selected persona.
    pub fn apply_assistant_message(&mut self, reply: GeneratedReply) -> &ChatEntry {
        self.push_assistant(reply.content, reply.content_type, reply.artifact, reply.preview)
    }

    pub fn apply_failure(&mut self) -> &ChatEntry {
        self.push_assistant(APOLOGY_MESSAGE.to_string(), ContentType::Text, None, None)
    }

    pub fn select_persona(&mut self, id: &str) -> Result<&Persona, AppError> {
        let index = self
            .personas
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Persona not found: {}", id)))?;
        self.selected = index;
        info!(persona = %id, "Persona selected");
        Ok(&self.personas[index])
    }

    /// Registers a user-defined persona, selects it and posts its greeting.
    pub fn create_persona(&mut self, draft: PersonaDraft) -> Result<&Persona, AppError> {
        draft.validate()?;
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Persona name is blank".to_string()));
        }

        let base_id = format!("custom-{}", Utc::now().timestamp_millis());
        let mut id = base_id.clone();
        let mut n = 1;
        while self.personas.iter().any(|p| p.id == id) {
            n += 1;
            id = format!("{}-{}", base_id, n);
        }

        let capabilities = if draft.capabilities.is_empty() {
            [ContentType::Text].into_iter().collect()
        } else {
            draft.capabilities
        };
        let description = draft
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Персонализированная нейросеть \"{}\"", name));
        let avatar_ref = draft
            .avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

        let persona = Persona {
            id,
            display_name: name.to_string(),
            description,
            personality: draft.personality.filter(|p| !p.trim().is_empty()),
            capabilities,
            avatar_ref,
        };
        if !persona.supports(ContentType::Text) {
            warn!(persona = %persona.id, "Persona created without text capability");
        }
        info!(persona = %persona.id, name = %persona.display_name, "Persona created");

        let greeting = persona.greeting();
        self.personas.push(persona);
        self.selected = self.personas.len() - 1;
        self.push_assistant(greeting, ContentType::Text, None, None);
        Ok(&self.personas[self.selected])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_greets() {
        let state = SessionState::new();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].content, WELCOME_MESSAGE);
        assert_eq!(state.history()[0].author_name, "Умник");
        assert_eq!(state.selected_persona().id, "gpt4");
    }

    #[test]
    fn test_blank_user_message_rejected() {
        let mut state = SessionState::new();
        assert!(matches!(state.apply_user_message("   "), Err(AppError::Validation(_))));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_select_persona_appends_nothing() {
        let mut state = SessionState::new();
        state.select_persona("coder").unwrap();
        assert_eq!(state.selected_persona().display_name, "Программист");
        assert_eq!(state.history().len(), 1);
        assert!(matches!(state.select_persona("nope"), Err(AppError::NotFound(_))));
        assert_eq!(state.selected_persona().id, "coder");
    }

    #[test]
    fn test_create_persona_defaults() {
        let mut state = SessionState::new();
        let persona = state.create_persona(PersonaDraft::named("  Творец  ")).unwrap().clone();

        assert!(persona.id.starts_with("custom-"));
        assert_eq!(persona.display_name, "Творец");
        assert_eq!(persona.description, "Персонализированная нейросеть \"Творец\"");
        assert_eq!(persona.avatar_ref, DEFAULT_AVATAR);
        assert!(persona.supports(ContentType::Text));
        assert_eq!(persona.capabilities.len(), 1);

        assert_eq!(state.selected_persona().id, persona.id);
        let last = state.history().last().unwrap();
        assert_eq!(last.content, persona.greeting());
        assert_eq!(last.author_name, "Творец");
    }

    #[test]
    fn test_create_persona_ids_unique() {
        let mut state = SessionState::new();
        let a = state.create_persona(PersonaDraft::named("A")).unwrap().id.clone();
        let b = state.create_persona(PersonaDraft::named("B")).unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_persona_blank_name() {
        let mut state = SessionState::new();
        assert!(state.create_persona(PersonaDraft::named("   ")).is_err());
        assert_eq!(state.personas().len(), 4);
    }

    #[test]
    fn test_failure_is_apology() {
        let mut state = SessionState::new();
        let entry = state.apply_failure();
        assert_eq!(entry.content, APOLOGY_MESSAGE);
        assert_eq!(entry.content_type, ContentType::Text);
    }
}
