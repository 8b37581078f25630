use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::artifacts::ArtifactHandle;

/// Avatar used by the built-in catalog and by personas created without one.
pub const DEFAULT_AVATAR: &str = "/placeholder.svg";

/// Kind of content carried by a chat entry. Decides how the entry is presented
/// and which save target applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Code,
    Game,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Text,
        ContentType::Image,
        ContentType::Video,
        ContentType::Code,
        ContentType::Game,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Code => "code",
            ContentType::Game => "game",
        }
    }

    /// Capability label as shown on persona badges.
    pub fn badge(&self) -> &'static str {
        match self {
            ContentType::Text => "Текст",
            ContentType::Image => "Фото",
            ContentType::Video => "Видео",
            ContentType::Code => "Код",
            ContentType::Game => "Игры",
        }
    }

    /// Accusative noun used in replies ("не умеет создавать ...").
    pub fn noun(&self) -> &'static str {
        match self {
            ContentType::Text => "текст",
            ContentType::Image => "изображения",
            ContentType::Video => "видео",
            ContentType::Code => "код",
            ContentType::Game => "игры",
        }
    }

    /// Whether the presentation mode offers a save/download action.
    pub fn is_generative(&self) -> bool {
        !matches!(self, ContentType::Text)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The author side of a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry of the chat history.
///
/// Entries are created once and never edited. The optional artifact handle keeps
/// the generated document alive for as long as the entry exists.
#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub content_type: ContentType,
    pub author_name: String,
    pub author_avatar: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactHandle>,
    /// Short excerpt shown inline (game script head).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl ChatEntry {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// URL of the attached artifact, if any.
    pub fn artifact_url(&self) -> Option<&str> {
        self.artifact.as_ref().map(|a| a.url())
    }

    /// File name offered by the save action, `None` for plain text.
    pub fn save_file_name(&self) -> Option<String> {
        let millis = self.timestamp.timestamp_millis();
        match self.content_type {
            ContentType::Text => None,
            ContentType::Image => Some(format!("generated-image-{}.png", millis)),
            ContentType::Video => Some(format!("generated-video-{}.webm", millis)),
            ContentType::Code | ContentType::Game => {
                self.artifact.as_ref().map(|a| a.file_name().to_string())
            }
        }
    }
}

/// A named assistant identity. Purely presentational unless the capability
/// policy is set to enforce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    pub description: String,
    #[serde(default)]
    pub personality: Option<String>,
    pub capabilities: BTreeSet<ContentType>,
    pub avatar_ref: String,
}

impl Persona {
    pub fn supports(&self, content_type: ContentType) -> bool {
        self.capabilities.contains(&content_type)
    }

    /// Greeting posted when a freshly created persona takes over the chat.
    pub fn greeting(&self) -> String {
        format!(
            "Привет! Я {}, ваша персональная нейросеть. Расскажите, чем я могу вам помочь?",
            self.display_name
        )
    }
}

/// Form input for a user-defined persona.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PersonaDraft {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 280))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub personality: Option<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<ContentType>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl PersonaDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = ContentType>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Suggestion for the name field, e.g. "НейроPro".
    pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
        let prefix = NAME_PREFIXES.choose(rng).copied().unwrap_or("Нейро");
        let suffix = NAME_SUFFIXES.choose(rng).copied().unwrap_or("AI");
        format!("{}{}", prefix, suffix)
    }
}

const NAME_PREFIXES: &[&str] = &[
    "Нейро",
    "Ассистент",
    "Помощник",
    "Гений",
    "Мыслитель",
    "Творец",
    "Эксперт",
];
const NAME_SUFFIXES: &[&str] = &["GPT", "AI", "X", "Pro", "Plus", "Ультра", "Max", "Mind"];

fn caps(list: &[ContentType]) -> BTreeSet<ContentType> {
    list.iter().copied().collect()
}

/// The built-in persona catalog. The first entry is the default selection.
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "gpt4".to_string(),
            display_name: "Умник".to_string(),
            description: "Совершенная текстовая модель для общения и создания контента".to_string(),
            personality: None,
            capabilities: caps(&ContentType::ALL),
            avatar_ref: DEFAULT_AVATAR.to_string(),
        },
        Persona {
            id: "stable-diffusion".to_string(),
            display_name: "Художник".to_string(),
            description: "Специализированная модель для создания изображений".to_string(),
            personality: None,
            capabilities: caps(&[ContentType::Text, ContentType::Image]),
            avatar_ref: DEFAULT_AVATAR.to_string(),
        },
        Persona {
            id: "video-gen".to_string(),
            display_name: "Режиссёр".to_string(),
            description: "Генерирует видеоролики по вашему описанию".to_string(),
            personality: None,
            capabilities: caps(&[ContentType::Text, ContentType::Video]),
            avatar_ref: DEFAULT_AVATAR.to_string(),
        },
        Persona {
            id: "coder".to_string(),
            display_name: "Программист".to_string(),
            description: "Специализируется на написании и анализе кода".to_string(),
            personality: None,
            capabilities: caps(&[ContentType::Text, ContentType::Code, ContentType::Game]),
            avatar_ref: DEFAULT_AVATAR.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_serializes_lowercase() {
        let json = serde_json::to_string(&ContentType::Game).unwrap();
        assert_eq!(json, "\"game\"");
        let back: ContentType = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(back, ContentType::Video);
    }

    #[test]
    fn test_builtin_catalog() {
        let personas = builtin_personas();
        assert_eq!(personas.len(), 4);
        assert_eq!(personas[0].display_name, "Умник");
        assert!(ContentType::ALL.iter().all(|t| personas[0].supports(*t)));
        assert!(!personas[1].supports(ContentType::Game));
        assert!(personas[3].supports(ContentType::Game));
    }

    #[test]
    fn test_draft_validation() {
        assert!(PersonaDraft::named("Творец").validate().is_ok());
        assert!(PersonaDraft::named("").validate().is_err());
        assert!(PersonaDraft::named("x".repeat(65)).validate().is_err());
    }

    #[test]
    fn test_random_name_uses_tables() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let name = PersonaDraft::random_name(&mut rng);
            assert!(NAME_PREFIXES.iter().any(|p| name.starts_with(p)));
            assert!(NAME_SUFFIXES.iter().any(|s| name.ends_with(s)));
        }
    }
}
