use std::path::PathBuf;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::artifacts::ArtifactHandle;
use crate::models::{ChatEntry, Persona, PersonaDraft};

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Snapshot of the persona catalog and the current selection.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PersonaCatalog {
    pub personas: Vec<Persona>,
    pub selected_id: String,
}

/// Messages that can be sent to the chat supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A user message to answer. Replies with the assistant entry.
    ProcessUserMessage {
        content: String,
        responder: oneshot::Sender<Result<ChatEntry, AppError>>,
    },
    SelectPersona {
        persona_id: String,
        responder: oneshot::Sender<Result<Persona, AppError>>,
    },
    CreatePersona {
        draft: PersonaDraft,
        responder: oneshot::Sender<Result<Persona, AppError>>,
    },
    GetHistory {
        responder: oneshot::Sender<Vec<ChatEntry>>,
    },
    GetPersonas {
        responder: oneshot::Sender<PersonaCatalog>,
    },
    /// Resolves an artifact URL while it is still live.
    OpenArtifact {
        url: String,
        responder: oneshot::Sender<Result<ArtifactHandle, AppError>>,
    },
    /// Writes an entry's artifact into the downloads directory.
    SaveEntry {
        entry_id: Uuid,
        responder: oneshot::Sender<Result<PathBuf, AppError>>,
    },
    /// Stops the supervisor loop.
    Shutdown,
}
