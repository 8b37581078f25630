use crate::actors::messages::{AppError, PersonaCatalog, SupervisorMessage};
use crate::artifacts::{ArtifactHandle, ArtifactStore};
use crate::config::ChatConfig;
use crate::models::{ChatEntry, Persona, PersonaDraft};
use crate::responder::{ReplyRequest, Responder, TemplateResponder};
use crate::session::SessionState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, timeout, Duration};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// A handle to the chat supervisor.
///
/// The supervisor task is the single owner of the session state. Every call on
/// the handle becomes a message, so events are applied strictly in order.
#[derive(Clone)]
pub struct ChatSupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    request_timeout: Duration,
}

impl ChatSupervisorHandle {
    /// Spawns a supervisor backed by the template responder.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ChatConfig) -> Result<Self, AppError> {
        config.validate()?;
        let store = ArtifactStore::new();
        let responder = TemplateResponder::new(store.clone())?;
        Ok(Self::with_responder(config, Arc::new(responder), store))
    }

    /// Spawns a supervisor around any responder. `store` is where artifact
    /// URLs are resolved, normally the one the responder publishes into.
    pub fn with_responder<R: Responder>(
        config: ChatConfig,
        responder: Arc<R>,
        store: ArtifactStore,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let request_timeout = config.request_timeout();
        let runner = SupervisorRunner {
            receiver,
            state: SessionState::new(),
            responder,
            store,
            config,
        };
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            request_timeout,
        }
    }

    /// Enqueues `msg` and waits for its answer.
    ///
    /// Only the enqueue is bounded by the request timeout: once accepted, the
    /// runner always answers, and reply generation is bounded on its side.
    async fn call<T>(
        &self,
        msg: SupervisorMessage,
        recv: oneshot::Receiver<T>,
    ) -> Result<T, AppError> {
        timeout(self.request_timeout, self.sender.send(msg))
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?;
        recv.await.map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Sends a user message and waits for the assistant entry.
    ///
    /// Generation failures and overruns never surface here: they come back as
    /// the apology entry. Errors are limited to a blank message, a full queue
    /// or a dead supervisor.
    #[instrument(skip(self))]
    pub async fn process_message(&self, content: String) -> Result<ChatEntry, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ProcessUserMessage {
            content,
            responder: send,
        };
        self.call(msg, recv).await?
    }

    #[instrument(skip(self))]
    pub async fn select_persona(&self, persona_id: String) -> Result<Persona, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::SelectPersona {
            persona_id,
            responder: send,
        };
        self.call(msg, recv).await?
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_persona(&self, draft: PersonaDraft) -> Result<Persona, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::CreatePersona {
            draft,
            responder: send,
        };
        self.call(msg, recv).await?
    }

    pub async fn history(&self) -> Result<Vec<ChatEntry>, AppError> {
        let (send, recv) = oneshot::channel();
        self.call(SupervisorMessage::GetHistory { responder: send }, recv)
            .await
    }

    pub async fn personas(&self) -> Result<PersonaCatalog, AppError> {
        let (send, recv) = oneshot::channel();
        self.call(SupervisorMessage::GetPersonas { responder: send }, recv)
            .await
    }

    #[instrument(skip(self))]
    pub async fn open_artifact(&self, url: String) -> Result<ArtifactHandle, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::OpenArtifact {
            url,
            responder: send,
        };
        self.call(msg, recv).await?
    }

    /// Saves the artifact of a history entry into the configured downloads
    /// directory and returns the written path.
    #[instrument(skip(self))]
    pub async fn save_entry(&self, entry_id: Uuid) -> Result<PathBuf, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::SaveEntry {
            entry_id,
            responder: send,
        };
        self.call(msg, recv).await?
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct SupervisorRunner<R: Responder> {
    receiver: mpsc::Receiver<SupervisorMessage>,
    state: SessionState,
    responder: Arc<R>,
    store: ArtifactStore,
    config: ChatConfig,
}

impl<R: Responder> SupervisorRunner<R> {
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, SupervisorMessage::Shutdown) {
                info!("Supervisor shutting down...");
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Supervisor stopped");
    }

    async fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::ProcessUserMessage { content, responder } => {
                let result = self.handle_user_message(content).await;
                if let Err(e) = &result {
                    warn!(kind = e.kind(), "User message rejected: {}", e);
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::SelectPersona {
                persona_id,
                responder,
            } => {
                let result = self.state.select_persona(&persona_id).cloned();
                let _ = responder.send(result);
            }
            SupervisorMessage::CreatePersona { draft, responder } => {
                let result = self.state.create_persona(draft).cloned();
                if let Err(e) = &result {
                    warn!(kind = e.kind(), "Persona creation rejected: {}", e);
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::GetHistory { responder } => {
                let _ = responder.send(self.state.history().to_vec());
            }
            SupervisorMessage::GetPersonas { responder } => {
                let _ = responder.send(PersonaCatalog {
                    personas: self.state.personas().to_vec(),
                    selected_id: self.state.selected_persona().id.clone(),
                });
            }
            SupervisorMessage::OpenArtifact { url, responder } => {
                let _ = responder.send(self.store.open(&url));
            }
            SupervisorMessage::SaveEntry {
                entry_id,
                responder,
            } => {
                let _ = responder.send(self.save_entry(entry_id));
            }
            SupervisorMessage::Shutdown => {}
        }
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn handle_user_message(&mut self, content: String) -> Result<ChatEntry, AppError> {
        let text = self.state.apply_user_message(&content)?.content.clone();
        let persona = self.state.selected_persona().clone();
        info!(persona = %persona.id, "Supervisor received: {}", text);

        let request = ReplyRequest {
            text,
            persona,
            policy: self.config.capability_policy,
        };
        let delay = self.config.response_delay();
        let responder = Arc::clone(&self.responder);
        let generation = async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            responder.respond(request).await
        };

        let result = match timeout(self.config.request_timeout(), generation).await {
            Ok(result) => result,
            Err(elapsed) => Err(AppError::from(elapsed)),
        };
        let entry = match result {
            Ok(reply) => self.state.apply_assistant_message(reply),
            Err(e) => {
                error!(kind = e.kind(), "Error generating reply: {}", e);
                self.state.apply_failure()
            }
        };
        Ok(entry.clone())
    }

    fn save_entry(&self, entry_id: Uuid) -> Result<PathBuf, AppError> {
        let entry = self
            .state
            .history()
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| AppError::NotFound(format!("Entry not found: {}", entry_id)))?;
        let artifact = entry.artifact.as_ref().ok_or_else(|| {
            AppError::NotFound(format!(
                "Entry {} has no downloadable payload ({})",
                entry_id, entry.content_type
            ))
        })?;
        artifact.save_into(&self.config.downloads_dir)
    }
}
