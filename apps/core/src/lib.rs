//! HGPT Pro chat core.
//!
//! Simulated multi-persona assistant: keyword dispatch over user text,
//! template-generated games and code, and in-memory artifacts addressed by
//! ephemeral URLs. The chat session is owned by a supervisor actor.

pub mod actors;
pub mod artifacts;
pub mod brain;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod models;
pub mod responder;
pub mod session;
pub mod templates;

pub use actors::supervisor::ChatSupervisorHandle;
pub use config::{CapabilityPolicy, ChatConfig};
pub use error::AppError;

#[cfg(test)]
mod tests;
