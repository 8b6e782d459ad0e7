//! The Orion engine: one command in, one reply out.
//!
//! The engine owns the conversation, the interaction log, and the clients.
//! Scripted intents resolve locally and never touch the turn history; only
//! delegated exchanges that complete successfully are committed to it.

use orion_memory::ChronoVault;
use orion_provider::{GeminiClient, ImagenClient, ProviderError};
use orion_schema::{MemoryFragment, SessionIdentity};
use orion_voice::Speech;

use crate::conversation::{Conversation, InteractionLog, SENDER_COMMANDER, SENDER_ORION};
use crate::directive::memory_directive;
use crate::router::{CommandRouter, RouterResult};

pub const COMPLETION_APOLOGY: &str = "My apologies, Commander. I could not synthesize a \
     response. My core might be experiencing temporary fluctuations.";
pub const TRANSPORT_APOLOGY: &str = "A critical communication error occurred, Commander. \
     Please verify my connection to the Quantum Nexus.";
pub const IMAGE_SUCCESS: &str =
    "Visual data synthesized, Commander. Displaying the rendition.";
pub const IMAGE_FAILURE_APOLOGY: &str = "My apologies, Commander. The Immersive Creativity \
     Engine failed to render the image. Neural pathways may be congested.";
pub const IMAGE_TRANSPORT_APOLOGY: &str =
    "A quantum fluctuation prevented image synthesis, Commander. Please try again.";
pub const ANALYSIS_FAILURE_APOLOGY: &str = "My apologies, Commander. Orion encountered an \
     anomaly during visual data analysis. The image content could not be fully processed.";
pub const ANALYSIS_TRANSPORT_APOLOGY: &str = "A critical error occurred during image \
     analysis, Commander. Please verify the image file.";
pub const RESET_NOTICE: &str = "Orion systems recalibrated. All temporary memory threads \
     purged. Ready to serve, Commander.";
pub const LOGS_PURGED_NOTICE: &str =
    "Interaction logs purged, Commander. A clean slate for new directives.";
pub const BUSY_NOTICE: &str =
    "One moment, Commander. I am still processing your previous directive.";
pub const VAULT_APOLOGY: &str =
    "My apologies, Commander. I encountered an error while attempting to store that memory.";

/// What the front-end renders for one handled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub image: Option<Vec<u8>>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

pub struct Engine {
    router: CommandRouter,
    persona: String,
    conversation: Conversation,
    logs: InteractionLog,
    gemini: GeminiClient,
    imagen: ImagenClient,
    vault: Option<ChronoVault>,
    identity: SessionIdentity,
    speech: Box<dyn Speech>,
    pub(crate) busy: bool,
}

impl Engine {
    pub fn new(
        persona: String,
        gemini: GeminiClient,
        imagen: ImagenClient,
        vault: Option<ChronoVault>,
        identity: SessionIdentity,
        speech: Box<dyn Speech>,
    ) -> Self {
        Self {
            router: CommandRouter::new(),
            persona,
            conversation: Conversation::new(),
            logs: InteractionLog::new(),
            gemini,
            imagen,
            vault,
            identity,
            speech,
            busy: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn logs(&self) -> &InteractionLog {
        &self.logs
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Handles one line of user input. Empty input yields no reply; while a
    /// previous command is still in flight the engine answers with a busy
    /// notice instead of processing.
    pub async fn handle_command(&mut self, input: &str) -> Option<Reply> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.busy {
            return Some(Reply::text(BUSY_NOTICE));
        }
        self.busy = true;

        self.logs.record(SENDER_COMMANDER, trimmed);

        let reply = match self.router.route(trimmed) {
            RouterResult::Scripted(text) => Reply::text(text),
            RouterResult::GenerateImage { prompt } => self.generate_image(&prompt).await,
            RouterResult::Delegate(raw) => self.delegate(&raw).await,
        };

        self.logs.record(SENDER_ORION, &reply.text);
        self.speak(&reply.text).await;
        self.busy = false;
        Some(reply)
    }

    /// Analyzes an uploaded image out of band; the turn history is not
    /// involved.
    pub async fn handle_upload(&mut self, image: &[u8], mime_type: &str) -> Reply {
        self.logs
            .record(SENDER_COMMANDER, format!("[uploaded image: {mime_type}]"));

        let reply = match self.gemini.analyze(image, mime_type).await {
            Ok(description) => {
                Reply::text(format!("Image Analysis Complete, Commander:\n\n{description}"))
            }
            Err(ProviderError::Network(e)) => {
                tracing::warn!("image analysis transport failure: {e}");
                Reply::text(ANALYSIS_TRANSPORT_APOLOGY)
            }
            Err(e) => {
                tracing::warn!("image analysis failed: {e}");
                Reply::text(ANALYSIS_FAILURE_APOLOGY)
            }
        };

        self.logs.record(SENDER_ORION, &reply.text);
        self.speak(&reply.text).await;
        reply
    }

    async fn generate_image(&mut self, prompt: &str) -> Reply {
        match self.imagen.generate(prompt).await {
            Ok(bytes) => Reply {
                text: IMAGE_SUCCESS.to_string(),
                image: Some(bytes),
            },
            Err(ProviderError::Network(e)) => {
                tracing::warn!("image synthesis transport failure: {e}");
                Reply::text(IMAGE_TRANSPORT_APOLOGY)
            }
            Err(e) => {
                tracing::warn!("image synthesis failed: {e}");
                Reply::text(IMAGE_FAILURE_APOLOGY)
            }
        }
    }

    /// Sends the history plus the pending user turn. Both turns are
    /// committed only when the completion succeeds, so a failed call leaves
    /// the history exactly as it was.
    async fn delegate(&mut self, raw: &str) -> Reply {
        let attempt = self.conversation.with_pending_user(raw);
        match self.gemini.complete(&attempt, &self.persona).await {
            Ok(model_turn) => {
                if let Err(e) = self.conversation.append_user(raw) {
                    tracing::error!("history invariant violated: {e}");
                }
                if let Err(e) = self.conversation.append_model(&model_turn.text) {
                    tracing::error!("history invariant violated: {e}");
                }
                self.store_memory_if_directed(raw).await;
                Reply::text(model_turn.text)
            }
            Err(ProviderError::Network(e)) => {
                tracing::warn!("completion transport failure: {e}");
                Reply::text(TRANSPORT_APOLOGY)
            }
            Err(e) => {
                tracing::warn!("completion failed: {e}");
                Reply::text(COMPLETION_APOLOGY)
            }
        }
    }

    async fn store_memory_if_directed(&mut self, raw: &str) {
        let Some(content) = memory_directive(&raw.to_lowercase()) else {
            return;
        };
        // the vault drops writes for unauthenticated identities, so a
        // success log here would confirm a store that never happened
        if !self.identity.authenticated {
            tracing::debug!("memory directive ignored, session unauthenticated");
            return;
        }
        let Some(vault) = &self.vault else {
            return;
        };
        match vault.store(&content, &self.identity).await {
            Ok(()) => {
                self.logs.record(
                    SENDER_ORION,
                    format!(
                        "Your directive to store \"{content}\" has been successfully logged \
                         into the Chrono Vault, Commander."
                    ),
                );
            }
            Err(e) => {
                tracing::warn!("chrono vault store failed: {e}");
                self.logs.record(SENDER_ORION, VAULT_APOLOGY);
            }
        }
    }

    /// Recalibration: drops the conversation back to the boot pair and
    /// empties the log. The notice is the reply, not a log entry.
    pub fn reset(&mut self) -> &'static str {
        self.conversation.reset();
        self.logs.clear();
        RESET_NOTICE
    }

    pub fn clear_logs(&mut self) -> &'static str {
        self.logs.purge_with_notice(LOGS_PURGED_NOTICE);
        LOGS_PURGED_NOTICE
    }

    pub async fn memories(&self) -> Vec<MemoryFragment> {
        let Some(vault) = &self.vault else {
            return Vec::new();
        };
        match vault.list(&self.identity).await {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::warn!("chrono vault list failed: {e}");
                Vec::new()
            }
        }
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.speech.speak(text).await {
            tracing::warn!("speech synthesis skipped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orion_voice::SilentSpeech;

    fn offline_engine() -> Engine {
        Engine::new(
            "You are Orion.".to_string(),
            GeminiClient::new("test-key", "test-model"),
            ImagenClient::new("test-key", "test-model"),
            None,
            SessionIdentity::anonymous(),
            Box::new(SilentSpeech),
        )
    }

    #[tokio::test]
    async fn empty_input_yields_no_reply() {
        let mut engine = offline_engine();
        assert!(engine.handle_command("   ").await.is_none());
        assert!(engine.logs().entries().is_empty());
    }

    #[tokio::test]
    async fn busy_engine_answers_with_notice() {
        let mut engine = offline_engine();
        engine.busy = true;
        let reply = engine.handle_command("dream engine").await.unwrap();
        assert_eq!(reply.text, BUSY_NOTICE);
        assert!(engine.logs().entries().is_empty());
    }

    #[tokio::test]
    async fn scripted_reply_leaves_history_untouched() {
        let mut engine = offline_engine();
        let reply = engine.handle_command("activate the dream engine").await.unwrap();
        assert!(reply.text.starts_with("Activating Dream Engine"));
        assert!(reply.image.is_none());
        assert_eq!(engine.conversation().len(), 2);
        // input and reply both logged, newest first
        assert_eq!(engine.logs().entries()[0].sender, SENDER_ORION);
        assert_eq!(engine.logs().entries()[1].sender, SENDER_COMMANDER);
    }

    #[tokio::test]
    async fn reset_restores_boot_state_with_empty_logs() {
        let mut engine = offline_engine();
        engine.handle_command("dream engine").await.unwrap();
        let notice = engine.reset();
        assert_eq!(notice, RESET_NOTICE);
        assert_eq!(engine.conversation().len(), 2);
        assert!(engine.logs().entries().is_empty());

        // a second reset yields the identical state
        engine.reset();
        assert_eq!(engine.conversation().len(), 2);
        assert!(engine.logs().entries().is_empty());
    }

    #[tokio::test]
    async fn clear_logs_leaves_conversation_alone() {
        let mut engine = offline_engine();
        engine.handle_command("dream engine").await.unwrap();
        engine.clear_logs();
        assert_eq!(engine.logs().entries().len(), 1);
        assert_eq!(engine.logs().entries()[0].message, LOGS_PURGED_NOTICE);
        assert_eq!(engine.conversation().len(), 2);
    }

    #[tokio::test]
    async fn memories_without_vault_is_empty() {
        let engine = offline_engine();
        assert!(engine.memories().await.is_empty());
    }
}
