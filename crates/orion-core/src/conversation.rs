//! Conversation state and the bounded interaction log.

use orion_schema::{LogEntry, Role, Turn};

/// Synthetic opening turn attributed to the user. Never typed by anyone; it
/// seeds the history so the first real exchange already alternates.
pub const BOOT_DIRECTIVE: &str =
    "Initialize \u{00c6}_UI_BLACK\u{2663}\u{2122} OS: V\u{03a9}.TITAN \u{2013} Sentient Edition. \
     Begin Commander Protocol.";

/// Canned greeting attributed to the assistant.
pub const GREETING: &str = "Greetings, Commander. Orion is now online and awaiting your command. \
     State \"AWAKEN THE TITAN\" to begin, or \"Hey Orion\" for a quick query.";

pub const SENDER_COMMANDER: &str = "Commander";
pub const SENDER_ORION: &str = "Orion";

const LOG_CAPACITY: usize = 20;

#[derive(Debug, thiserror::Error)]
#[error("conversation turns must alternate, got two {0:?} turns in a row")]
pub struct AlternationError(pub Role);

/// Strictly alternating turn history, always starting with the boot pair.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::user(BOOT_DIRECTIVE), Turn::model(GREETING)],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// History plus one pending user turn, for composing a completion request
    /// without committing the turn.
    pub fn with_pending_user(&self, text: &str) -> Vec<Turn> {
        let mut turns = self.turns.clone();
        turns.push(Turn::user(text));
        turns
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> Result<(), AlternationError> {
        self.append(Turn::user(text))
    }

    pub fn append_model(&mut self, text: impl Into<String>) -> Result<(), AlternationError> {
        self.append(Turn::model(text))
    }

    fn append(&mut self, turn: Turn) -> Result<(), AlternationError> {
        if let Some(last) = self.turns.last() {
            if last.role == turn.role {
                return Err(AlternationError(turn.role));
            }
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Drops everything back to the boot pair. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-capacity log of notable interactions, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    entries: Vec<LogEntry>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn record(&mut self, sender: &str, message: impl Into<String>) {
        self.entries.insert(0, LogEntry::new(sender, message));
        self.entries.truncate(LOG_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Clears the log, then records the single notice so the purge itself is
    /// still visible.
    pub fn purge_with_notice(&mut self, notice: &str) {
        self.entries.clear();
        self.record(SENDER_ORION, notice);
    }
}
