//! Orion core: command routing, conversation state, and the engine that
//! ties the hosted clients together.

pub mod config;
pub mod conversation;
pub mod directive;
pub mod engine;
pub mod intents;
pub mod persona;
pub mod router;

pub use config::{load_main_config, MainConfig};
pub use conversation::{Conversation, InteractionLog, BOOT_DIRECTIVE, GREETING};
pub use engine::{Engine, Reply};
pub use persona::{load_persona, DEFAULT_PERSONA};
pub use router::{CommandRouter, RouterResult};
