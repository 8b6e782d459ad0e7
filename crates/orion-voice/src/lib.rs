//! Voice I/O adapter.
//!
//! Wraps a host speech-synthesis command behind the `Speech` trait. When the
//! host has no synthesizer the engine falls back to `SilentSpeech`; speech
//! failures are logged at the engine boundary and never block the reply.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech capability unavailable")]
    CapabilityUnavailable,
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

/// Selectable voice and locale for synthesis.
#[derive(Debug, Clone)]
pub struct VoiceProfile {
    pub voice: Option<String>,
    pub locale: String,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            voice: None,
            locale: "en-US".to_string(),
        }
    }
}

#[async_trait]
pub trait Speech: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;
}

/// No-op synthesizer used when speech is disabled or unavailable.
pub struct SilentSpeech;

#[async_trait]
impl Speech for SilentSpeech {
    async fn speak(&self, _text: &str) -> Result<(), VoiceError> {
        Ok(())
    }
}

const SYNTH_CANDIDATES: &[&str] = &["say", "espeak-ng", "espeak"];

/// Synthesizer backed by a host TTS command (`say` on macOS, `espeak` on
/// most Linux installs).
pub struct HostSynth {
    program: String,
    profile: VoiceProfile,
}

impl HostSynth {
    pub fn new(program: impl Into<String>, profile: VoiceProfile) -> Self {
        Self {
            program: program.into(),
            profile,
        }
    }

    /// Probes the host for a known synthesizer command.
    pub fn detect(profile: VoiceProfile) -> Option<Self> {
        SYNTH_CANDIDATES
            .iter()
            .find(|candidate| command_exists(candidate))
            .map(|program| Self::new(*program, profile))
    }

    fn voice_args(&self) -> Vec<String> {
        // `say` selects a named voice, the espeak family a language code
        if self.program.ends_with("say") {
            match &self.profile.voice {
                Some(voice) => vec!["-v".to_string(), voice.clone()],
                None => vec![],
            }
        } else {
            vec!["-v".to_string(), self.profile.locale.to_lowercase()]
        }
    }
}

#[async_trait]
impl Speech for HostSynth {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let output = Command::new(&self.program)
            .args(self.voice_args())
            .arg(text)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VoiceError::CapabilityUnavailable
                } else {
                    VoiceError::Synthesis(e.to_string())
                }
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(VoiceError::Synthesis(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

fn command_exists(name: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(Path::new(name)).is_file())
}
