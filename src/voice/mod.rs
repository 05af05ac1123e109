//! Voice synthesis boundary.
//!
//! The engine is stateful (one speaker model loaded at a time) and expensive to switch, so the
//! renderer only reaches it through [`SharedVoice`], which serializes switch-and-synthesize.

pub mod program;

use std::sync::Mutex;

use crate::foundation::error::{VoxError, VoxResult};

/// A text-to-speech engine with one active speaker.
pub trait VoiceEngine: Send {
    /// Currently loaded speaker, if any.
    fn active_speaker(&self) -> Option<&str>;

    /// Load the model for `name`.
    fn set_active_speaker(&mut self, name: &str) -> VoxResult<()>;

    /// Synthesize `text` with the active speaker, returning WAV bytes.
    fn synthesize(&mut self, text: &str) -> VoxResult<Vec<u8>>;
}

/// A voice engine shared between renders.
pub struct SharedVoice {
    engine: Mutex<Box<dyn VoiceEngine>>,
}

impl SharedVoice {
    pub fn new(engine: impl VoiceEngine + 'static) -> Self {
        Self {
            engine: Mutex::new(Box::new(engine)),
        }
    }

    /// Switch to `speaker` unless already active, then synthesize `text`.
    ///
    /// The engine stays locked for both steps, so another render cannot switch the model in
    /// between.
    pub fn speak(&self, speaker: &str, text: &str) -> VoxResult<Vec<u8>> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| VoxError::voice("voice engine lock poisoned"))?;
        if engine.active_speaker() != Some(speaker) {
            tracing::debug!(speaker, "switching voice model");
            engine.set_active_speaker(speaker)?;
        }
        engine.synthesize(text)
    }
}
