use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{VoxError, VoxResult};
use crate::foundation::names::is_plain_file_name;
use crate::voice::VoiceEngine;

/// Voice engine backed by an external text-to-speech program.
///
/// Each speaker is a model file `<models_dir>/<speaker>`. Synthesis runs
/// `<program> <model path>` with the text on stdin and expects WAV bytes on stdout.
pub struct ProgramVoice {
    program: PathBuf,
    models_dir: PathBuf,
    speaker: Option<String>,
    model: Option<PathBuf>,
}

impl ProgramVoice {
    pub fn new(program: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            models_dir: models_dir.into(),
            speaker: None,
            model: None,
        }
    }

    pub fn model_path(&self, speaker: &str) -> Option<PathBuf> {
        is_plain_file_name(speaker).then(|| self.models_dir.join(speaker))
    }
}

impl VoiceEngine for ProgramVoice {
    fn active_speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    fn set_active_speaker(&mut self, name: &str) -> VoxResult<()> {
        let model = self
            .model_path(name)
            .ok_or_else(|| VoxError::voice(format!("invalid speaker name '{name}'")))?;
        if !model.is_file() {
            return Err(VoxError::voice(format!(
                "no voice model for speaker '{name}' at '{}'",
                model.display()
            )));
        }
        self.speaker = Some(name.to_owned());
        self.model = Some(model);
        Ok(())
    }

    fn synthesize(&mut self, text: &str) -> VoxResult<Vec<u8>> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| VoxError::voice("no voice model is loaded"))?;
        run_voice_program(&self.program, model, text)
    }
}

fn run_voice_program(program: &Path, model: &Path, text: &str) -> VoxResult<Vec<u8>> {
    let mut child = Command::new(program)
        .arg(model)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            VoxError::voice(format!(
                "failed to spawn voice program '{}': {e}",
                program.display()
            ))
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| VoxError::voice("failed to open voice program stdin (unexpected)"))?;
    let text = text.to_owned();
    let feeder = std::thread::spawn(move || stdin.write_all(text.as_bytes()));

    let out = child
        .wait_with_output()
        .map_err(|e| VoxError::voice(format!("failed to wait for voice program: {e}")))?;
    let fed = feeder
        .join()
        .map_err(|_| VoxError::voice("voice program stdin writer panicked"))?;

    if !out.status.success() {
        return Err(VoxError::voice(format!(
            "voice program exited with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    fed.map_err(|e| VoxError::voice(format!("failed to write text to voice program: {e}")))?;
    if out.stdout.is_empty() {
        return Err(VoxError::voice("voice program produced no audio"));
    }
    Ok(out.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_fails_switch_and_keeps_state() {
        let mut voice = ProgramVoice::new("tts", std::env::temp_dir().join("voxmark_no_models"));
        assert!(voice.set_active_speaker("udisen").is_err());
        assert_eq!(voice.active_speaker(), None);
    }

    #[test]
    fn synthesize_without_model_fails() {
        let mut voice = ProgramVoice::new("tts", "models");
        let err = voice.synthesize("hello").unwrap_err();
        assert!(err.to_string().contains("no voice model"));
    }

    #[test]
    fn speaker_names_cannot_escape_models_dir() {
        let voice = ProgramVoice::new("tts", "models");
        assert_eq!(voice.model_path("../x"), None);
        assert_eq!(voice.model_path("peroni"), Some(PathBuf::from("models/peroni")));
    }
}
