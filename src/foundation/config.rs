use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::foundation::error::{VoxError, VoxResult};

/// Sample rate of intermediate and final audio.
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

/// Runtime configuration for a [`Synthesizer`](crate::Synthesizer).
///
/// Every field has a default, so a config file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Speaker used for text before the first `name:` switch.
    pub default_speaker: String,
    /// Root directory for per-render scratch files.
    pub scratch_dir: PathBuf,
    /// Directory holding pre-recorded sound effects named `<id>.<ext>`.
    pub sound_effects_dir: PathBuf,
    /// Sound effect file extensions, in lookup priority order.
    pub asset_formats: Vec<String>,
    /// Directory searched for external filter programs named after the filter id.
    pub filters_dir: PathBuf,
    /// Directory holding one voice model file per speaker.
    pub models_dir: PathBuf,
    /// Text-to-speech program invoked as `<program> <model path>`.
    pub voice_program: PathBuf,
    /// `ffmpeg` executable used for concatenation, presets and transcoding.
    pub ffmpeg: PathBuf,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Render sibling nodes concurrently.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_speaker: "udisen".to_owned(),
            scratch_dir: PathBuf::from(".buffer"),
            sound_effects_dir: PathBuf::from("sound-effects"),
            asset_formats: vec!["wav".to_owned(), "mp3".to_owned()],
            filters_dir: PathBuf::from("sound-filters"),
            models_dir: PathBuf::from("models"),
            voice_program: PathBuf::from("tts"),
            ffmpeg: PathBuf::from("ffmpeg"),
            sample_rate: DEFAULT_SAMPLE_RATE,
            parallel: false,
            threads: None,
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> VoxResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> VoxResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| VoxError::config(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> VoxResult<()> {
        if self.default_speaker.trim().is_empty() {
            return Err(VoxError::config("default_speaker must be non-empty"));
        }
        if self.sample_rate == 0 {
            return Err(VoxError::config("sample_rate must be non-zero"));
        }
        if self.asset_formats.is_empty() {
            return Err(VoxError::config("asset_formats must list at least one format"));
        }
        if self.asset_formats.iter().any(|f| f.is_empty() || f.contains(['/', '\\', '.'])) {
            return Err(VoxError::config(
                "asset_formats entries must be bare extensions like \"wav\"",
            ));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(VoxError::config("threads must be >= 1 when set"));
        }
        Ok(())
    }
}
