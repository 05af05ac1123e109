#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use voxmark::{AudioEngine, Config, DirAssetStore, Preset, Synthesizer, VoiceEngine, VoxError, VoxResult};

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "voxmark_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Voice that "speaks" by writing `<speaker:text>` and knows a fixed set of speakers.
pub struct FakeVoice {
    known: HashSet<String>,
    speaker: Option<String>,
    pub spoken: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeVoice {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            speaker: None,
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl VoiceEngine for FakeVoice {
    fn active_speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    fn set_active_speaker(&mut self, name: &str) -> VoxResult<()> {
        if !self.known.contains(name) {
            return Err(VoxError::voice(format!("no model for '{name}'")));
        }
        self.speaker = Some(name.to_owned());
        Ok(())
    }

    fn synthesize(&mut self, text: &str) -> VoxResult<Vec<u8>> {
        let speaker = self
            .speaker
            .clone()
            .ok_or_else(|| VoxError::voice("no model loaded"))?;
        self.spoken
            .lock()
            .unwrap()
            .push((speaker.clone(), text.to_owned()));
        Ok(format!("<{speaker}:{text}>").into_bytes())
    }
}

/// Audio engine over plain bytes: concatenation appends, presets wrap as `name(...)`,
/// transcoding wraps as `wav(...)`. External filters use the real spawn path.
pub struct ByteAudio;

fn read(path: &Path) -> VoxResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| VoxError::audio(format!("read {}: {e}", path.display())))
}

fn write(path: &Path, bytes: Vec<u8>) -> VoxResult<()> {
    std::fs::write(path, bytes).map_err(|e| VoxError::audio(format!("write {}: {e}", path.display())))
}

fn wrap(label: &str, inner: Vec<u8>) -> Vec<u8> {
    let mut out = format!("{label}(").into_bytes();
    out.extend(inner);
    out.push(b')');
    out
}

impl AudioEngine for ByteAudio {
    fn concatenate(&self, inputs: &[&Path], output: &Path) -> VoxResult<()> {
        let mut out = Vec::new();
        for input in inputs {
            out.extend(read(input)?);
        }
        write(output, out)
    }

    fn apply_preset(&self, preset: &Preset, input: &Path, output: &Path) -> VoxResult<()> {
        write(output, wrap(preset.name, read(input)?))
    }

    fn transcode(&self, input: &Path, output: &Path) -> VoxResult<()> {
        write(output, wrap("wav", read(input)?))
    }
}

pub struct Fixture {
    pub root: PathBuf,
    pub config: Config,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let root = temp_dir(name);
        let config = Config {
            scratch_dir: root.join("scratch"),
            sound_effects_dir: root.join("sound-effects"),
            filters_dir: root.join("sound-filters"),
            ..Config::default()
        };
        std::fs::create_dir_all(&config.sound_effects_dir).unwrap();
        std::fs::create_dir_all(&config.filters_dir).unwrap();
        Self { root, config }
    }

    pub fn add_effect(&self, file_name: &str, bytes: &[u8]) {
        std::fs::write(self.config.sound_effects_dir.join(file_name), bytes).unwrap();
    }

    pub fn synthesizer(&self, voice: FakeVoice) -> Synthesizer {
        let assets = DirAssetStore::new(
            &self.config.sound_effects_dir,
            self.config.asset_formats.clone(),
        );
        Synthesizer::new(self.config.clone(), voice, assets, ByteAudio).unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub fn render_text(synth: &Synthesizer, markup: &str) -> Option<String> {
    let rendered = synth.render(markup).unwrap();
    rendered
        .artifact()
        .map(|path| String::from_utf8(std::fs::read(path).unwrap()).unwrap())
}
