use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::assets::store::{AssetStore, DirAssetStore};
use crate::audio::engine::{AudioEngine, copy_file};
use crate::audio::ffmpeg::FfmpegAudioEngine;
use crate::foundation::config::Config;
use crate::foundation::error::{VoxError, VoxResult};
use crate::pipeline::compose_named;
use crate::render::renderer::Renderer;
use crate::voice::program::ProgramVoice;
use crate::voice::{SharedVoice, VoiceEngine};

/// Turns markup into audio files.
///
/// A synthesizer owns the collaborators and can be shared between threads; every render works
/// in its own scratch directory `<scratch_dir>/render-<pid>-<n>`, removed when the [`Rendered`]
/// result is dropped.
pub struct Synthesizer {
    config: Config,
    voice: SharedVoice,
    assets: Box<dyn AssetStore>,
    audio: Box<dyn AudioEngine>,
    pool: Option<rayon::ThreadPool>,
    renders: AtomicU64,
}

impl Synthesizer {
    pub fn new(
        config: Config,
        voice: impl VoiceEngine + 'static,
        assets: impl AssetStore + 'static,
        audio: impl AudioEngine + 'static,
    ) -> VoxResult<Self> {
        config.validate()?;
        let pool = if config.parallel {
            Some(build_thread_pool(config.threads)?)
        } else {
            None
        };
        Ok(Self {
            config,
            voice: SharedVoice::new(voice),
            assets: Box::new(assets),
            audio: Box::new(audio),
            pool,
            renders: AtomicU64::new(0),
        })
    }

    /// Synthesizer backed by the program voice, the directory asset store and `ffmpeg`.
    pub fn from_config(config: Config) -> VoxResult<Self> {
        let voice = ProgramVoice::new(&config.voice_program, &config.models_dir);
        let assets = DirAssetStore::new(&config.sound_effects_dir, config.asset_formats.clone());
        let audio = FfmpegAudioEngine::new(&config.ffmpeg, config.sample_rate);
        if !audio.is_available() {
            tracing::warn!(ffmpeg = %config.ffmpeg.display(), "ffmpeg not found; groups and presets will fail");
        }
        Self::new(config, voice, assets, audio)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render `markup` inside a fresh scratch directory.
    ///
    /// The finished artifact, if any, lives in that directory until the returned [`Rendered`] is
    /// dropped.
    #[tracing::instrument(skip(self, markup), fields(chars = markup.chars().count()))]
    pub fn render(&self, markup: &str) -> VoxResult<Rendered> {
        let mut rendered = Rendered {
            scratch: self.next_scratch_dir()?,
            artifact: None,
        };
        let root = compose_named(markup, &self.config.default_speaker, &rendered.scratch);
        tracing::debug!(nodes = root.preorder().len(), tree = %root, "composition ready");

        let renderer = Renderer {
            voice: &self.voice,
            assets: &*self.assets,
            audio: &*self.audio,
            filters_dir: &self.config.filters_dir,
            parallel: self.pool.is_some(),
        };
        let ok = match &self.pool {
            Some(pool) => pool.install(|| renderer.render(&root)),
            None => renderer.render(&root),
        };

        match (ok, root.outfile()) {
            (true, Some(out)) => {
                tracing::info!(out = %out.display(), "render finished");
                rendered.artifact = Some(out.to_path_buf());
            }
            _ => tracing::info!("no audio produced"),
        }
        Ok(rendered)
    }

    /// [`render`](Self::render), then copy the artifact to `out`. The scratch directory is removed
    /// before returning.
    pub fn render_to(&self, markup: &str, out: &Path) -> VoxResult<Option<PathBuf>> {
        let rendered = self.render(markup)?;
        let Some(artifact) = rendered.artifact() else {
            return Ok(None);
        };
        copy_file(artifact, out)?;
        Ok(Some(out.to_path_buf()))
    }

    fn next_scratch_dir(&self) -> VoxResult<PathBuf> {
        let n = self.renders.fetch_add(1, Ordering::Relaxed);
        let dir = self
            .config
            .scratch_dir
            .join(format!("render-{}-{n:04}", std::process::id()));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create scratch directory '{}'", dir.display()))?;
        Ok(dir)
    }
}

/// Result of [`Synthesizer::render`]. Owns the render's scratch directory and deletes it on drop.
#[derive(Debug)]
pub struct Rendered {
    scratch: PathBuf,
    artifact: Option<PathBuf>,
}

impl Rendered {
    /// Final audio inside the scratch directory, `None` when no part of the input produced audio.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }
}

impl Drop for Rendered {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.scratch)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(
                dir = %self.scratch.display(),
                error = %e,
                "failed to remove scratch directory"
            );
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> VoxResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| VoxError::config(format!("failed to build rayon thread pool: {e}")))
}
