use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::store::AssetStore;
use crate::audio::engine::{AudioEngine, FilterExit, ensure_parent_dir};
use crate::audio::preset::preset;
use crate::foundation::error::{VoxError, VoxResult};
use crate::foundation::names::is_plain_file_name;
use crate::tree::node::{Node, NodeKind};
use crate::voice::SharedVoice;

/// Collaborators and settings a render runs against.
pub struct Renderer<'a> {
    pub voice: &'a SharedVoice,
    pub assets: &'a dyn AssetStore,
    pub audio: &'a dyn AudioEngine,
    /// Directory searched for external filter programs.
    pub filters_dir: &'a Path,
    /// Render the children of a group concurrently.
    pub parallel: bool,
}

impl Renderer<'_> {
    /// Render a named tree bottom-up. `true` means `node.outfile()` now holds audio.
    ///
    /// Failures stay local: a failed node is logged and skipped by its parent group.
    pub fn render(&self, node: &Node) -> bool {
        let Some(outfile) = node.outfile() else {
            tracing::warn!("node has no outfile; was the tree named?");
            return false;
        };
        match self.render_node(node, outfile) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(outfile = %outfile.display(), error = %e, "node dropped");
                false
            }
        }
    }

    fn render_node(&self, node: &Node, outfile: &Path) -> VoxResult<bool> {
        match &node.kind {
            NodeKind::Speech { speaker, text } => {
                tracing::debug!(speaker = %speaker, text = %text, "synthesizing speech");
                let audio = self.voice.speak(speaker, text)?;
                ensure_parent_dir(outfile)?;
                std::fs::write(outfile, audio).map_err(|e| {
                    VoxError::voice(format!(
                        "failed to write speech to '{}': {e}",
                        outfile.display()
                    ))
                })?;
                Ok(true)
            }
            NodeKind::SoundEffect { id } => {
                tracing::debug!(id = %id, "inserting sound effect");
                let Some(asset) = self.assets.resolve(id) else {
                    return Err(VoxError::asset(format!("sound effect '{id}' not found")));
                };
                self.audio.materialize(&asset, outfile)?;
                Ok(true)
            }
            NodeKind::Group(children) => self.render_group(children, outfile),
            NodeKind::SoundFilter { id, child } => {
                if !self.render(child) {
                    return Ok(false);
                }
                let input = child
                    .outfile()
                    .ok_or_else(|| VoxError::audio("filter child has no outfile"))?;
                tracing::debug!(filter = %id, "applying filter");
                self.apply_filter(id, input, outfile)?;
                Ok(true)
            }
        }
    }

    fn render_group(&self, children: &[Node], outfile: &Path) -> VoxResult<bool> {
        let rendered: Vec<bool> = if self.parallel {
            children.par_iter().map(|c| self.render(c)).collect()
        } else {
            children.iter().map(|c| self.render(c)).collect()
        };
        let parts: Vec<&Path> = children
            .iter()
            .zip(rendered)
            .filter(|(_, ok)| *ok)
            .filter_map(|(c, _)| c.outfile())
            .collect();

        match parts.as_slice() {
            [] => Ok(false),
            [only] => {
                self.audio.copy(only, outfile)?;
                Ok(true)
            }
            _ => {
                self.audio.concatenate(&parts, outfile)?;
                Ok(true)
            }
        }
    }

    /// External program first, then the preset catalog, then pass-through.
    fn apply_filter(&self, id: &str, input: &Path, output: &Path) -> VoxResult<()> {
        if let Some(program) = self.filter_program(id) {
            match self.audio.run_external_filter(&program, input, output)? {
                FilterExit::Success => return Ok(()),
                FilterExit::Failed { status } => {
                    return Err(VoxError::audio(format!(
                        "filter program '{}' failed: {status}",
                        program.display()
                    )));
                }
                FilterExit::Unavailable { reason } => {
                    tracing::warn!(
                        program = %program.display(),
                        reason = %reason,
                        "filter program unavailable; passing audio through"
                    );
                    return self.audio.copy(input, output);
                }
            }
        }

        match preset(id) {
            Some(p) => self.audio.apply_preset(p, input, output),
            None => {
                tracing::warn!(filter = %id, "unknown filter; passing audio through");
                self.audio.copy(input, output)
            }
        }
    }

    fn filter_program(&self, id: &str) -> Option<PathBuf> {
        if !is_plain_file_name(id) {
            return None;
        }
        let path = self.filters_dir.join(id);
        path.is_file().then_some(path)
    }
}
