use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::assets::store::SoundAsset;
use crate::audio::preset::Preset;
use crate::foundation::error::{VoxError, VoxResult};

/// Outcome of running an external filter program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterExit {
    /// Exit status zero.
    Success,
    /// The program ran and reported failure.
    Failed { status: String },
    /// The program could not be started: missing or not executable.
    Unavailable { reason: String },
}

/// Audio operations the renderer composes nodes with. Every operation writes `output`.
pub trait AudioEngine: Send + Sync {
    /// Join `inputs` end to end, in order.
    fn concatenate(&self, inputs: &[&Path], output: &Path) -> VoxResult<()>;

    fn apply_preset(&self, preset: &Preset, input: &Path, output: &Path) -> VoxResult<()>;

    /// Convert any decodable audio file to the scratch format.
    fn transcode(&self, input: &Path, output: &Path) -> VoxResult<()>;

    /// Place a sound asset at `output`, copying WAV files and transcoding anything else.
    fn materialize(&self, asset: &SoundAsset, output: &Path) -> VoxResult<()> {
        if asset.is_wav() {
            copy_file(&asset.path, output)
        } else {
            self.transcode(&asset.path, output)
        }
    }

    /// Pass audio through unchanged.
    fn copy(&self, input: &Path, output: &Path) -> VoxResult<()> {
        copy_file(input, output)
    }

    /// Run `<program> <input> <output>`.
    fn run_external_filter(
        &self,
        program: &Path,
        input: &Path,
        output: &Path,
    ) -> VoxResult<FilterExit> {
        spawn_filter_program(program, input, output)
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> VoxResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub fn copy_file(input: &Path, output: &Path) -> VoxResult<()> {
    ensure_parent_dir(output)?;
    std::fs::copy(input, output).map_err(|e| {
        VoxError::audio(format!(
            "failed to copy '{}' to '{}': {e}",
            input.display(),
            output.display()
        ))
    })?;
    Ok(())
}

/// Spawn a filter program and wait for it.
///
/// Spawn errors meaning "cannot run this" map to [`FilterExit::Unavailable`]; any other spawn
/// error is returned as `Err`.
pub fn spawn_filter_program(program: &Path, input: &Path, output: &Path) -> VoxResult<FilterExit> {
    ensure_parent_dir(output)?;
    let out = match Command::new(program)
        .arg(input)
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
    {
        Ok(out) => out,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            return Ok(FilterExit::Unavailable {
                reason: e.to_string(),
            });
        }
        Err(e) => {
            return Err(VoxError::audio(format!(
                "failed to run filter program '{}': {e}",
                program.display()
            )));
        }
    };

    if out.status.success() {
        return Ok(FilterExit::Success);
    }
    let stderr = String::from_utf8_lossy(&out.stderr);
    Ok(FilterExit::Failed {
        status: format!("{}: {}", out.status, stderr.trim()),
    })
}
