use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::audio::engine::{AudioEngine, copy_file, ensure_parent_dir};
use crate::audio::preset::{EffectStep, Preset};
use crate::foundation::error::{VoxError, VoxResult};

/// [`AudioEngine`] that shells out to the system `ffmpeg`.
///
/// Every output is mono WAV at `sample_rate`.
#[derive(Clone, Debug)]
pub struct FfmpegAudioEngine {
    ffmpeg: PathBuf,
    sample_rate: u32,
}

impl FfmpegAudioEngine {
    pub fn new(ffmpeg: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            sample_rate,
        }
    }

    /// Return `true` when the configured `ffmpeg` can be invoked.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(&self, args: Vec<OsString>, output: &Path) -> VoxResult<()> {
        ensure_parent_dir(output)?;
        let out = Command::new(&self.ffmpeg)
            .args(["-y", "-loglevel", "error"])
            .args(args)
            .args([
                "-ar",
                &self.sample_rate.to_string(),
                "-ac",
                "1",
                "-c:a",
                "pcm_s16le",
            ])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                VoxError::audio(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;
        if !out.status.success() {
            return Err(VoxError::audio(format!(
                "ffmpeg exited with status {} writing '{}': {}",
                out.status,
                output.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl AudioEngine for FfmpegAudioEngine {
    fn concatenate(&self, inputs: &[&Path], output: &Path) -> VoxResult<()> {
        match inputs {
            [] => Err(VoxError::audio("nothing to concatenate")),
            [only] => copy_file(only, output),
            _ => {
                let mut args = Vec::with_capacity(inputs.len() * 2 + 4);
                for input in inputs {
                    args.push(OsString::from("-i"));
                    args.push(input.as_os_str().to_owned());
                }
                args.push("-filter_complex".into());
                args.push(concat_filter_graph(inputs.len(), self.sample_rate).into());
                args.push("-map".into());
                args.push("[out]".into());
                self.run(args, output)
            }
        }
    }

    fn apply_preset(&self, preset: &Preset, input: &Path, output: &Path) -> VoxResult<()> {
        let args = vec![
            OsString::from("-i"),
            input.as_os_str().to_owned(),
            "-af".into(),
            preset_filter_chain(preset, self.sample_rate).into(),
        ];
        self.run(args, output)
    }

    fn transcode(&self, input: &Path, output: &Path) -> VoxResult<()> {
        self.run(vec![OsString::from("-i"), input.as_os_str().to_owned()], output)
    }
}

/// `-filter_complex` graph that resamples every input to mono `sample_rate` and concatenates
/// them in input order into the `[out]` pad.
pub(crate) fn concat_filter_graph(inputs: usize, sample_rate: u32) -> String {
    let mut graph = String::new();
    for i in 0..inputs {
        graph.push_str(&format!(
            "[{i}:a]aresample={sample_rate},aformat=channel_layouts=mono[a{i}];"
        ));
    }
    for i in 0..inputs {
        graph.push_str(&format!("[a{i}]"));
    }
    graph.push_str(&format!("concat=n={inputs}:v=0:a=1[out]"));
    graph
}

/// `-af` chain for a preset.
pub(crate) fn preset_filter_chain(preset: &Preset, sample_rate: u32) -> String {
    preset
        .steps
        .iter()
        .map(|step| step_filter(step, sample_rate))
        .collect::<Vec<_>>()
        .join(",")
}

fn step_filter(step: &EffectStep, sample_rate: u32) -> String {
    match *step {
        EffectStep::Reverb {
            reverberance,
            room_scale,
            wet_gain_db,
        } => {
            // Two-tap echo: room size drives the delays, reverberance the decays.
            let delay = 20.0 + room_scale.clamp(0.0, 100.0) * 0.8;
            let decay = 0.1 + reverberance.clamp(0.0, 100.0) / 100.0 * 0.6;
            let out_gain = (0.8 * 10f32.powf(wet_gain_db / 20.0)).min(1.0);
            format!(
                "aecho=0.8:{out_gain:.3}:{delay:.0}|{:.0}:{decay:.3}|{:.3}",
                delay * 1.7,
                decay * 0.6
            )
        }
        EffectStep::Pitch { cents } => {
            let ratio = 2f32.powf(cents / 1200.0);
            format!(
                "aresample={sample_rate},asetrate={:.0},aresample={sample_rate},atempo={:.6}",
                sample_rate as f32 * ratio,
                1.0 / ratio
            )
        }
        EffectStep::HighPass { hz } => format!("highpass=f={hz}"),
        EffectStep::LowPass { hz } => format!("lowpass=f={hz}"),
        EffectStep::Gain { db } => format!("volume={db}dB"),
        EffectStep::Reverse => "areverse".to_owned(),
        EffectStep::Chorus {
            in_gain,
            out_gain,
            delay_ms,
            decay,
            speed_hz,
            depth_ms,
        } => format!("chorus={in_gain}:{out_gain}:{delay_ms}:{decay}:{speed_hz}:{depth_ms}"),
        EffectStep::Tempo { factor } => format!("atempo={factor}"),
    }
}
