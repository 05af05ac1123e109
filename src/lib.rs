//! voxmark renders a small inline markup language into one composed audio file.
//!
//! ```text
//! alice: Hello there. [3] {1}This echoes.{.} bob: Hi!
//! ```
//!
//! - plain text is spoken by the current speaker, `name:` switches speaker
//! - `{N} ... {.}` applies filter `N` (a built-in preset or an external program) to the enclosed
//!   content; filters nest
//! - `[M]` inserts pre-recorded sound effect `M`
//!
//! The pipeline is lexer → parser → validator → namer → renderer. Voice synthesis, sound asset
//! lookup and audio processing sit behind the [`VoiceEngine`], [`AssetStore`] and
//! [`AudioEngine`] traits.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod audio;
pub mod markup;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod tree;
pub mod voice;

pub use crate::foundation::config::{Config, DEFAULT_SAMPLE_RATE};
pub use crate::foundation::error::{VoxError, VoxResult};

pub use crate::assets::store::{AssetStore, DirAssetStore, SoundAsset};
pub use crate::audio::engine::{AudioEngine, FilterExit};
pub use crate::audio::ffmpeg::FfmpegAudioEngine;
pub use crate::audio::preset::{EffectStep, PRESETS, Preset, preset};
pub use crate::markup::lexer::{Lexer, RawToken, lex};
pub use crate::markup::parser::{MAX_FILTER_DEPTH, parse};
pub use crate::pipeline::{compose, compose_named};
pub use crate::render::renderer::Renderer;
pub use crate::session::synthesizer::{Rendered, Synthesizer};
pub use crate::tree::naming::{assign_names, scratch_path};
pub use crate::tree::node::{Node, NodeKind};
pub use crate::tree::validate::{validate, validate_root};
pub use crate::voice::program::ProgramVoice;
pub use crate::voice::{SharedVoice, VoiceEngine};
