pub mod engine;
pub mod ffmpeg;
pub mod preset;
