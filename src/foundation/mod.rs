pub mod config;
pub mod error;
pub(crate) mod names;
