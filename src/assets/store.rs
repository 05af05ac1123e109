use std::path::PathBuf;

use crate::foundation::names::is_plain_file_name;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A sound effect located on disk.
pub struct SoundAsset {
    /// Effect id as written in markup.
    pub id: String,
    /// Source file.
    pub path: PathBuf,
    /// File extension the asset was found under, lowercase (`wav`, `mp3`, ...).
    pub format: String,
}

impl SoundAsset {
    /// WAV assets are copied as-is; anything else needs transcoding.
    pub fn is_wav(&self) -> bool {
        self.format == "wav"
    }
}

/// Resolves sound effect ids to audio files.
pub trait AssetStore: Send + Sync {
    fn resolve(&self, id: &str) -> Option<SoundAsset>;
}

/// Sound effects stored as `<root>/<id>.<format>`, looked up in format priority order.
#[derive(Clone, Debug)]
pub struct DirAssetStore {
    root: PathBuf,
    formats: Vec<String>,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>, formats: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            root: root.into(),
            formats: formats
                .into_iter()
                .map(|f| f.into().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl AssetStore for DirAssetStore {
    fn resolve(&self, id: &str) -> Option<SoundAsset> {
        if !is_plain_file_name(id) {
            return None;
        }
        self.formats.iter().find_map(|format| {
            let path = self.root.join(format!("{id}.{format}"));
            path.is_file().then(|| SoundAsset {
                id: id.to_owned(),
                path,
                format: format.clone(),
            })
        })
    }
}
