//! Resource registry: opaque texture and sound handles keyed by name.
//!
//! The compositor consumes resources strictly through handles; it never sees
//! decoded pixel or sample data. Handles are content-addressed from the
//! resource metadata, so registering the same resource twice deduplicates.
//!
//! # Layout
//! The registry can be persisted to disk as a JSON manifest for inspection.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed handle to a registered texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Content-addressed handle to a registered sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundHandle(pub u64);

/// Texture metadata. The renderer only needs dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Sound metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundDesc {
    pub name: String,
    pub duration_ms: u32,
}

/// Errors from resource operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("texture not found: {0}")]
    TextureNotFound(String),
    #[error("sound not found: {0}")]
    SoundNotFound(String),
}

/// Name-keyed resource registry.
///
/// `texture(name)` / `sound(name)` are the narrow interface the rest of the
/// engine consumes; everything behind the handle stays opaque.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceStore {
    textures: BTreeMap<TextureHandle, TextureDesc>,
    sounds: BTreeMap<SoundHandle, SoundDesc>,
    texture_names: BTreeMap<String, TextureHandle>,
    sound_names: BTreeMap<String, SoundHandle>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its handle. Same metadata, same handle.
    pub fn register_texture(&mut self, desc: TextureDesc) -> TextureHandle {
        let handle = TextureHandle(content_hash(&[
            desc.name.as_bytes(),
            &desc.width.to_le_bytes(),
            &desc.height.to_le_bytes(),
        ]));
        tracing::debug!(name = %desc.name, ?handle, "texture registered");
        self.texture_names.insert(desc.name.clone(), handle);
        self.textures.insert(handle, desc);
        handle
    }

    /// Register a sound and return its handle.
    pub fn register_sound(&mut self, desc: SoundDesc) -> SoundHandle {
        let handle = SoundHandle(content_hash(&[
            desc.name.as_bytes(),
            &desc.duration_ms.to_le_bytes(),
        ]));
        tracing::debug!(name = %desc.name, ?handle, "sound registered");
        self.sound_names.insert(desc.name.clone(), handle);
        self.sounds.insert(handle, desc);
        handle
    }

    /// Look up a texture handle by name.
    pub fn texture(&self, name: &str) -> Result<TextureHandle, AssetError> {
        self.texture_names
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::TextureNotFound(name.to_string()))
    }

    /// Look up a sound handle by name.
    pub fn sound(&self, name: &str) -> Result<SoundHandle, AssetError> {
        self.sound_names
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::SoundNotFound(name.to_string()))
    }

    /// Metadata for a texture handle.
    pub fn texture_info(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(&handle)
    }

    /// Metadata for a sound handle.
    pub fn sound_info(&self, handle: SoundHandle) -> Option<&SoundDesc> {
        self.sounds.get(&handle)
    }

    /// Register the builtin 1x1 white texture used for untextured quads.
    pub fn register_white(&mut self) -> TextureHandle {
        self.register_texture(TextureDesc {
            name: "white".into(),
            width: 1,
            height: 1,
        })
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Save the registry to a JSON manifest.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a registry from a JSON manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

fn content_hash(parts: &[&[u8]]) -> u64 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    u64::from_le_bytes(bytes)
}

pub fn crate_info() -> &'static str {
    "glint-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup_texture() {
        let mut store = ResourceStore::new();
        let handle = store.register_texture(TextureDesc {
            name: "tiles".into(),
            width: 256,
            height: 256,
        });
        assert_eq!(store.texture("tiles").unwrap(), handle);
        assert_eq!(store.texture_info(handle).unwrap().width, 256);
    }

    #[test]
    fn register_and_lookup_sound() {
        let mut store = ResourceStore::new();
        let handle = store.register_sound(SoundDesc {
            name: "jump".into(),
            duration_ms: 300,
        });
        assert_eq!(store.sound("jump").unwrap(), handle);
    }

    #[test]
    fn unknown_names_error() {
        let store = ResourceStore::new();
        assert!(matches!(
            store.texture("missing"),
            Err(AssetError::TextureNotFound(_))
        ));
        assert!(matches!(
            store.sound("missing"),
            Err(AssetError::SoundNotFound(_))
        ));
    }

    #[test]
    fn content_addressed_dedup() {
        let mut store = ResourceStore::new();
        let a = store.register_texture(TextureDesc {
            name: "tiles".into(),
            width: 64,
            height: 64,
        });
        let b = store.register_texture(TextureDesc {
            name: "tiles".into(),
            width: 64,
            height: 64,
        });
        assert_eq!(a, b);
        assert_eq!(store.texture_count(), 1);
    }

    #[test]
    fn white_texture_is_one_by_one() {
        let mut store = ResourceStore::new();
        let handle = store.register_white();
        let info = store.texture_info(handle).unwrap();
        assert_eq!((info.width, info.height), (1, 1));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut store = ResourceStore::new();
        store.register_texture(TextureDesc {
            name: "tiles".into(),
            width: 64,
            height: 64,
        });
        store.register_sound(SoundDesc {
            name: "jump".into(),
            duration_ms: 300,
        });
        store.save(tmp.path()).unwrap();

        let loaded = ResourceStore::load(tmp.path()).unwrap();
        assert_eq!(loaded.texture_count(), 1);
        assert_eq!(loaded.sound_count(), 1);
        assert!(loaded.texture("tiles").is_ok());
    }
}
