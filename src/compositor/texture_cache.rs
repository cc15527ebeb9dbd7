// Texture cache
//
// Pixel data decoded from VRAM, keyed by an opaque hash of its source
// parameters. The cache is shared between the emulation thread (which
// inserts and marks entries for discard during the frame build) and the
// renderer thread (which samples from it); both take the cache mutex, GPU
// uploads never happen on the emulation side.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::display::VdpType;

/// A decoded RGBA texture
#[derive(Debug, Clone)]
pub struct Texture {
    pub key: u64,
    pub vdp_type: VdpType,
    pub width: u32,
    pub height: u32,
    /// RGBA8888 pixel data, row major
    pub data: Vec<u8>,
}

impl Texture {
    pub fn new(key: u64, vdp_type: VdpType, width: u32, height: u32, data: Vec<u8>) -> Self {
        Texture {
            key,
            vdp_type,
            width,
            height,
            data,
        }
    }

    /// Compute the cache key of a texture from its source parameters
    pub fn calculate_key(vdp_type: VdpType, address: u32, color_bits: u32, palette: u16) -> u64 {
        let mut hasher = DefaultHasher::new();
        match vdp_type {
            VdpType::Vdp1 => 1u8.hash(&mut hasher),
            VdpType::Vdp2Cell => 2u8.hash(&mut hasher),
            VdpType::Vdp2Bitmap => 3u8.hash(&mut hasher),
        }
        address.hash(&mut hasher);
        color_bits.hash(&mut hasher);
        palette.hash(&mut hasher);
        hasher.finish()
    }
}

/// The key -> texture store with per-type discard marking
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: HashMap<u64, Texture>,
    /// Keys marked for deletion; drained by the renderer thread
    discarded: Vec<u64>,
}

impl TextureCache {
    pub fn new() -> Self {
        TextureCache::default()
    }

    pub fn contains(&self, key: u64) -> bool {
        self.textures.contains_key(&key)
    }

    /// Insert or replace a texture
    pub fn add_or_update_texture(&mut self, texture: Texture) {
        self.textures.insert(texture.key, texture);
    }

    /// Drop the link to a texture
    pub fn remove_texture_link(&mut self, key: u64) {
        self.textures.remove(&key);
    }

    pub fn get(&self, key: u64) -> Option<&Texture> {
        self.textures.get(&key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Mark every texture of a type for discard
    ///
    /// Called by the emulation thread when the dirty tracking invalidates a
    /// screen; the stale entries are dropped on the next `clean` call.
    pub fn discard_by_type(&mut self, vdp_type: VdpType) {
        let keys: Vec<u64> = self
            .textures
            .values()
            .filter(|t| t.vdp_type == vdp_type)
            .map(|t| t.key)
            .collect();
        self.discarded.extend(keys);
    }

    /// Delete every texture marked for discard
    pub fn clean(&mut self) {
        let discarded = std::mem::take(&mut self.discarded);
        for key in discarded {
            self.textures.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_stable_and_parameter_sensitive() {
        let a = Texture::calculate_key(VdpType::Vdp2Cell, 0x1000, 4, 3);
        let b = Texture::calculate_key(VdpType::Vdp2Cell, 0x1000, 4, 3);
        let c = Texture::calculate_key(VdpType::Vdp2Cell, 0x1000, 4, 4);
        assert_eq!(a, b, "same parameters should produce the same key");
        assert_ne!(a, c, "different palette should produce a different key");
    }

    #[test]
    fn test_discard_by_type_then_clean() {
        let mut cache = TextureCache::new();
        cache.add_or_update_texture(Texture::new(1, VdpType::Vdp2Cell, 8, 8, vec![0; 256]));
        cache.add_or_update_texture(Texture::new(2, VdpType::Vdp2Bitmap, 8, 8, vec![0; 256]));

        cache.discard_by_type(VdpType::Vdp2Cell);
        assert_eq!(cache.len(), 2, "marking must not delete immediately");

        cache.clean();
        assert!(!cache.contains(1));
        assert!(cache.contains(2));
    }
}
