// Compositor module - layered, priority-ordered frame composition
//
// The emulation thread builds a map of parts lists keyed by
// (priority, layer) and hands it over at VBlank-In; the renderer thread
// draws each key into a pooled layer texture and composites the pool in
// reverse priority order into the back display buffer.
//
// # Handoff discipline
//
// The shared slot holds at most one frame. `display_framebuffer` moves the
// new map in under the parts-list mutex and blocks on the condition
// variable until the renderer has drained it; the renderer moves the map
// out, renders, then empties the slot and notifies. The emulation thread
// therefore only ever suspends at a frame boundary, never mid-frame.

mod render;
mod texture_cache;

pub use render::{generate_vertex_indices_and_draw_ranges, DrawRange, Primitive};
pub use texture_cache::{Texture, TextureCache};

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::display::{DisplayBuffer, DisplayBufferType, LayerKey, PartsList};

/// Size of the layer texture pool
pub const MAX_LAYER_TEXTURES: usize = 20;

/// Lifecycle of one pooled layer texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerTextureStatus {
    /// Free for rendering
    Unused,
    /// Holds a still-valid layer from a previous frame
    Reuse,
    /// Stale; must be cleared before reuse
    ToClear,
}

/// One pooled layer texture (RGBA, Saturn resolution)
pub(crate) struct LayerTexture {
    pub data: Vec<u8>,
}

impl LayerTexture {
    fn new(width: u32, height: u32) -> Self {
        LayerTexture {
            data: vec![0; (width * height * 4) as usize],
        }
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }
}

/// The frame slot shared between the two threads
///
/// `rendering` stays true from the moment the renderer takes the map until
/// it finishes the frame, so the emulation thread cannot resume on a
/// spurious wakeup while the frame is still being drawn.
#[derive(Default)]
struct FrameSlot {
    parts: BTreeMap<LayerKey, PartsList>,
    rendering: bool,
}

#[derive(Default)]
struct SharedParts {
    slot: Mutex<FrameSlot>,
    data_condition: Condvar,
}

/// Emulation-thread handle to the compositor
///
/// Owns nothing but the shared slot and the stop flag, so the emulation
/// thread never touches renderer state.
#[derive(Clone)]
pub struct CompositorHandle {
    shared: Arc<SharedParts>,
    stop: Arc<AtomicBool>,
}

impl CompositorHandle {
    /// Hand the frame's parts map to the renderer and wait until it has
    /// been consumed
    ///
    /// Called on VBlank-In. If the previous frame is somehow still in the
    /// slot the new one is dropped, matching the single-slot discipline.
    pub fn display_framebuffer(&self, global_parts_list: BTreeMap<LayerKey, PartsList>) {
        if self.stop.load(Ordering::Acquire) {
            return;
        }

        let mut slot = self.shared.slot.lock().unwrap();
        if !slot.parts.is_empty() || slot.rendering {
            log::warn!("Compositor slot still full, dropping frame");
            return;
        }
        slot.parts = global_parts_list;
        self.shared.data_condition.notify_all();

        let _unused = self
            .shared
            .data_condition
            .wait_while(slot, |s| {
                (!s.parts.is_empty() || s.rendering) && !self.stop.load(Ordering::Acquire)
            })
            .unwrap();
    }

    /// Cooperative shutdown: the renderer returns after its current frame
    /// and any blocked emulation thread resumes
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        self.shared.data_condition.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// The renderer-side compositor
pub struct Compositor {
    shared: Arc<SharedParts>,
    stop: Arc<AtomicBool>,
    texture_cache: Arc<Mutex<TextureCache>>,

    width: u32,
    height: u32,
    pool: Vec<LayerTexture>,
    pool_status: Vec<LayerTextureStatus>,
    /// Which pooled texture currently holds a (priority, layer) key
    key_to_pool_index: BTreeMap<LayerKey, usize>,

    /// Front/back display buffer plus the two debug overlays
    pub display: DisplayBuffer,
}

impl Compositor {
    pub fn new() -> Self {
        Self::with_resolution(320, 224)
    }

    pub fn with_resolution(width: u32, height: u32) -> Self {
        Compositor {
            shared: Arc::new(SharedParts::default()),
            stop: Arc::new(AtomicBool::new(false)),
            texture_cache: Arc::new(Mutex::new(TextureCache::new())),
            width,
            height,
            pool: (0..MAX_LAYER_TEXTURES)
                .map(|_| LayerTexture::new(width, height))
                .collect(),
            pool_status: vec![LayerTextureStatus::Unused; MAX_LAYER_TEXTURES],
            key_to_pool_index: BTreeMap::new(),
            display: DisplayBuffer::new(width, height),
        }
    }

    /// Handle for the emulation thread
    pub fn handle(&self) -> CompositorHandle {
        CompositorHandle {
            shared: Arc::clone(&self.shared),
            stop: Arc::clone(&self.stop),
        }
    }

    /// The texture cache shared with the VDP2 frame build
    pub fn texture_cache(&self) -> Arc<Mutex<TextureCache>> {
        Arc::clone(&self.texture_cache)
    }

    /// Insert or replace a cached texture
    pub fn add_or_update_texture(&self, texture: Texture) {
        self.texture_cache.lock().unwrap().add_or_update_texture(texture);
    }

    /// Drop the link to a cached texture
    pub fn remove_texture_link(&self, key: u64) {
        self.texture_cache.lock().unwrap().remove_texture_link(key);
    }

    /// Resize the pool and display buffer to a new Saturn resolution
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pool = (0..MAX_LAYER_TEXTURES)
            .map(|_| LayerTexture::new(width, height))
            .collect();
        self.pool_status = vec![LayerTextureStatus::Unused; MAX_LAYER_TEXTURES];
        self.key_to_pool_index.clear();
        self.display.resize(width, height);
    }

    /// Statuses of the pooled textures (debug surface)
    pub fn pool_status(&self) -> &[LayerTextureStatus] {
        &self.pool_status
    }

    /// Number of keys currently holding a pooled texture
    pub fn mapped_key_count(&self) -> usize {
        self.key_to_pool_index.len()
    }

    /// Swap the front/back display buffers
    pub fn switch_rendered_buffer(&mut self) {
        self.display.switch_rendered_buffer();
    }

    /// Run frames until a stop is requested
    pub fn render_loop(&mut self) {
        while !self.stop.load(Ordering::Acquire) {
            self.render();
        }
    }

    /// Render one frame: wait for a parts map, draw each key to a pooled
    /// texture, composite in reverse priority order, notify the emulation
    /// thread
    pub fn render(&mut self) {
        let global_parts_list = {
            let slot = self.shared.slot.lock().unwrap();
            let mut slot = self
                .shared
                .data_condition
                .wait_while(slot, |s| {
                    s.parts.is_empty() && !self.stop.load(Ordering::Acquire)
                })
                .unwrap();
            slot.rendering = !slot.parts.is_empty();
            std::mem::take(&mut slot.parts)
        };
        if global_parts_list.is_empty() {
            // Woken for shutdown
            return;
        }

        // Drop textures the frame build marked stale
        self.texture_cache.lock().unwrap().clean();

        // Step 1: regenerated keys invalidate their pooled texture
        for key in global_parts_list.keys() {
            if let Some(&index) = self.key_to_pool_index.get(key) {
                self.pool_status[index] = LayerTextureStatus::ToClear;
            }
        }

        // Step 2: clear all stale textures in one pass
        for (index, status) in self.pool_status.iter_mut().enumerate() {
            if *status == LayerTextureStatus::ToClear {
                self.pool[index].clear();
                *status = LayerTextureStatus::Unused;
            }
        }

        // Step 3: render each key to the first unused texture
        for (key, parts) in &global_parts_list {
            self.render_to_available_texture(*key, parts);
        }

        // Step 4: prune keys that no longer hold a texture
        let pool_status = &self.pool_status;
        self.key_to_pool_index
            .retain(|_, index| pool_status[*index] == LayerTextureStatus::Reuse);

        self.composite();

        // Frame is done: release the slot and wake the emulation thread
        let mut slot = self.shared.slot.lock().unwrap();
        slot.rendering = false;
        self.shared.data_condition.notify_all();
    }

    /// Render one key's parts list into the first unused pooled texture
    ///
    /// Pool exhaustion skips the key; the layer is missing for one frame.
    fn render_to_available_texture(&mut self, key: LayerKey, parts_list: &PartsList) {
        let Some(index) = self
            .pool_status
            .iter()
            .position(|&s| s == LayerTextureStatus::Unused)
        else {
            log::warn!(
                "No layer texture available in the pool, skipping [priority={}, layer={}]",
                key.priority,
                key.layer.name()
            );
            return;
        };

        log::debug!(
            "Rendering key [priority={}, layer={}] to pool index {}",
            key.priority,
            key.layer.name(),
            index
        );

        let cache = self.texture_cache.lock().unwrap();
        render::render_parts(
            parts_list,
            &mut self.pool[index].data,
            self.width,
            self.height,
            &cache,
        );
        drop(cache);

        self.pool_status[index] = LayerTextureStatus::Reuse;
        self.key_to_pool_index.insert(key, index);
    }

    /// Blit the pooled textures to the current display buffer, highest
    /// priority last so it ends up on top (reverse key order, since keys
    /// sort ascending)
    fn composite(&mut self) {
        let target_type = self.display.current_rendered_buffer();
        self.display.clear(target_type);

        let width = self.width;
        let height = self.height;

        // BTreeMap iterates keys in ascending (priority, layer) order; the
        // reverse pass draws front-most layers first and the blend keeps
        // what is already there on top.
        for (_key, &index) in self.key_to_pool_index.iter().rev() {
            let source = &self.pool[index];
            let target = self.display.layer_mut(target_type);
            blend_one_minus_src_alpha(&source.data, target, width, height);
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// src-alpha / one-minus-src-alpha blend of a full layer into the target,
/// with the target acting as the farther plane (under-compositing, so the
/// reverse priority iteration keeps front layers in front)
fn blend_one_minus_src_alpha(source: &[u8], target: &mut [u8], width: u32, height: u32) {
    let pixels = (width * height) as usize;
    for i in 0..pixels {
        let offset = i * 4;
        let dst_alpha = u16::from(target[offset + 3]);
        if dst_alpha == 0xFF {
            // Fully covered by nearer layers already
            continue;
        }
        let src = &source[offset..offset + 4];
        let src_alpha = u16::from(src[3]);
        if src_alpha == 0 {
            continue;
        }

        let remaining = 255 - dst_alpha;
        for channel in 0..4 {
            let contribution = u16::from(src[channel]) * src_alpha / 255 * remaining / 255;
            let combined = u16::from(target[offset + channel]) + contribution;
            target[offset + channel] = combined.min(255) as u8;
        }
    }
}
