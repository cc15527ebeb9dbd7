// Compositor handoff integration tests
//
// Drives a real renderer thread through the condition-variable handoff:
// the submitting side blocks until the frame was consumed, pooled textures
// end up in the expected statuses, and composition runs in reverse
// priority order.

use std::collections::BTreeMap;

use saturn_rs::compositor::{Compositor, LayerTextureStatus, Texture};
use saturn_rs::display::{
    ColorOffset, DisplayBufferType, LayerKey, PartsList, RenderPart, VdpLayer, VdpType,
};

/// An opaque full-screen quad of one color
fn colored_quad(width: i16, height: i16, rgba: [u8; 4], priority: u8) -> RenderPart {
    let mut part = RenderPart::textured_quad(
        0,
        0,
        width,
        height,
        VdpType::Vdp2Cell,
        priority,
        0,
        ColorOffset::default(),
    );
    part.draw_type = saturn_rs::display::DrawType::NonTexturedPolygon;
    for vertex in part.vertexes.iter_mut() {
        vertex.color.r = rgba[0];
        vertex.color.g = rgba[1];
        vertex.color.b = rgba[2];
        vertex.color.a = rgba[3];
    }
    part
}

fn key(priority: u8, layer: VdpLayer) -> LayerKey {
    LayerKey { priority, layer }
}

#[test]
fn test_frame_handoff_blocks_until_rendered() {
    let mut compositor = Compositor::with_resolution(32, 32);
    let handle = compositor.handle();

    let renderer = std::thread::spawn(move || {
        compositor.render();
        compositor
    });

    let mut map: BTreeMap<LayerKey, PartsList> = BTreeMap::new();
    map.insert(
        key(3, VdpLayer::Nbg0),
        vec![colored_quad(31, 31, [255, 0, 0, 255], 3)],
    );
    map.insert(
        key(5, VdpLayer::Nbg1),
        vec![colored_quad(15, 15, [0, 255, 0, 255], 5)],
    );
    map.insert(
        key(5, VdpLayer::Sprite),
        vec![colored_quad(7, 7, [0, 0, 255, 255], 5)],
    );

    // Returns only after the renderer drained and drew the frame
    handle.display_framebuffer(map);

    handle.request_stop();
    let compositor = renderer.join().expect("renderer thread finished");

    // Three keys hold pooled textures in 'reuse'
    let reused = compositor
        .pool_status()
        .iter()
        .filter(|&&s| s == LayerTextureStatus::Reuse)
        .count();
    assert_eq!(reused, 3, "one pooled texture per rendered key");
    assert_eq!(compositor.mapped_key_count(), 3);
}

#[test]
fn test_reverse_priority_composition() {
    let mut compositor = Compositor::with_resolution(32, 32);
    let handle = compositor.handle();

    let renderer = std::thread::spawn(move || {
        compositor.render();
        compositor
    });

    // Priority 5 layers cover the top-left corner; priority 3 covers all
    let mut map: BTreeMap<LayerKey, PartsList> = BTreeMap::new();
    map.insert(
        key(3, VdpLayer::Nbg0),
        vec![colored_quad(31, 31, [255, 0, 0, 255], 3)],
    );
    map.insert(
        key(5, VdpLayer::Nbg1),
        vec![colored_quad(15, 15, [0, 255, 0, 255], 5)],
    );
    map.insert(
        key(5, VdpLayer::Sprite),
        vec![colored_quad(7, 7, [0, 0, 255, 255], 5)],
    );

    handle.display_framebuffer(map);
    handle.request_stop();
    let compositor = renderer.join().unwrap();

    let target = compositor.display.layer(DisplayBufferType::BackBuffer);
    let pixel = |x: usize, y: usize| {
        let offset = (y * 32 + x) * 4;
        [
            target[offset],
            target[offset + 1],
            target[offset + 2],
            target[offset + 3],
        ]
    };

    // (5, Sprite) sorts above (5, Nbg1): the sprite owns the inner corner
    assert_eq!(pixel(2, 2), [0, 0, 255, 255], "sprite wins at equal priority");
    // Nbg1 at priority 5 beats Nbg0 at priority 3 where they overlap
    assert_eq!(pixel(10, 10), [0, 255, 0, 255]);
    // Only the priority 3 layer reaches the outer region
    assert_eq!(pixel(25, 25), [255, 0, 0, 255]);
}

#[test]
fn test_stale_keys_are_pruned_and_textures_recycled() {
    let mut compositor = Compositor::with_resolution(16, 16);
    let handle = compositor.handle();

    let renderer = std::thread::spawn(move || {
        // Two frames
        compositor.render();
        compositor.render();
        compositor
    });

    let mut first: BTreeMap<LayerKey, PartsList> = BTreeMap::new();
    first.insert(
        key(2, VdpLayer::Nbg2),
        vec![colored_quad(15, 15, [10, 10, 10, 255], 2)],
    );
    first.insert(
        key(6, VdpLayer::Nbg3),
        vec![colored_quad(15, 15, [20, 20, 20, 255], 6)],
    );
    handle.display_framebuffer(first);

    // The second frame only regenerates one of the keys
    let mut second: BTreeMap<LayerKey, PartsList> = BTreeMap::new();
    second.insert(
        key(2, VdpLayer::Nbg2),
        vec![colored_quad(15, 15, [30, 30, 30, 255], 2)],
    );
    handle.display_framebuffer(second);

    handle.request_stop();
    let compositor = renderer.join().unwrap();

    // The untouched key keeps its pooled texture, the regenerated one was
    // cleared and redrawn
    assert_eq!(compositor.mapped_key_count(), 2);
    let reused = compositor
        .pool_status()
        .iter()
        .filter(|&&s| s == LayerTextureStatus::Reuse)
        .count();
    assert_eq!(reused, 2);
}

#[test]
fn test_pool_exhaustion_skips_the_key() {
    let mut compositor = Compositor::with_resolution(8, 8);
    let handle = compositor.handle();

    let renderer = std::thread::spawn(move || {
        compositor.render();
        compositor
    });

    // More keys than the pool holds (every priority x several layers)
    let mut map: BTreeMap<LayerKey, PartsList> = BTreeMap::new();
    let layers = [
        VdpLayer::Nbg0,
        VdpLayer::Nbg1,
        VdpLayer::Nbg2,
        VdpLayer::Nbg3,
        VdpLayer::Rbg0,
        VdpLayer::Sprite,
    ];
    for priority in 1..=7u8 {
        for layer in layers {
            map.insert(
                key(priority, layer),
                vec![colored_quad(7, 7, [priority * 30, 0, 0, 255], priority)],
            );
        }
    }
    assert!(map.len() > saturn_rs::compositor::MAX_LAYER_TEXTURES);

    handle.display_framebuffer(map);
    handle.request_stop();
    let compositor = renderer.join().unwrap();

    assert_eq!(
        compositor.mapped_key_count(),
        saturn_rs::compositor::MAX_LAYER_TEXTURES,
        "keys beyond the pool are skipped for the frame"
    );
}

#[test]
fn test_switch_rendered_buffer_exposes_the_frame() {
    let mut compositor = Compositor::with_resolution(8, 8);

    assert_eq!(
        compositor.display.current_rendered_buffer(),
        DisplayBufferType::BackBuffer
    );
    compositor.switch_rendered_buffer();
    assert_eq!(
        compositor.display.displayed_buffer(),
        DisplayBufferType::BackBuffer,
        "the freshly rendered buffer becomes the displayed one"
    );
}

#[test]
fn test_texture_cache_is_shared() {
    let compositor = Compositor::with_resolution(8, 8);
    let cache = compositor.texture_cache();

    cache.lock().unwrap().add_or_update_texture(Texture::new(
        42,
        VdpType::Vdp2Cell,
        8,
        8,
        vec![0; 256],
    ));

    assert!(compositor.texture_cache().lock().unwrap().contains(42));
}
