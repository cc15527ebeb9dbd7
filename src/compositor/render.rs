// Parts rendering
//
// Software rasterization of parts lists into RGBA layer textures, plus the
// draw-range batching that groups consecutive parts of the same primitive
// class into single submissions. The four primitive classes map to two
// triangles per quad, a closed loop for polylines and a plain segment for
// lines.

use crate::display::{apply_color_offset, DrawType, PartsList, RenderPart, Vertex};

use super::texture_cache::TextureCache;

/// Primitive submitted for one draw range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    LineLoop,
    Lines,
}

fn primitive_of(draw_type: DrawType) -> Option<Primitive> {
    match draw_type {
        DrawType::TexturedPolygon | DrawType::NonTexturedPolygon => Some(Primitive::Triangles),
        DrawType::Polyline => Some(Primitive::LineLoop),
        DrawType::Line => Some(Primitive::Lines),
        DrawType::Undefined => None,
    }
}

/// One contiguous run of same-primitive parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub vertex_array_start: u32,
    pub vertex_array_end: u32,
    pub indices_nb: u32,
    pub indices_array_start: u32,
    pub is_textured: bool,
    pub draw_type: DrawType,
    pub primitive: Primitive,
}

/// Scan a parts list once, emitting the shared index buffer and one draw
/// range per uniform `draw_type` run
pub fn generate_vertex_indices_and_draw_ranges(
    parts: &PartsList,
) -> (Vec<u32>, Vec<DrawRange>) {
    let mut indices = Vec::with_capacity(parts.len() * 6);
    let mut ranges = Vec::new();

    let mut increment: u32 = 0;
    let mut current: Option<DrawRange> = None;
    let mut indices_consumed: u32 = 0;

    for part in parts {
        let Some(primitive) = primitive_of(part.draw_type) else {
            continue; // Non drawable parts are skipped
        };

        let part_indices = part.draw_type.indices();
        let vertex_increment = part.draw_type.vertex_count() as u32;

        match current.as_mut() {
            Some(range) if range.draw_type == part.draw_type => {
                range.vertex_array_end += vertex_increment;
                range.indices_nb += part_indices.len() as u32;
            }
            _ => {
                if let Some(range) = current.take() {
                    indices_consumed += range.indices_nb;
                    ranges.push(range);
                }
                current = Some(DrawRange {
                    vertex_array_start: increment,
                    vertex_array_end: increment + vertex_increment,
                    indices_nb: part_indices.len() as u32,
                    indices_array_start: indices_consumed,
                    is_textured: part.draw_type.is_textured(),
                    draw_type: part.draw_type,
                    primitive,
                });
            }
        }

        indices.extend(part_indices.iter().map(|i| i + increment));
        increment += vertex_increment;
    }

    if let Some(range) = current {
        ranges.push(range);
    }

    (indices, ranges)
}

/// Draw a full parts list into a layer texture
pub fn render_parts(
    parts: &PartsList,
    target: &mut [u8],
    width: u32,
    height: u32,
    cache: &TextureCache,
) {
    if parts.is_empty() {
        return;
    }

    // The draw ranges drive submission order just as the GPU path would;
    // each range rasterizes its parts with one primitive class.
    let (_indices, ranges) = generate_vertex_indices_and_draw_ranges(parts);
    let mut part_iter = parts.iter().filter(|p| primitive_of(p.draw_type).is_some());

    for range in ranges {
        let parts_in_range =
            (range.vertex_array_end - range.vertex_array_start) / range.draw_type.vertex_count() as u32;
        for _ in 0..parts_in_range {
            let Some(part) = part_iter.next() else {
                return;
            };
            match range.primitive {
                Primitive::Triangles => draw_quad(part, target, width, height, cache),
                Primitive::LineLoop => draw_polyline(part, target, width, height),
                Primitive::Lines => draw_line_part(part, target, width, height),
            }
        }
    }
}

/// Fill a (possibly flipped) quad, sampling its texture when present
fn draw_quad(part: &RenderPart, target: &mut [u8], width: u32, height: u32, cache: &TextureCache) {
    if part.vertexes.len() < 4 {
        log::warn!("Quad part with fewer than 4 vertices, skipped");
        return;
    }

    let texture = if part.draw_type == DrawType::TexturedPolygon {
        let texture = cache.get(part.texture_key);
        if texture.is_none() {
            log::warn!("Missing texture {:#018x}, part skipped", part.texture_key);
            return;
        }
        texture
    } else {
        None
    };

    let min_x = part.vertexes.iter().map(|v| v.position.x).min().unwrap();
    let max_x = part.vertexes.iter().map(|v| v.position.x).max().unwrap();
    let min_y = part.vertexes.iter().map(|v| v.position.y).min().unwrap();
    let max_y = part.vertexes.iter().map(|v| v.position.y).max().unwrap();
    if min_x == max_x || min_y == max_y {
        return;
    }
    // Entirely off screen
    if max_x < 0 || max_y < 0 || i32::from(min_x) >= width as i32 || i32::from(min_y) >= height as i32
    {
        return;
    }

    // Texture coordinates at the bounding box corners; flips arrive as
    // swapped coordinates on the vertices.
    let top_left = corner_coords(&part.vertexes, min_x, min_y);
    let bottom_right = corner_coords(&part.vertexes, max_x, max_y);

    let x0 = min_x.max(0) as u32;
    let x1 = (max_x.min(width as i16 - 1)).max(0) as u32;
    let y0 = min_y.max(0) as u32;
    let y1 = (max_y.min(height as i16 - 1)).max(0) as u32;

    let span_x = f32::from(max_x - min_x);
    let span_y = f32::from(max_y - min_y);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let fx = (x as f32 - f32::from(min_x)) / span_x;
            let fy = (y as f32 - f32::from(min_y)) / span_y;

            let rgba = match texture {
                Some(texture) => {
                    let s = top_left.0 + (bottom_right.0 - top_left.0) * fx;
                    let t = top_left.1 + (bottom_right.1 - top_left.1) * fy;
                    sample_texture(texture, s, t)
                }
                None => {
                    let color = part.vertexes[0].color;
                    [color.r, color.g, color.b, color.a]
                }
            };
            if rgba[3] == 0 {
                continue;
            }

            let rgba = apply_color_offset(rgba, &part.vertexes[0].color_offset);
            put_pixel(target, width, x, y, rgba);
        }
    }
}

fn corner_coords(vertexes: &[Vertex], x: i16, y: i16) -> (f32, f32) {
    vertexes
        .iter()
        .find(|v| v.position.x == x && v.position.y == y)
        .map(|v| (v.tex_coords.s, v.tex_coords.t))
        .unwrap_or((0.0, 0.0))
}

fn sample_texture(texture: &super::Texture, s: f32, t: f32) -> [u8; 4] {
    let x = ((s * texture.width as f32) as u32).min(texture.width.saturating_sub(1));
    let y = ((t * texture.height as f32) as u32).min(texture.height.saturating_sub(1));
    let offset = ((y * texture.width + x) * 4) as usize;
    [
        texture.data[offset],
        texture.data[offset + 1],
        texture.data[offset + 2],
        texture.data[offset + 3],
    ]
}

/// Closed loop over 4 vertices
fn draw_polyline(part: &RenderPart, target: &mut [u8], width: u32, height: u32) {
    if part.vertexes.len() < 4 {
        log::warn!("Polyline part with fewer than 4 vertices, skipped");
        return;
    }
    for i in 0..4 {
        let a = &part.vertexes[i];
        let b = &part.vertexes[(i + 1) % 4];
        draw_segment(a, b, part, target, width, height);
    }
}

/// Plain 2 vertex segment
fn draw_line_part(part: &RenderPart, target: &mut [u8], width: u32, height: u32) {
    if part.vertexes.len() < 2 {
        log::warn!("Line part with fewer than 2 vertices, skipped");
        return;
    }
    draw_segment(
        &part.vertexes[0],
        &part.vertexes[1],
        part,
        target,
        width,
        height,
    );
}

fn draw_segment(
    a: &Vertex,
    b: &Vertex,
    part: &RenderPart,
    target: &mut [u8],
    width: u32,
    height: u32,
) {
    let color = [a.color.r, a.color.g, a.color.b, a.color.a];
    let color = apply_color_offset(color, &part.vertexes[0].color_offset);

    // Bresenham
    let (mut x, mut y) = (i32::from(a.position.x), i32::from(a.position.y));
    let (x1, y1) = (i32::from(b.position.x), i32::from(b.position.y));
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            put_pixel(target, width, x as u32, y as u32, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[inline]
fn put_pixel(target: &mut [u8], width: u32, x: u32, y: u32, rgba: [u8; 4]) {
    let offset = ((y * width + x) * 4) as usize;
    if offset + 4 <= target.len() {
        target[offset..offset + 4].copy_from_slice(&rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{ColorOffset, VdpType};

    fn quad(draw_type: DrawType) -> RenderPart {
        let mut part = RenderPart::textured_quad(
            0,
            0,
            8,
            8,
            VdpType::Vdp2Cell,
            1,
            0,
            ColorOffset::default(),
        );
        part.draw_type = draw_type;
        part
    }

    fn line() -> RenderPart {
        let mut part = quad(DrawType::Line);
        part.vertexes.truncate(2);
        part
    }

    #[test]
    fn test_draw_ranges_batch_uniform_runs() {
        let parts = vec![
            quad(DrawType::NonTexturedPolygon),
            quad(DrawType::NonTexturedPolygon),
            line(),
            quad(DrawType::Polyline),
        ];
        let (indices, ranges) = generate_vertex_indices_and_draw_ranges(&parts);

        assert_eq!(ranges.len(), 3, "three uniform runs expected");

        assert_eq!(ranges[0].primitive, Primitive::Triangles);
        assert_eq!(ranges[0].indices_nb, 12);
        assert_eq!(ranges[0].vertex_array_start, 0);
        assert_eq!(ranges[0].vertex_array_end, 8);

        assert_eq!(ranges[1].primitive, Primitive::Lines);
        assert_eq!(ranges[1].indices_nb, 2);
        assert_eq!(ranges[1].indices_array_start, 12);

        assert_eq!(ranges[2].primitive, Primitive::LineLoop);
        assert_eq!(ranges[2].indices_nb, 4);
        assert_eq!(ranges[2].indices_array_start, 14);

        // Index count is the sum of all ranges
        assert_eq!(indices.len(), 12 + 2 + 4);
        // Indices of the second quad are offset by its vertex base
        assert_eq!(&indices[6..12], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_render_untextured_quad_fills_pixels() {
        let cache = TextureCache::new();
        let mut part = quad(DrawType::NonTexturedPolygon);
        for vertex in part.vertexes.iter_mut() {
            vertex.color.r = 0x12;
            vertex.color.g = 0x34;
            vertex.color.b = 0x56;
            vertex.color.a = 0xFF;
        }
        let mut target = vec![0u8; 16 * 16 * 4];
        render_parts(&vec![part], &mut target, 16, 16, &cache);

        // A pixel inside the quad carries the vertex color
        let offset = (3 * 16 + 3) * 4;
        assert_eq!(&target[offset..offset + 4], &[0x12, 0x34, 0x56, 0xFF]);
        // A pixel outside stays clear
        let outside = (12 * 16 + 12) * 4;
        assert_eq!(&target[outside..outside + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_missing_texture_skips_part() {
        let cache = TextureCache::new();
        let part = quad(DrawType::TexturedPolygon);
        let mut target = vec![0u8; 16 * 16 * 4];
        render_parts(&vec![part], &mut target, 16, 16, &cache);
        assert!(target.iter().all(|&b| b == 0), "nothing should be drawn");
    }
}
