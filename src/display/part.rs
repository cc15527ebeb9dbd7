// Render parts
//
// A render part is the unit of work handed from the video chips to the
// compositor: up to four vertices, a primitive class, a priority rank and
// an opaque texture key resolving to cached pixel data.

/// Which chip (and which path of it) produced a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VdpType {
    Vdp1,
    Vdp2Cell,
    Vdp2Bitmap,
}

/// Compositing layer identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VdpLayer {
    Nbg0,
    Nbg1,
    Nbg2,
    Nbg3,
    Rbg0,
    Rbg1,
    Back,
    Sprite,
    Undefined,
}

impl VdpLayer {
    pub fn name(self) -> &'static str {
        match self {
            VdpLayer::Nbg0 => "nbg0",
            VdpLayer::Nbg1 => "nbg1",
            VdpLayer::Nbg2 => "nbg2",
            VdpLayer::Nbg3 => "nbg3",
            VdpLayer::Rbg0 => "rbg0",
            VdpLayer::Rbg1 => "rbg1",
            VdpLayer::Back => "back",
            VdpLayer::Sprite => "sprite",
            VdpLayer::Undefined => "undefined",
        }
    }
}

/// Primitive classes
///
/// Quads expand to two triangles (6 indices), a polyline closes its loop
/// over 4 vertices and a line joins 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawType {
    TexturedPolygon,
    NonTexturedPolygon,
    Polyline,
    Line,
    Undefined,
}

impl DrawType {
    /// Vertices consumed by one part of this type
    pub fn vertex_count(self) -> usize {
        match self {
            DrawType::Line => 2,
            _ => 4,
        }
    }

    /// Index pattern of one part of this type
    pub fn indices(self) -> &'static [u32] {
        match self {
            DrawType::TexturedPolygon | DrawType::NonTexturedPolygon => &[0, 1, 2, 0, 2, 3],
            DrawType::Polyline => &[0, 1, 2, 3],
            DrawType::Line => &[0, 1],
            DrawType::Undefined => &[],
        }
    }

    pub fn is_textured(self) -> bool {
        self == DrawType::TexturedPolygon
    }
}

/// Screen-space vertex position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexPosition {
    pub x: i16,
    pub y: i16,
}

/// Texture coordinates; `p` selects the texture layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextureCoordinates {
    pub s: f32,
    pub t: f32,
    pub p: f32,
}

/// Vertex color (used when the part is not textured)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Gouraud shading deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gouraud {
    pub r: i8,
    pub g: i8,
    pub b: i8,
}

/// Per-layer color offset applied at compose time
///
/// `signs[i]` is true for a positive offset of channel i; `values[i]` is the
/// magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOffset {
    pub signs: [bool; 3],
    pub values: [u8; 3],
}

impl Default for ColorOffset {
    fn default() -> Self {
        ColorOffset {
            signs: [true; 3],
            values: [0; 3],
        }
    }
}

/// One render vertex
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: VertexPosition,
    pub tex_coords: TextureCoordinates,
    pub color: VertexColor,
    pub gouraud: Gouraud,
    pub color_offset: ColorOffset,
}

/// A drawable part
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPart {
    /// 4 vertices for quads and polylines, 2 for lines
    pub vertexes: Vec<Vertex>,
    pub draw_type: DrawType,
    pub vdp_type: VdpType,
    /// Compositing rank, 1..7 (7 is front-most); 0 never displays
    pub priority: u8,
    /// Key into the texture cache; 0 for untextured parts
    pub texture_key: u64,
}

impl RenderPart {
    /// A textured quad covering `w` x `h` pixels at (x, y)
    pub fn textured_quad(
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        vdp_type: VdpType,
        priority: u8,
        texture_key: u64,
        color_offset: ColorOffset,
    ) -> Self {
        let corner = |px: i16, py: i16, s: f32, t: f32| Vertex {
            position: VertexPosition { x: px, y: py },
            tex_coords: TextureCoordinates { s, t, p: 0.0 },
            color: VertexColor { r: 0xFF, g: 0xFF, b: 0xFF, a: 0xFF },
            gouraud: Gouraud::default(),
            color_offset,
        };
        RenderPart {
            vertexes: vec![
                corner(x, y, 0.0, 0.0),
                corner(x + w, y, 1.0, 0.0),
                corner(x + w, y + h, 1.0, 1.0),
                corner(x, y + h, 0.0, 1.0),
            ],
            draw_type: DrawType::TexturedPolygon,
            vdp_type,
            priority,
            texture_key,
        }
    }
}

/// A full frame of parts for one (priority, layer) couple
pub type PartsList = Vec<RenderPart>;

/// Key of one compositing target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    pub priority: u8,
    pub layer: VdpLayer,
}
