// Display module - shared rendering primitives
//
// Types shared between the VDP2 frame build and the compositor: render
// parts and their vertices, layer identifiers, color decoding and the
// front/back display buffer.

mod color;
mod framebuffer;
mod part;

pub use color::{rgb555_to_rgba, rgb888_to_rgba, apply_color_offset};
pub use framebuffer::{DisplayBuffer, DisplayBufferType};
pub use part::{
    ColorOffset, DrawType, Gouraud, LayerKey, PartsList, RenderPart, TextureCoordinates, VdpLayer,
    VdpType, Vertex, VertexColor, VertexPosition,
};
