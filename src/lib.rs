// Saturn Emulator Library
// Core library for the Sega Saturn emulator implementation

// Public modules
pub mod bus;
pub mod compositor;
pub mod debug;
pub mod display;
pub mod emulator;
pub mod scu;
pub mod sh2;
pub mod smpc;
pub mod vdp2;

// Re-export main types for convenience
pub use bus::{Bus, SystemBus};
pub use compositor::{Compositor, LayerTextureStatus, TextureCache};
pub use debug::{
    disassemble, disassemble_range, CallstackEntry, DebugStatus, EmulationStatus, ExecutionTrace,
    Sh2Snapshot, TraceEntry,
};
pub use display::{
    ColorOffset, DisplayBuffer, DrawType, Gouraud, RenderPart, VdpLayer, VdpType, Vertex,
    VertexColor, VertexPosition,
};
pub use emulator::{Emulator, EmulatorConfig, SaveState, SaveStateError, TvStandard};
pub use scu::Scu;
pub use sh2::{Interrupt, Sh2, Sh2Kind};
pub use smpc::SystemClock;
pub use vdp2::{ScrollScreen, Vdp2};
