// Emulator module - system wiring and the frame scheduler
//
// Wires the two SH-2 processors, the system bus (with the VDP2 on it), the
// SCU interrupt routing and the compositor, and drives them per the
// scheduling model: the emulation loop steps the master then the slave,
// advances the VDP2 by the same cycles and dispatches the resulting video
// events. The renderer runs on its own thread and receives one parts map
// per frame at VBlank-In.

pub mod config;
pub mod save_state;

pub use config::{ConfigError, EmulatorConfig, TvStandard};
pub use save_state::{SaveState, SaveStateError, Sh2Checkpoint};

use std::collections::BTreeMap;
use std::thread::JoinHandle;

use crate::bus::SystemBus;
use crate::compositor::{Compositor, CompositorHandle};
use crate::debug::{DebugHandle, DebugStatus, EmulationStatus, ExecutionTrace};
use crate::display::{LayerKey, PartsList, VdpLayer, VdpType};
use crate::scu::Scu;
use crate::sh2::{Sh2, Sh2Kind};
use crate::smpc::SystemClock;
use crate::vdp2::{scroll_screen_to_layer, ScrollScreen};

/// Source of sprite parts, implemented by the VDP1 collaborator
///
/// The core consumes sprites only as finished parts lists keyed by
/// priority; command parsing stays outside.
pub trait SpritePartsProvider: Send {
    /// Parts of the given priority for the frame being built
    fn parts_by_priority(&self, priority: u8) -> PartsList;

    /// Frame boundary notification
    fn on_vblank_in(&mut self) {}
}

/// The emulator: full system state plus the renderer thread
pub struct Emulator {
    pub master: Sh2,
    pub slave: Sh2,
    pub bus: SystemBus,
    pub scu: Scu,
    pub clock: SystemClock,
    pub config: EmulatorConfig,

    /// Execution trace of the master processor
    pub trace: ExecutionTrace,

    compositor_handle: CompositorHandle,
    renderer_thread: Option<JoinHandle<Compositor>>,

    sprite_provider: Option<Box<dyn SpritePartsProvider>>,

    debug: DebugHandle,
    frame_count: u64,
}

impl Emulator {
    /// Build a full system from a configuration
    pub fn new(config: EmulatorConfig) -> Self {
        let debug = DebugHandle::new();

        let mut master = Sh2::new(Sh2Kind::Master);
        master.set_debug_handle(debug.clone());
        let mut slave = Sh2::new(Sh2Kind::Slave);
        slave.set_debug_handle(debug.clone());

        let mut bus = SystemBus::new();
        bus.vdp2.initialize(config.tv_standard);

        let mut compositor = Compositor::with_resolution(
            u32::from(bus.vdp2.tv_screen_status.horizontal_res.max(320)),
            u32::from(bus.vdp2.tv_screen_status.vertical_res.max(224)),
        );
        bus.vdp2.set_texture_cache(compositor.texture_cache());
        let compositor_handle = compositor.handle();

        let renderer_thread = std::thread::Builder::new()
            .name("renderer".into())
            .spawn(move || {
                compositor.render_loop();
                compositor
            })
            .expect("failed to spawn the renderer thread");

        let mut trace = ExecutionTrace::new();
        if config.trace_execution {
            trace.enable();
        }

        Emulator {
            master,
            slave,
            bus,
            scu: Scu::new(),
            clock: SystemClock::new(config.tv_standard),
            config,
            trace,
            compositor_handle,
            renderer_thread: Some(renderer_thread),
            sprite_provider: None,
            debug,
            frame_count: 0,
        }
    }

    /// Attach the VDP1 collaborator's parts provider
    pub fn set_sprite_provider(&mut self, provider: Box<dyn SpritePartsProvider>) {
        self.sprite_provider = Some(provider);
    }

    /// Shared host debug state
    pub fn debug_handle(&self) -> DebugHandle {
        self.debug.clone()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Power-on reset of both processors against the boot vectors
    pub fn power_on(&mut self) {
        self.master.power_on_reset(&mut self.bus);
        self.slave.power_on_reset(&mut self.bus);
    }

    /// Run one master instruction and advance the whole system by its
    /// cycle count. Returns the cycles consumed.
    pub fn step(&mut self) -> u8 {
        let cycles = self.master.step(&mut self.bus);
        if self.trace.is_enabled() {
            self.trace.trace_step(&self.master);
        }

        if self.config.run_slave_sh2 {
            self.slave.step(&mut self.bus);
        }

        // Interrupt routines that returned tell the SCU to drop its flags
        for finished in self.master.drain_finished_interrupts() {
            self.scu.clear_interrupt_flag(finished);
        }
        // The slave's finished interrupts don't touch the SCU
        self.slave.drain_finished_interrupts();

        self.bus.vdp2.timer_0_compare = self.scu.timer_0_compare();
        let events = self.bus.vdp2.run(cycles);

        if events.hblank_in {
            self.scu.on_hblank_in(&mut self.master);
        }
        if events.timer_0 {
            self.scu.on_timer_0(&mut self.master);
        }
        if events.vblank_in {
            self.scu.on_vblank_in(&mut self.master);
            if let Some(provider) = self.sprite_provider.as_mut() {
                provider.on_vblank_in();
            }
            self.display_framebuffer();
            self.frame_count += 1;

            if self.debug.debug_status() == DebugStatus::NextFrame {
                self.debug.set_debug_status(DebugStatus::Paused);
            }
        }
        if events.vblank_out {
            self.scu.on_vblank_out(&mut self.master);
        }

        cycles
    }

    /// Run until the next frame boundary (VBlank-Out) or until the
    /// emulation stops. Returns false when stopped.
    pub fn run_frame(&mut self) -> bool {
        let starting_frame = self.frame_count;
        loop {
            if self.debug.emulation_status() == EmulationStatus::Stopped {
                return false;
            }
            if self.debug.is_paused() {
                return true;
            }
            self.step();
            if self.frame_count != starting_frame
                && self.bus.vdp2.regs.tvstat & crate::vdp2::registers::tvstat::VBLANK == 0
            {
                return true;
            }
        }
    }

    /// Collect the frame's parts and hand them to the renderer
    ///
    /// Builds the (priority, layer) keyed map from the displayable VDP2
    /// screens and the sprite provider, highest priority first, then blocks
    /// until the renderer drains the slot.
    pub fn display_framebuffer(&mut self) {
        let mut global_parts_list: BTreeMap<LayerKey, PartsList> = BTreeMap::new();

        // Step one: displayable layers
        let mut screens_to_display = Vec::with_capacity(6);
        for screen in [
            ScrollScreen::Nbg3,
            ScrollScreen::Nbg2,
            ScrollScreen::Nbg1,
            ScrollScreen::Nbg0,
            ScrollScreen::Rbg1,
            ScrollScreen::Rbg0,
        ] {
            if !self.bus.vdp2.is_layer_disabled(screen) {
                screens_to_display.push(screen);
            }
        }

        // Step two: one parts list per (priority, layer) couple
        for priority in (1..=7u8).rev() {
            for &screen in &screens_to_display {
                let parts = self.bus.vdp2.vdp2_parts_by_priority(screen, priority);
                if !parts.is_empty() {
                    global_parts_list.insert(
                        LayerKey {
                            priority,
                            layer: scroll_screen_to_layer(screen),
                        },
                        parts,
                    );
                }
            }

            if let Some(provider) = self.sprite_provider.as_ref() {
                let sprite_parts = provider.parts_by_priority(priority);
                if !sprite_parts.is_empty() {
                    global_parts_list.insert(
                        LayerKey {
                            priority,
                            layer: VdpLayer::Sprite,
                        },
                        sprite_parts,
                    );
                }
            }
        }

        // Step three: hand the frame to the renderer thread
        self.compositor_handle.display_framebuffer(global_parts_list);
    }

    /// Cooperative shutdown: stop the renderer and get the compositor back
    /// for inspection
    pub fn stop(&mut self) -> Option<Compositor> {
        self.compositor_handle.request_stop();
        self.renderer_thread
            .take()
            .and_then(|handle| handle.join().ok())
    }

    /// Sanity accessor used by tests: VDP type of a screen's parts
    pub fn parts_of_screen(&self, screen: ScrollScreen, vdp_type: VdpType) -> PartsList {
        self.bus.vdp2.vdp2_parts_by_type(screen, vdp_type)
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        self.compositor_handle.request_stop();
        if let Some(handle) = self.renderer_thread.take() {
            let _ = handle.join();
        }
    }
}
