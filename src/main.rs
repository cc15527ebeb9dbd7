// Headless runner
//
// Boots the emulator from a TOML configuration and runs it without a
// window, printing a frame/cycle summary at the end. Useful for timing
// measurements and for exercising the core on a machine with no display.

use std::path::Path;

use saturn_rs::debug::EmulationStatus;
use saturn_rs::{Emulator, EmulatorConfig};

const CONFIG_PATH: &str = "saturn-rs.toml";

fn main() {
    env_logger::init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.into());
    let config = EmulatorConfig::load_or_default(Path::new(&config_path));
    log::info!("Configuration: {:?}", config);

    let frames_to_run = config.frames_to_run.unwrap_or(600);
    let boot_rom = config.boot_rom_path.clone();

    let mut emulator = Emulator::new(config);

    match boot_rom {
        Some(path) => match std::fs::read(&path) {
            Ok(image) => emulator.bus.load_boot_rom(&image),
            Err(e) => {
                eprintln!("Could not read boot ROM {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            // Without a ROM the vector table is empty: stage a minimal one
            // so the processors spin on a NOP loop instead of executing
            // zeroed memory.
            stage_idle_program(&mut emulator);
        }
    }

    emulator.power_on();

    let start = std::time::Instant::now();
    let mut total_cycles: u64 = 0;

    while emulator.frame_count() < frames_to_run {
        if emulator.debug_handle().emulation_status() == EmulationStatus::Stopped {
            eprintln!("Emulation stopped at PC {:#010x}", emulator.master.pc);
            break;
        }
        total_cycles += u64::from(emulator.step());
    }

    let elapsed = start.elapsed();
    let frames = emulator.frame_count();
    println!(
        "{} frames, {} cycles in {:.2?} ({:.1} fps host-side)",
        frames,
        total_cycles,
        elapsed,
        frames as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("VDP2 reported: {}", emulator.bus.vdp2.fps());

    emulator.stop();
}

/// Install reset vectors and an endless BRA-to-self loop at the reset PC
fn stage_idle_program(emulator: &mut Emulator) {
    use saturn_rs::Bus;

    const PROGRAM_BASE: u32 = 0x0600_0000;
    const STACK_TOP: u32 = 0x0600_F000;

    emulator.bus.write32(0x0000_0008, PROGRAM_BASE);
    emulator.bus.write32(0x0000_000C, STACK_TOP);

    // BRA -2 ; NOP (delay slot): a tight idle loop
    emulator.bus.write16(PROGRAM_BASE, 0xAFFE);
    emulator.bus.write16(PROGRAM_BASE + 2, 0x0009);
}
