// Debug module - host debug state, disassembler and execution trace
//
// The host-visible debug state is a pair of atomics shared by both SH-2
// cores, the emulation loop and the UI thread: the emulation status (the
// only fatal path, illegal-slot detection, stops it) and the stepping
// state driven by the debugger.

mod disassembler;
mod trace;

pub use disassembler::{disassemble, disassemble_range};
pub use trace::{ExecutionTrace, TraceEntry};

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

pub use crate::sh2::CallstackEntry;

/// Whether the emulation may keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulationStatus {
    Running,
    /// A fatal condition (illegal slot instruction, unknown opcode) was hit
    Stopped,
}

/// Debugger stepping state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugStatus {
    Disabled,
    Running,
    Paused,
    StepInto,
    StepOver,
    StepOut,
    /// Step-over entered a subroutine; run until the matching RTS
    WaitEndOfRoutine,
    /// Run to the next VBlank-In, then pause
    NextFrame,
}

impl DebugStatus {
    fn to_u8(self) -> u8 {
        match self {
            DebugStatus::Disabled => 0,
            DebugStatus::Running => 1,
            DebugStatus::Paused => 2,
            DebugStatus::StepInto => 3,
            DebugStatus::StepOver => 4,
            DebugStatus::StepOut => 5,
            DebugStatus::WaitEndOfRoutine => 6,
            DebugStatus::NextFrame => 7,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => DebugStatus::Running,
            2 => DebugStatus::Paused,
            3 => DebugStatus::StepInto,
            4 => DebugStatus::StepOver,
            5 => DebugStatus::StepOut,
            6 => DebugStatus::WaitEndOfRoutine,
            7 => DebugStatus::NextFrame,
            _ => DebugStatus::Disabled,
        }
    }
}

struct DebugShared {
    emulation_status: AtomicU8,
    debug_status: AtomicU8,
}

/// Cloneable handle to the shared host debug state
#[derive(Clone)]
pub struct DebugHandle {
    shared: Arc<DebugShared>,
}

impl DebugHandle {
    pub fn new() -> Self {
        DebugHandle {
            shared: Arc::new(DebugShared {
                emulation_status: AtomicU8::new(0),
                debug_status: AtomicU8::new(0),
            }),
        }
    }

    pub fn emulation_status(&self) -> EmulationStatus {
        if self.shared.emulation_status.load(Ordering::Acquire) == 0 {
            EmulationStatus::Running
        } else {
            EmulationStatus::Stopped
        }
    }

    pub fn set_emulation_status(&self, status: EmulationStatus) {
        let value = match status {
            EmulationStatus::Running => 0,
            EmulationStatus::Stopped => 1,
        };
        self.shared.emulation_status.store(value, Ordering::Release);
    }

    pub fn debug_status(&self) -> DebugStatus {
        DebugStatus::from_u8(self.shared.debug_status.load(Ordering::Acquire))
    }

    pub fn set_debug_status(&self, status: DebugStatus) {
        self.shared.debug_status.store(status.to_u8(), Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.debug_status() == DebugStatus::Paused
    }
}

impl Default for DebugHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of one SH-2's registers for the debug UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sh2Snapshot {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
    pub sr: u16,
}

impl Sh2Snapshot {
    pub fn capture(sh2: &crate::sh2::Sh2) -> Self {
        Sh2Snapshot {
            r: sh2.r,
            pc: sh2.pc,
            pr: sh2.pr,
            gbr: sh2.gbr,
            vbr: sh2.vbr,
            mach: sh2.mach,
            macl: sh2.macl,
            sr: sh2.sr,
        }
    }
}

impl std::fmt::Display for Sh2Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PC={:08X} PR={:08X} SR={:04X} R0={:08X} R15={:08X}",
            self.pc, self.pr, self.sr, self.r[0], self.r[15]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_handle_is_shared() {
        let handle = DebugHandle::new();
        let clone = handle.clone();

        handle.set_debug_status(DebugStatus::Paused);
        assert_eq!(clone.debug_status(), DebugStatus::Paused);

        clone.set_emulation_status(EmulationStatus::Stopped);
        assert_eq!(handle.emulation_status(), EmulationStatus::Stopped);
    }
}
