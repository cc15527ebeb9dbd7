// Save states
//
// The core itself persists nothing; this is the host-side checkpoint the
// interfaces allow for: register arrays and RAM contents captured as opaque
// blobs, serialized as versioned JSON with a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Emulator;
use crate::sh2::Sh2;

/// Format version; bumped whenever the layout changes
pub const SAVE_STATE_VERSION: u32 = 1;

/// Save state errors
#[derive(Debug)]
pub enum SaveStateError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    /// The file was written by an incompatible version
    VersionMismatch { found: u32, expected: u32 },
}

impl std::fmt::Display for SaveStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveStateError::Io(e) => write!(f, "save state I/O error: {}", e),
            SaveStateError::Serialization(e) => write!(f, "save state serialization error: {}", e),
            SaveStateError::VersionMismatch { found, expected } => write!(
                f,
                "save state version mismatch: found {}, expected {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for SaveStateError {}

impl From<std::io::Error> for SaveStateError {
    fn from(e: std::io::Error) -> Self {
        SaveStateError::Io(e)
    }
}

impl From<serde_json::Error> for SaveStateError {
    fn from(e: serde_json::Error) -> Self {
        SaveStateError::Serialization(e)
    }
}

/// Architectural registers of one SH-2
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sh2Checkpoint {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
    pub sr: u16,
}

impl Sh2Checkpoint {
    fn capture(sh2: &Sh2) -> Self {
        Sh2Checkpoint {
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

    fn restore(&self, sh2: &mut Sh2) {
        sh2.r = self.r;
        sh2.pc = self.pc;
        sh2.pr = self.pr;
        sh2.gbr = self.gbr;
        sh2.vbr = self.vbr;
        sh2.mach = self.mach;
        sh2.macl = self.macl;
        sh2.set_sr(self.sr);
    }
}

/// One full checkpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub master: Sh2Checkpoint,
    pub slave: Sh2Checkpoint,
    pub work_ram_low: Vec<u8>,
    pub work_ram_high: Vec<u8>,
    pub vram: Vec<u8>,
    pub cram: Vec<u8>,
}

impl SaveState {
    /// Capture the emulator's RAM and register state
    pub fn capture(emulator: &Emulator) -> Self {
        SaveState {
            version: SAVE_STATE_VERSION,
            timestamp: Utc::now(),
            master: Sh2Checkpoint::capture(&emulator.master),
            slave: Sh2Checkpoint::capture(&emulator.slave),
            work_ram_low: emulator.bus.work_ram_low_snapshot(),
            work_ram_high: emulator.bus.work_ram_high_snapshot(),
            vram: emulator.bus.vdp2.vram_snapshot(),
            cram: emulator.bus.vdp2.cram_snapshot(),
        }
    }

    /// Restore a checkpoint into the emulator
    pub fn restore(&self, emulator: &mut Emulator) -> Result<(), SaveStateError> {
        if self.version != SAVE_STATE_VERSION {
            return Err(SaveStateError::VersionMismatch {
                found: self.version,
                expected: SAVE_STATE_VERSION,
            });
        }

        self.master.restore(&mut emulator.master);
        self.slave.restore(&mut emulator.slave);
        emulator.bus.restore_work_ram_low(&self.work_ram_low);
        emulator.bus.restore_work_ram_high(&self.work_ram_high);
        emulator.bus.vdp2.restore_vram(&self.vram);
        emulator.bus.vdp2.restore_cram(&self.cram);
        Ok(())
    }

    /// Write the checkpoint to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SaveStateError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a checkpoint from a file
    pub fn load_from_file(path: &Path) -> Result<Self, SaveStateError> {
        let file = std::fs::File::open(path)?;
        let state: SaveState = serde_json::from_reader(std::io::BufReader::new(file))?;
        if state.version != SAVE_STATE_VERSION {
            return Err(SaveStateError::VersionMismatch {
                found: state.version,
                expected: SAVE_STATE_VERSION,
            });
        }
        Ok(state)
    }
}
