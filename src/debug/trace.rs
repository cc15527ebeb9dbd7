// Execution trace
//
// A bounded in-memory trace of executed instructions with optional file
// output, consumed by the log pane of a debug UI. Tracing is off by
// default; the ring drops its oldest entries once full.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::Sh2Snapshot;

/// One trace record
#[derive(Debug, Clone)]
pub enum TraceEntry {
    /// An executed instruction with the register state after it
    Cpu {
        pc: u32,
        opcode: u16,
        disasm: String,
        state: Sh2Snapshot,
    },
    /// Free-form marker
    Message(String),
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEntry::Cpu { disasm, state, .. } => write!(f, "{}  [{}]", disasm, state),
            TraceEntry::Message(message) => write!(f, "{}", message),
        }
    }
}

/// Bounded execution trace
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
    max_entries: usize,
    enabled: bool,
    output_file: Option<File>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        ExecutionTrace {
            entries: Vec::new(),
            max_entries: 10_000,
            enabled: false,
            output_file: None,
        }
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        ExecutionTrace {
            max_entries,
            ..Self::new()
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Send every future entry to a file as well
    pub fn set_output_file(&mut self, path: &Path) -> std::io::Result<()> {
        self.output_file = Some(File::create(path)?);
        Ok(())
    }

    /// Record an executed instruction
    pub fn trace_step(&mut self, sh2: &crate::sh2::Sh2) {
        if !self.enabled {
            return;
        }
        let entry = TraceEntry::Cpu {
            pc: sh2.pc,
            opcode: sh2.current_opcode,
            disasm: super::disassemble(sh2.pc, sh2.current_opcode),
            state: Sh2Snapshot::capture(sh2),
        };
        self.push(entry);
    }

    /// Record a marker line
    pub fn message(&mut self, text: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.push(TraceEntry::Message(text.into()));
    }

    fn push(&mut self, entry: TraceEntry) {
        if let Some(file) = self.output_file.as_mut() {
            let _ = writeln!(file, "{}", entry);
        }
        if self.max_entries != 0 && self.entries.len() >= self.max_entries {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExecutionTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_is_off_by_default() {
        let mut trace = ExecutionTrace::new();
        trace.message("ignored");
        assert!(trace.is_empty());
    }

    #[test]
    fn test_trace_ring_drops_oldest() {
        let mut trace = ExecutionTrace::with_capacity(2);
        trace.enable();
        trace.message("one");
        trace.message("two");
        trace.message("three");

        assert_eq!(trace.len(), 2);
        match &trace.entries()[0] {
            TraceEntry::Message(text) => assert_eq!(text, "two"),
            other => panic!("unexpected entry {:?}", other),
        }
    }
}
