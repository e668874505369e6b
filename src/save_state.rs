use serde::{Deserialize, Serialize};

use crate::cpu::{Cpu, Registers, StatusFlags};

/// Snapshot of the CPU between instructions. Memory is not included; the
/// caller owns the storage and can dump it separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSaveState {
    pub a: u16,
    pub x: u16,
    pub y: u16,
    pub dp: u16,
    pub sp: u16,
    pub db: u8,
    pub pb: u8,
    pub pc: u16,
    pub status: u8,
    pub emulation: bool,

    pub total_cycles: u64,
    pub waiting: bool,
    pub stopped: bool,

    // Optional memory image, e.g. WRAM from `Bus::dump`
    pub memory: Vec<u8>,
}

impl CpuSaveState {
    pub fn capture(cpu: &Cpu) -> Self {
        let r = &cpu.regs;
        Self {
            a: r.a,
            x: r.x,
            y: r.y,
            dp: r.dp,
            sp: r.sp,
            db: r.db,
            pb: r.pb,
            pc: r.pc,
            status: r.p.bits(),
            emulation: r.emulation,
            total_cycles: cpu.total_cycles(),
            waiting: cpu.is_waiting(),
            stopped: cpu.is_stopped(),
            memory: Vec::new(),
        }
    }

    pub fn with_memory(mut self, memory: Vec<u8>) -> Self {
        self.memory = memory;
        self
    }

    /// Loads the snapshot into `cpu`. Mode invariants are re-applied, so a
    /// hand-edited state cannot leave 16-bit index registers in emulation.
    pub fn apply(&self, cpu: &mut Cpu) {
        cpu.regs = Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            dp: self.dp,
            sp: self.sp,
            db: self.db,
            pb: self.pb,
            pc: self.pc,
            p: StatusFlags::from_bits_retain(self.status),
            emulation: self.emulation,
        };
        cpu.regs.normalize();
        cpu.restore_counters(self.total_cycles, self.waiting, self.stopped);
    }

    pub fn save_to_file(&self, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
        let data = bincode::serialize(self)?;
        std::fs::write(filename, data)?;
        log::info!("save state written to {}", filename);
        Ok(())
    }

    pub fn load_from_file(filename: &str) -> Result<CpuSaveState, Box<dyn std::error::Error>> {
        let data = std::fs::read(filename)?;
        let state = bincode::deserialize(&data)?;
        log::info!("save state loaded from {}", filename);
        Ok(state)
    }
}
