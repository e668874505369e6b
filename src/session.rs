//! Stepping loop for running a program to a target address.
//!
//! The CPU itself never decides when a program is finished. `run_until`
//! applies the usual caller-side checks after every step: target reached,
//! abort, `PC == prev_pc` spin, and a cycle budget.

use std::io::Write;

use crate::cpu::Cpu;
use crate::cpu_bus::CpuBus;
use crate::debug_flags;
use crate::disasm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// PB:PC equals the target before the next step.
    Reached,
    /// WDM was executed.
    Aborted,
    /// STP was executed, now or earlier.
    Stopped,
    /// A bus fault; see [`Cpu::fault`].
    Fault,
    /// The last step left PB:PC unchanged.
    Spinning,
    /// The cycle budget ran out.
    Budget,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub until: Option<u32>,
    pub max_cycles: u64,
    pub stop_on_spin: bool,
    /// Trace lines to write before going quiet; 0 means no limit.
    pub trace_limit: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            until: None,
            max_cycles: debug_flags::max_cycles(),
            stop_on_spin: true,
            trace_limit: debug_flags::trace_limit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub cycles: u64,
    pub reason: StopReason,
}

/// Steps `cpu` until one of the stop conditions holds. When `trace` is
/// given, one disassembly line per instruction is written to it before the
/// instruction executes.
pub fn run_until<B: CpuBus>(
    cpu: &mut Cpu,
    bus: &mut B,
    options: &RunOptions,
    mut trace: Option<&mut dyn Write>,
) -> std::io::Result<RunSummary> {
    let start_cycles = cpu.total_cycles();
    let mut steps = 0u64;
    let mut traced = 0u64;
    let mut line = String::with_capacity(96);

    let reason = loop {
        if options.until == Some(cpu.regs.pc24()) {
            break StopReason::Reached;
        }
        if cpu.total_cycles() - start_cycles >= options.max_cycles {
            break StopReason::Budget;
        }

        if let Some(out) = trace.as_deref_mut() {
            if options.trace_limit == 0 || traced < options.trace_limit {
                line.clear();
                disasm::trace_line(&mut line, cpu, bus);
                writeln!(out, "{}", line)?;
                traced += 1;
            }
        }

        let result = cpu.step(bus);
        steps += 1;
        if result.abort {
            break if cpu.fault().is_some() {
                StopReason::Fault
            } else if cpu.is_stopped() {
                StopReason::Stopped
            } else {
                StopReason::Aborted
            };
        }
        if options.stop_on_spin && cpu.is_spinning() {
            break StopReason::Spinning;
        }
    };

    let summary = RunSummary {
        steps,
        cycles: cpu.total_cycles() - start_cycles,
        reason,
    };
    log::debug!(
        "session: {:?} after {} steps, {} cycles, pc={:06X}",
        summary.reason,
        summary.steps,
        summary.cycles,
        cpu.regs.pc24()
    );
    Ok(summary)
}
