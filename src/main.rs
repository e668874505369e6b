use std::env;
use std::error::Error;
use std::io::Write;
use std::process;

use snes_cpu::cartridge::{self, Header};
use snes_cpu::debug_flags;
use snes_cpu::memory::{Memory, Region, Storage};
use snes_cpu::save_state::CpuSaveState;
use snes_cpu::session::{RunOptions, StopReason};
use snes_cpu::system::{System, SystemMemory, WRAM_SIZE};

struct Args {
    image: String,
    base: Option<u32>,
    max_cycles: u64,
    until: Option<u32>,
    trace: bool,
    save_state: Option<String>,
}

fn usage(program: &str) {
    eprintln!(
        "Usage: {} <image> [--base HEX] [--max-cycles N] [--until HEX] [--trace] [--save-state PATH]",
        program
    );
    eprintln!("Without --base the image is mapped LoROM-style; with it, flat over the LoROM map.");
}

fn parse_hex(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|e| format!("bad hex value '{}': {}", s, e))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let value = |i: usize, flag: &str| -> Result<&String, String> {
        args.get(i + 1)
            .ok_or_else(|| format!("{} requires a value", flag))
    };

    let mut image = None;
    let mut parsed = Args {
        image: String::new(),
        base: None,
        max_cycles: debug_flags::max_cycles(),
        until: None,
        trace: debug_flags::trace(),
        save_state: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--base" => {
                parsed.base = Some(parse_hex(value(i, "--base")?)?);
                i += 2;
            }
            "--max-cycles" => {
                let v = value(i, "--max-cycles")?;
                parsed.max_cycles = v
                    .parse()
                    .map_err(|e| format!("bad cycle count '{}': {}", v, e))?;
                i += 2;
            }
            "--until" => {
                parsed.until = Some(parse_hex(value(i, "--until")?)?);
                i += 2;
            }
            "--trace" => {
                parsed.trace = true;
                i += 1;
            }
            "--save-state" => {
                parsed.save_state = Some(value(i, "--save-state")?.clone());
                i += 2;
            }
            s if s.starts_with('-') => return Err(format!("Unknown option: {}", s)),
            s => {
                image = Some(s.to_string());
                i += 1;
            }
        }
    }
    parsed.image = image.ok_or("image argument missing")?;
    Ok(parsed)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        usage(&args[0]);
        return;
    }
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{}", msg);
            usage(&args[0]);
            process::exit(2);
        }
    };

    match run(&parsed) {
        Ok(StopReason::Fault) => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<StopReason, Box<dyn Error>> {
    let quiet = debug_flags::quiet();

    let mut data = std::fs::read(&args.image)?;
    if data.is_empty() {
        return Err("image is empty".into());
    }
    if cartridge::strip_copier_header(&mut data) {
        log::info!("dropped 512-byte copier header");
    }
    match Header::locate(&data) {
        Ok((offset, header)) => log::info!(
            "header at {:#06X}: '{}' map={:02X} checksum {}",
            offset,
            header.title(),
            header.map_mode,
            if header.checksum_consistent() {
                "ok"
            } else {
                "mismatch"
            }
        ),
        Err(e) => log::warn!("{}", e),
    }

    // Round up so the image ends on a segment boundary.
    let image = Storage::new((data.len() + 0xF) & !0xF);
    image.load(0, &data);
    let flat = args.base.map(|base| (base, Region::rom(image.cells(), base)));

    let memory = match args.base {
        Some(_) => SystemMemory::new(),
        None => SystemMemory::with_rom(&data),
    };
    let regions = memory.regions();
    let mut system = System::new(&regions)?;
    if let Some((base, region)) = &flat {
        let end = base.saturating_add(region.size()).saturating_sub(1);
        system.bus.attach(region, "image", *base, end)?;
    }
    log::debug!("memory map:\n{}", system.bus);

    system.reset()?;

    let options = RunOptions {
        until: args.until,
        max_cycles: args.max_cycles,
        ..RunOptions::default()
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let sink: Option<&mut dyn Write> = if args.trace { Some(&mut out) } else { None };
    let summary = system.run(&options, sink)?;
    drop(out);
    system.bus.shutdown();

    if !quiet {
        let r = &system.cpu.regs;
        println!(
            "stopped: {:?} after {} steps, {} cycles",
            summary.reason, summary.steps, summary.cycles
        );
        println!(
            "PC={:02X}:{:04X} A={:04X} X={:04X} Y={:04X} S={:04X} D={:04X} DB={:02X} P={:02X} E={}",
            r.pb,
            r.pc,
            r.a,
            r.x,
            r.y,
            r.sp,
            r.dp,
            r.db,
            r.p.bits(),
            r.emulation as u8
        );
    }
    if let Some(fault) = system.cpu.fault() {
        log::error!("{}", fault);
    }

    if let Some(path) = &args.save_state {
        let mut dump = vec![0u8; WRAM_SIZE];
        system.bus.dump(0x7E_0000, 0x7F_FFFF, &mut dump);
        CpuSaveState::capture(&system.cpu).with_memory(dump).save_to_file(path)?;
    }
    Ok(summary.reason)
}
