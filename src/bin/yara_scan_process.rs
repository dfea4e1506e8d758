#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use argh::FromArgs;
use env_logger::Env;
use memtriage::engine;
use memtriage::text::{render_payload, Payload};
use std::path::Path;

/// Scan a process's memory with a YARA rule file.
#[derive(FromArgs)]
struct Args {
    /// enable verbose logging output
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// process name or numeric pid
    #[argh(positional)]
    process: String,

    /// path to the YARA rule file
    #[argh(positional)]
    rule_file: String,

    /// backend arguments forwarded to the engine (e.g. -device memory.dmp)
    #[argh(positional, greedy)]
    backend_args: Vec<String>,
}

fn main() {
    let args: Args = argh::from_env();
    env_logger::Builder::from_env(Env::default().default_filter_or(if args.verbose {
        "yara_scan_process=debug,memtriage=debug"
    } else {
        "yara_scan_process=info,memtriage=info"
    }))
    .init();

    if args.backend_args.is_empty() {
        println!("Error: backend arguments are required (e.g. '-device <path_to_dump>').");
        println!("Example: yara_scan_process lsass.exe suspicious.yara -device memory.dmp");
        std::process::exit(1);
    }

    if let Err(err) = run(&args) {
        log::error!("{:#}", err);
    }
}

fn run(args: &Args) -> Result<()> {
    // Checked before the engine is even opened so a bad rule path gets its
    // own message instead of a generic scan failure.
    if !Path::new(&args.rule_file).exists() {
        println!("Error: YARA rule file not found at {}", args.rule_file);
        return Ok(());
    }

    let vmm = engine::open(&args.backend_args)?;

    let process = match engine::resolve_process(&vmm, &args.process) {
        Ok(process) => process,
        Err(err) => {
            println!("Error: {}.", err);
            return Ok(());
        }
    };
    let info = process.info()?;
    println!(
        "Scanning process: {} (PID: {}) with rules from {}",
        info.name, info.pid, args.rule_file
    );

    let matches = engine::yara_scan(&process, &args.rule_file)?;
    if matches.is_empty() {
        println!("No YARA matches found.");
        return Ok(());
    }

    println!();
    println!("--- YARA Matches Found ---");
    for hit in &matches {
        println!("Rule: {}, Offset: {:#x}", hit.rule, hit.addr);
        for matched in &hit.match_strings {
            for &va in &matched.addresses {
                match render_payload(&engine::match_payload(&process, va)) {
                    Payload::Text(body) => println!(
                        "  Matched String ({} at {:#x}): {}",
                        matched.match_string, va, body
                    ),
                    Payload::Hex(body) => println!(
                        "  Matched Data ({} at {:#x}, hex): {}",
                        matched.match_string, va, body
                    ),
                }
            }
        }
    }
    Ok(())
}
