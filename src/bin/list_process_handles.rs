#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use argh::FromArgs;
use env_logger::Env;
use memtriage::engine;

/// List all open handles for a process.
#[derive(FromArgs)]
struct Args {
    /// enable verbose logging output
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// process name or numeric pid
    #[argh(positional)]
    process: String,

    /// backend arguments forwarded to the engine (e.g. -device memory.dmp)
    #[argh(positional, greedy)]
    backend_args: Vec<String>,
}

fn main() {
    let args: Args = argh::from_env();
    env_logger::Builder::from_env(Env::default().default_filter_or(if args.verbose {
        "list_process_handles=debug,memtriage=debug"
    } else {
        "list_process_handles=info,memtriage=info"
    }))
    .init();

    if args.backend_args.is_empty() {
        println!("Error: backend arguments are required (e.g. '-device <path_to_dump>').");
        println!("Example: list_process_handles explorer.exe -device memory.dmp");
        std::process::exit(1);
    }

    if let Err(err) = run(&args) {
        log::error!("{:#}", err);
    }
}

fn run(args: &Args) -> Result<()> {
    let vmm = engine::open(&args.backend_args)?;

    let process = match engine::resolve_process(&vmm, &args.process) {
        Ok(process) => process,
        Err(err) => {
            println!("Error: {}.", err);
            return Ok(());
        }
    };
    let info = process.info()?;
    println!("--- Handles for {} (PID: {}) ---", info.name, info.pid);

    let handles = engine::handles(&process)?;
    if handles.is_empty() {
        // An empty table is a finding, not an error.
        println!("No open handles found.");
        return Ok(());
    }

    for handle in &handles {
        println!(
            "- Handle: {:#x}, Type: {}, Name: {}",
            handle.handle_id, handle.tp, handle.info
        );
    }
    Ok(())
}
