#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use argh::FromArgs;
use env_logger::Env;
use memtriage::engine;

/// Dump the full virtual memory of a process to a file for offline analysis.
#[derive(FromArgs)]
struct Args {
    /// enable verbose logging output
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// process name or numeric pid
    #[argh(positional)]
    process: String,

    /// path to write the raw memory dump to
    #[argh(positional)]
    output: String,

    /// backend arguments forwarded to the engine (e.g. -device memory.dmp)
    #[argh(positional, greedy)]
    backend_args: Vec<String>,
}

fn main() {
    let args: Args = argh::from_env();
    env_logger::Builder::from_env(Env::default().default_filter_or(if args.verbose {
        "dump_process_memory=debug,memtriage=debug"
    } else {
        "dump_process_memory=info,memtriage=info"
    }))
    .init();

    if args.backend_args.is_empty() {
        println!("Error: backend arguments are required (e.g. '-device <path_to_dump>').");
        println!("Example: dump_process_memory lsass.exe lsass.dmp -device memory.dmp");
        std::process::exit(1);
    }

    // Anything past argument validation reports and exits 0: a failed dump is
    // a result, not a crash.
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
    println!("Found process: {} (PID: {})", info.name, info.pid);

    println!("Reading process memory... This may take a while.");
    let size = engine::vmem_size(&process)?;
    let data = engine::read_vmem(&process, size)?;
    if data.is_empty() {
        println!("Error: failed to read process memory.");
        return Ok(());
    }

    // Nothing has been written before this point; a failed read leaves no
    // partial output file behind.
    std::fs::write(&args.output, &data)
        .with_context(|| format!("failed to write {}", args.output))?;
    println!(
        "Successfully dumped {} bytes of memory for {} to {}",
        data.len(),
        info.name,
        args.output
    );
    Ok(())
}
