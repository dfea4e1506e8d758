#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use argh::FromArgs;
use env_logger::Env;
use memtriage::engine;
use memtriage::report::{self, ClassificationReport, RawSection};

const SYSINFO_PATH: &str = "/sys/sysinfo";
const NET_PATH: &str = "/sys/net";
const USERS_PATH: &str = "/sys/users";

/// Triage a memory image: system info, process list, network state and user
/// accounts, with an optional JSON report.
#[derive(FromArgs)]
struct Args {
    /// enable verbose logging output
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// write the full classification report as JSON to this path
    #[argh(option)]
    output: Option<String>,

    /// backend arguments forwarded to the engine (e.g. -device memory.dmp)
    #[argh(positional, greedy)]
    backend_args: Vec<String>,
}

fn main() {
    let args: Args = argh::from_env();
    env_logger::Builder::from_env(Env::default().default_filter_or(if args.verbose {
        "system_classification=debug,memtriage=debug"
    } else {
        "system_classification=info,memtriage=info"
    }))
    .init();

    if args.backend_args.is_empty() {
        println!("Error: backend arguments are required (e.g. '-device <path_to_dump>').");
        println!("Example: system_classification -device memory.dmp --output classification.json");
        std::process::exit(1);
    }

    if let Err(err) = run(&args) {
        log::error!("{:#}", err);
    }
}

fn run(args: &Args) -> Result<()> {
    let vmm = engine::open(&args.backend_args)?;
    let mut triage = ClassificationReport::now();

    // Four independent best-effort steps; a failure in one leaves its report
    // field empty and never aborts the others.
    println!("\n[*] Collecting system information...");
    match engine::vfs_text(&vmm, SYSINFO_PATH) {
        Ok(raw) => {
            triage.system_info = RawSection::new(raw);
            println!("    System info collected from {}", SYSINFO_PATH);
        }
        Err(err) => log::warn!("could not collect system info: {:#}", err),
    }

    println!("\n[*] Collecting running processes...");
    match engine::process_summaries(&vmm) {
        Ok(processes) => {
            println!("    Found {} running processes", processes.len());
            triage.processes = processes;
        }
        Err(err) => log::warn!("could not collect process list: {:#}", err),
    }

    println!("\n[*] Collecting network connections...");
    match engine::vfs_text(&vmm, NET_PATH) {
        Ok(raw) => {
            triage.network_connections =
                RawSection::new(report::truncate_raw(&raw, report::RAW_TEXT_LIMIT));
            println!("    Network info collected from {}", NET_PATH);
        }
        Err(err) => log::warn!("could not collect network info: {:#}", err),
    }

    println!("\n[*] Collecting user accounts...");
    match engine::vfs_text(&vmm, USERS_PATH) {
        Ok(raw) => {
            triage.users = RawSection::new(report::truncate_raw(&raw, report::RAW_TEXT_LIMIT));
            println!("    User info collected from {}", USERS_PATH);
        }
        Err(err) => log::warn!("could not collect user info: {:#}", err),
    }

    println!();
    println!("{}", "=".repeat(60));
    println!("SYSTEM CLASSIFICATION SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Timestamp: {}", triage.timestamp);
    println!("Running Processes: {}", triage.processes.len());
    println!("Network Connections: {}", presence(&triage.network_connections));
    println!("User Accounts: {}", presence(&triage.users));

    println!("\nTop Processes (by PID):");
    for process in triage.top_processes(report::TOP_PROCESS_COUNT) {
        println!(
            "  - {} (PID: {}, PPID: {})",
            process.name, process.pid, process.ppid
        );
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&triage)
            .context("failed to serialize the classification report")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path))?;
        println!("\nReport saved to: {}", path);
    }
    Ok(())
}

fn presence(section: &RawSection) -> &'static str {
    if section.is_present() {
        "Present"
    } else {
        "Not available"
    }
}
