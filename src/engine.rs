//! Seam to the MemProcFS forensics engine.
//!
//! Everything here is a thin, blocking call into the native vmm library via
//! the `memprocfs` crate. Address translation, process/handle enumeration and
//! YARA evaluation all happen on the engine's side; these helpers only shape
//! arguments and surface readable errors.

use crate::report::ProcessSummary;
use anyhow::{anyhow, bail, Context, Result};
use memprocfs::{
    Vmm, VmmProcess, VmmProcessMapHandleEntry, VmmYaraMatch, FLAG_NOCACHE, FLAG_ZEROPAD_ON_FAIL,
};

/// Overrides where the native vmm library (`vmm.dll` / `vmm.so` /
/// `vmm.dylib`) is loaded from. Without it the platform's dynamic loader
/// searches its usual paths for the bare library name.
pub const LIB_PATH_ENV: &str = "MEMPROCFS_LIB_PATH";

/// Upper bound on a single virtual-filesystem read.
const VFS_READ_MAX: u32 = 0x0010_0000;

/// Bytes read at each match address for display purposes.
pub const PAYLOAD_WINDOW: usize = 64;

/// Cap on YARA results retained by the engine per scan.
const YARA_MAX_RESULTS: u32 = 0x10000;

fn lib_path() -> String {
    if let Ok(path) = std::env::var(LIB_PATH_ENV) {
        return path;
    }
    if cfg!(windows) {
        "vmm.dll"
    } else if cfg!(target_os = "macos") {
        "vmm.dylib"
    } else {
        "vmm.so"
    }
    .to_string()
}

/// Open a session against a memory image or live target. The backend tokens
/// are forwarded opaquely to the engine initializer (first typically
/// `-device <path>`); this crate defines no schema for them.
pub fn open(backend_args: &[String]) -> Result<Vmm<'static>> {
    let args: Vec<&str> = backend_args.iter().map(String::as_str).collect();
    let vmm = Vmm::new(&lib_path(), &args).with_context(|| {
        format!(
            "failed to initialize the forensics engine with args {:?}",
            backend_args
        )
    })?;
    log::info!("engine initialized with args: {:?}", backend_args);
    Ok(vmm)
}

/// Look a process up by numeric pid or by name. The engine reports a miss as
/// an error in both paths; either way it becomes the same not-found message.
pub fn resolve_process<'a>(vmm: &'a Vmm<'a>, ident: &str) -> Result<VmmProcess<'a>> {
    let lookup = match ident.parse::<u32>() {
        Ok(pid) => vmm.process_from_pid(pid),
        Err(_) => vmm.process_from_name(ident),
    };
    lookup.map_err(|_| anyhow!("process '{}' not found", ident))
}

/// The extent of the process's virtual memory map: one past the end of the
/// highest mapped VAD region.
pub fn vmem_size(process: &VmmProcess) -> Result<u64> {
    let vad = process
        .map_vad(false)
        .context("failed to read the virtual address descriptor map")?;
    Ok(vad
        .iter()
        .map(|entry| entry.va_end.saturating_add(1))
        .max()
        .unwrap_or(0))
}

/// Read the process's virtual address space from 0 as one contiguous,
/// zero-padded block. Slow for large processes; the caller warns about that.
pub fn read_vmem(process: &VmmProcess, size: u64) -> Result<Vec<u8>> {
    let size =
        usize::try_from(size).context("virtual memory size exceeds the platform address width")?;
    process
        .mem_read_ex(0, size, FLAG_NOCACHE | FLAG_ZEROPAD_ON_FAIL)
        .context("memory read failed")
}

pub fn handles(process: &VmmProcess) -> Result<Vec<VmmProcessMapHandleEntry>> {
    process.map_handle().context("failed to enumerate handles")
}

/// Run a YARA scan over the whole process address space. `rule_path` is a
/// path to a rule file, handed to the engine as-is; the caller has already
/// checked that the file exists.
pub fn yara_scan(process: &VmmProcess, rule_path: &str) -> Result<Vec<VmmYaraMatch>> {
    let rules = vec![rule_path];
    let mut scan = process
        .search_yara(rules, 0, 0, YARA_MAX_RESULTS, 0)
        .context("failed to start the yara scan")?;
    let result = scan.result();
    if !result.is_completed_success {
        bail!("yara scan did not complete successfully");
    }
    Ok(result.result)
}

/// Best-effort read of a small window at a match address, for display only.
/// An unreadable address comes back empty rather than failing the scan.
pub fn match_payload(process: &VmmProcess, va: u64) -> Vec<u8> {
    process
        .mem_read_ex(va, PAYLOAD_WINDOW, FLAG_NOCACHE)
        .unwrap_or_default()
}

/// Read a virtual-filesystem file (e.g. `/sys/sysinfo`) as lossy UTF-8 text.
pub fn vfs_text(vmm: &Vmm, path: &str) -> Result<String> {
    let data = vmm
        .vfs_read(path, VFS_READ_MAX, 0)
        .with_context(|| format!("failed to read {}", path))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// One summary per process in the image. A process that disappears between
/// enumeration and the info query is skipped; a missing user path is left
/// empty rather than failing the whole collection.
pub fn process_summaries(vmm: &Vmm) -> Result<Vec<ProcessSummary>> {
    let mut summaries = Vec::new();
    for process in vmm.process_list().context("failed to enumerate processes")? {
        let info = match process.info() {
            Ok(info) => info,
            Err(err) => {
                log::debug!("skipping pid {}: {:#}", process.pid, err);
                continue;
            }
        };
        summaries.push(ProcessSummary {
            pid: info.pid,
            name: info.name,
            path: process.get_path_user().unwrap_or_default(),
            ppid: info.ppid,
        });
    }
    Ok(summaries)
}
