//! Classification report: the one structured artifact this crate produces.

use serde::{Deserialize, Serialize};

/// Network and user raw text is cut to this many characters before storage.
pub const RAW_TEXT_LIMIT: usize = 1000;

/// How many of the lowest-pid processes the summary prints.
pub const TOP_PROCESS_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub timestamp: String,
    pub system_info: RawSection,
    pub processes: Vec<ProcessSummary>,
    pub network_connections: RawSection,
    pub users: RawSection,
}

/// A collection step's raw text; empty when the step failed or produced
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub pid: u32,
    pub name: String,
    pub path: String,
    pub ppid: u32,
}

impl RawSection {
    pub fn new(raw: impl Into<String>) -> RawSection {
        RawSection { raw: raw.into() }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.raw.is_empty()
    }
}

impl ClassificationReport {
    /// An empty report stamped with the current local time.
    #[must_use]
    pub fn now() -> ClassificationReport {
        ClassificationReport {
            timestamp: chrono::Local::now().to_rfc3339(),
            system_info: RawSection::default(),
            processes: Vec::new(),
            network_connections: RawSection::default(),
            users: RawSection::default(),
        }
    }

    /// The `count` lowest-pid processes, ascending by pid.
    #[must_use]
    pub fn top_processes(&self, count: usize) -> Vec<&ProcessSummary> {
        let mut sorted: Vec<&ProcessSummary> = self.processes.iter().collect();
        sorted.sort_by_key(|process| process.pid);
        sorted.truncate(count);
        sorted
    }
}

/// Truncate to at most `limit` characters. Character-based rather than
/// byte-based so a multi-byte sequence is never split.
#[must_use]
pub fn truncate_raw(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(pid: u32, ppid: u32, name: &str) -> ProcessSummary {
        ProcessSummary {
            pid,
            name: name.to_string(),
            path: format!("C:\\Windows\\System32\\{}", name),
            ppid,
        }
    }

    #[test]
    fn truncate_cuts_to_exactly_the_limit() {
        let long: String = "x".repeat(1200);
        let cut = truncate_raw(&long, RAW_TEXT_LIMIT);
        assert_eq!(cut.chars().count(), 1000);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let long: String = "ネットワーク".chars().cycle().take(1500).collect();
        let cut = truncate_raw(&long, RAW_TEXT_LIMIT);
        assert_eq!(cut.chars().count(), 1000);
        assert!(long.starts_with(&cut));
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_raw("tcp 10.0.0.1:445", RAW_TEXT_LIMIT), "tcp 10.0.0.1:445");
    }

    #[test]
    fn top_processes_sorts_ascending_and_caps_the_count() {
        let mut report = ClassificationReport::now();
        for pid in [812, 4, 9240, 368, 1512, 88, 4804, 644, 2360, 7056, 1204, 520] {
            report.processes.push(summary(pid, 4, "svchost.exe"));
        }
        let top = report.top_processes(TOP_PROCESS_COUNT);
        let pids: Vec<u32> = top.iter().map(|process| process.pid).collect();
        assert_eq!(pids, vec![4, 88, 368, 520, 644, 812, 1204, 1512, 2360, 4804]);
    }

    #[test]
    fn top_processes_handles_fewer_than_requested() {
        let mut report = ClassificationReport::now();
        report.processes.push(summary(4, 0, "System"));
        assert_eq!(report.top_processes(TOP_PROCESS_COUNT).len(), 1);
    }

    #[test]
    fn empty_sections_serialize_with_empty_raw_fields() {
        let report = ClassificationReport::now();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["system_info"]["raw"], "");
        assert_eq!(json["network_connections"]["raw"], "");
        assert_eq!(json["users"]["raw"], "");
        assert!(json["processes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = ClassificationReport::now();
        report.system_info = RawSection::new("Windows 10 x64");
        report.users = RawSection::new("Administrator\nGuest");
        report.processes.push(summary(644, 512, "lsass.exe"));
        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: ClassificationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn presence_reflects_raw_content() {
        assert!(!RawSection::default().is_present());
        assert!(RawSection::new("UDP 0.0.0.0:123").is_present());
    }
}
