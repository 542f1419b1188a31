//! Field extraction from plain-text command banners.
//!
//! Lines are matched against known label patterns. A field that is not
//! found stays `None`; extraction never fails as a whole.

use super::{CpuPayload, MemoryPayload, MemoryPoolRow, VersionPayload};
use once_cell::sync::Lazy;
use regex::Regex;

static CPU_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"CPU utilization for five seconds:\s*(\d+(?:\.\d+)?)%\s*/\s*(\d+(?:\.\d+)?)%;\s*one minute:\s*(\d+(?:\.\d+)?)%;\s*five minutes:\s*(\d+(?:\.\d+)?)%",
    )
    .expect("valid CPU regex")
});

static MEMORY_POOL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(.+?)\s+Pool Total:\s*(\d+)\s+Used:\s*(\d+)\s+Free:\s*(\d+)")
        .expect("valid memory pool regex")
});

/// First capture group of the first line matching `re`.
pub fn first_capture(payload: &str, re: &Regex) -> Option<String> {
    payload
        .lines()
        .find_map(|line| re.captures(line.trim_end_matches('\r')))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Extract the OS version using the dialect's banner patterns, tried in order.
pub fn version(payload: &str, patterns: &[&Regex]) -> VersionPayload {
    VersionPayload {
        version: patterns
            .iter()
            .find_map(|re| first_capture(payload, re))
            .filter(|v| !v.is_empty()),
    }
}

/// Extract the five-second/interrupt/one-minute/five-minute figures.
pub fn cpu(payload: &str) -> CpuPayload {
    let caps = payload
        .lines()
        .find_map(|line| CPU_RE.captures(line.trim_end_matches('\r')));

    let Some(caps) = caps else {
        return CpuPayload::default();
    };
    let field = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

    CpuPayload {
        five_seconds: field(1),
        interrupts: field(2),
        one_minute: field(3),
        five_minutes: field(4),
    }
}

/// One row per `<pool> Pool Total: .. Used: .. Free: ..` line, in output order.
pub fn memory_pools(payload: &str) -> MemoryPayload {
    let pools = payload
        .lines()
        .filter_map(|line| MEMORY_POOL_RE.captures(line.trim_end_matches('\r')))
        .map(|caps| MemoryPoolRow {
            pool: caps[1].trim().to_string(),
            total: caps[2].to_string(),
            used: caps[3].to_string(),
            free: caps[4].to_string(),
        })
        .collect();

    MemoryPayload { pools }
}
