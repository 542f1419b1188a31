//! Dialect-neutral decoded payloads.
//!
//! Decoders fill these from normalized command output. Scalars stay as the
//! raw text the device reported; coercion happens in the assemblers.

pub mod json;
pub mod text;

/// Decoded output of one command family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPayload {
    Version(VersionPayload),
    VersionDetailed(VersionDetailedPayload),
    Memory(MemoryPayload),
    Cpu(CpuPayload),
    Environment(EnvironmentPayload),
}

/// `show version` banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPayload {
    pub version: Option<String>,
}

/// `show version | json` facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDetailedPayload {
    pub chassis_id: String,
    pub host_name: String,
    pub bios_version: String,
    pub uptime: UptimeFields,
    pub last_reset: LastResetFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UptimeFields {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastResetFields {
    pub usecs: String,
    pub reason: String,
    pub service: String,
    pub system_version: String,
}

/// `show process memory` pool summary lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPayload {
    pub pools: Vec<MemoryPoolRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPoolRow {
    pub pool: String,
    pub total: String,
    pub used: String,
    pub free: String,
}

/// `show process cpu` utilization banner. `None` when the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuPayload {
    pub five_seconds: Option<String>,
    pub interrupts: Option<String>,
    pub one_minute: Option<String>,
    pub five_minutes: Option<String>,
}

/// `show environment | json` tables. Absent tables are empty collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentPayload {
    pub temperatures: Vec<TemperatureRow>,
    pub power_supplies: Vec<PowerSupplyRow>,
    pub fans: Vec<FanRow>,
    /// Present only when the device reported a power summary
    pub power_mode: Option<PowerModeSummary>,
    pub fan_zones: Vec<FanZoneRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemperatureRow {
    pub sensor: String,
    pub current: String,
    pub alarm_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerSupplyRow {
    pub id: String,
    pub model: String,
    pub actual_input: String,
    pub actual_output: String,
    pub capacity: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanRow {
    pub name: String,
    pub model: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerModeSummary {
    pub configured: String,
    pub operational: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanZoneRow {
    pub zone: String,
    pub speed: String,
}
