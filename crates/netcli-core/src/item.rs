//! Canonical metric records produced by the assemblers.

use serde::{Deserialize, Serialize};

/// What a [`MetricItem`] measures. The label meaning of `name`, `detail`
/// and `status` is fixed per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// name = sensor, status = alarm status
    Temperature,
    /// name = supply id, detail = model, status = raw supply status
    PowerIn,
    PowerOut,
    PowerStatus,
    PowerCapacity,
    /// name = "configured" | "operational", status = redundancy mode; value is always 0
    PowerMode,
    /// name = fan id, detail = model, status = raw fan status
    FanStatus,
    /// name = zone
    FanSpeed,
    /// name = OS version string
    Version,
    Uptime,
    /// name = reason, detail = service, status = system version
    LastReset,
    /// name = hostname
    Hostname,
    /// name = BIOS version string
    BiosVersion,
    /// name = chassis description
    ChassisId,
    /// name = memory pool
    MemoryTotal,
    MemoryUsed,
    MemoryFree,
    CpuOneMinute,
    CpuFiveSeconds,
    CpuFiveMinutes,
    CpuInterrupts,
}

/// A numeric value together with how it was obtained.
///
/// Exported values follow the permissive policy (missing readings become 0,
/// fan speed sentinels are -1 and -2), but consumers can still tell a
/// defaulted value from a genuine zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Reading {
    Measured(f64),
    /// Field absent or unparsable
    Defaulted,
    /// Hex intensity could not be parsed
    Invalid,
    /// Hex intensity outside 0..=255
    OutOfRange,
}

impl Reading {
    pub const INVALID_SENTINEL: f64 = -1.0;
    pub const OUT_OF_RANGE_SENTINEL: f64 = -2.0;

    /// Number handed to the exporter.
    pub fn value(&self) -> f64 {
        match self {
            Self::Measured(v) => *v,
            Self::Defaulted => 0.0,
            Self::Invalid => Self::INVALID_SENTINEL,
            Self::OutOfRange => Self::OUT_OF_RANGE_SENTINEL,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reading::Defaulted, Reading::Measured)
    }
}

/// One exported measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    pub kind: ItemKind,
    pub name: String,
    pub detail: String,
    pub status: String,
    pub reading: Reading,
}

impl MetricItem {
    pub fn new(kind: ItemKind, name: impl Into<String>, reading: Reading) -> Self {
        Self {
            kind,
            name: name.into(),
            detail: String::new(),
            status: String::new(),
            reading,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn value(&self) -> f64 {
        self.reading.value()
    }
}
