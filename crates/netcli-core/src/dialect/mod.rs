//! Device OS dialects and the registry of what each one can decode.
//!
//! Every decode goes through [`dialect_for`] after [`supports`] has been
//! consulted; an unsupported pair is never parsed on a best-effort basis.

mod ios;
mod iosxe;
mod nxos;

pub use ios::Ios;
pub use iosxe::IosXe;
pub use nxos::NxOs;

use crate::decode::DecodedPayload;
use crate::error::{DecodeError, EngineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported device operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Ios,
    IosXe,
    NxOs,
}

impl OsType {
    pub const ALL: [OsType; 3] = [OsType::Ios, OsType::IosXe, OsType::NxOs];

    pub fn as_str(&self) -> &'static str {
        match self {
            OsType::Ios => "ios",
            OsType::IosXe => "iosxe",
            OsType::NxOs => "nxos",
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "ios" => Ok(OsType::Ios),
            "iosxe" => Ok(OsType::IosXe),
            "nxos" => Ok(OsType::NxOs),
            other => Err(format!("unknown OS type '{}' (expected ios, iosxe or nxos)", other)),
        }
    }
}

/// One sub-collection of a poll, each backed by a single CLI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandFamily {
    Version,
    VersionDetailed,
    Memory,
    Cpu,
    Environment,
}

impl CommandFamily {
    /// Poll order.
    pub const ALL: [CommandFamily; 5] = [
        CommandFamily::Version,
        CommandFamily::VersionDetailed,
        CommandFamily::Memory,
        CommandFamily::Cpu,
        CommandFamily::Environment,
    ];

    /// Literal CLI string issued to the device.
    pub fn command(&self) -> &'static str {
        match self {
            CommandFamily::Version => "show version",
            CommandFamily::VersionDetailed => "show version | json",
            CommandFamily::Memory => "show process memory",
            CommandFamily::Cpu => "show process cpu",
            CommandFamily::Environment => "show environment | json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandFamily::Version => "version",
            CommandFamily::VersionDetailed => "version_detailed",
            CommandFamily::Memory => "memory",
            CommandFamily::Cpu => "cpu",
            CommandFamily::Environment => "environment",
        }
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        CommandFamily::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown command family '{}'", s.trim()))
    }
}

/// Per-OS decoding of normalized payloads.
///
/// Vendor field naming lives in the implementations; assemblers only see
/// the dialect-neutral [`DecodedPayload`].
pub trait Dialect: Send + Sync {
    fn os_type(&self) -> OsType;

    /// Families this dialect can decode.
    fn families(&self) -> &'static [CommandFamily];

    /// Decode a payload for a family listed in [`Dialect::families`].
    fn decode(&self, family: CommandFamily, payload: &str) -> Result<DecodedPayload, DecodeError>;
}

static IOS: Ios = Ios;
static IOS_XE: IosXe = IosXe;
static NX_OS: NxOs = NxOs;

/// Registry lookup of the decoder implementation for an OS.
pub fn dialect_for(os: OsType) -> &'static dyn Dialect {
    match os {
        OsType::Ios => &IOS,
        OsType::IosXe => &IOS_XE,
        OsType::NxOs => &NX_OS,
    }
}

/// Whether `family` may be decoded for `os`.
pub fn supports(os: OsType, family: CommandFamily) -> bool {
    dialect_for(os).families().contains(&family)
}

/// Gate a decode on the registry, then run it.
pub fn decode(os: OsType, family: CommandFamily, payload: &str) -> Result<DecodedPayload, EngineError> {
    if !supports(os, family) {
        return Err(EngineError::UnsupportedPlatform { os, family });
    }
    Ok(dialect_for(os).decode(family, payload)?)
}
