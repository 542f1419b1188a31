//! Classic IOS: plain-text banners, environment through the table/row JSON layout.

use super::{nxos, CommandFamily, Dialect, OsType};
use crate::decode::{text, DecodedPayload};
use crate::error::DecodeError;
use once_cell::sync::Lazy;
use regex::Regex;

// "Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 12.2(55)SE5, RELEASE SOFTWARE (fc1)"
static IOS_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*IOS.*,\s+Version\s+([^,\s]+),").expect("valid IOS version regex")
});

pub struct Ios;

impl Dialect for Ios {
    fn os_type(&self) -> OsType {
        OsType::Ios
    }

    fn families(&self) -> &'static [CommandFamily] {
        &[
            CommandFamily::Version,
            CommandFamily::Memory,
            CommandFamily::Cpu,
            CommandFamily::Environment,
        ]
    }

    fn decode(&self, family: CommandFamily, payload: &str) -> Result<DecodedPayload, DecodeError> {
        match family {
            CommandFamily::Version => Ok(DecodedPayload::Version(text::version(
                payload,
                &[&IOS_VERSION_RE],
            ))),
            CommandFamily::Memory => Ok(DecodedPayload::Memory(text::memory_pools(payload))),
            CommandFamily::Cpu => Ok(DecodedPayload::Cpu(text::cpu(payload))),
            CommandFamily::Environment => {
                nxos::decode_environment(payload).map(DecodedPayload::Environment)
            }
            CommandFamily::VersionDetailed => Err(DecodeError::new(family, "no IOS decoder")),
        }
    }
}
