//! IOS-XE: same banners as IOS with the XE version line variants.

use super::{nxos, CommandFamily, Dialect, OsType};
use crate::decode::{text, DecodedPayload};
use crate::error::DecodeError;
use once_cell::sync::Lazy;
use regex::Regex;

// "Cisco IOS XE Software, Version 16.09.03"
static XE_BANNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*Cisco IOS XE Software,\s+Version\s+([^,\s]+)").expect("valid IOS-XE banner regex")
});

// "Cisco IOS Software [Fuji], ISR Software (X86_64_LINUX_IOSD-UNIVERSALK9-M), Version 16.9.3, RELEASE SOFTWARE (fc2)"
static IOSD_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*IOS.*,\s+Version\s+([^,\s]+)").expect("valid IOS-XE version regex")
});

pub struct IosXe;

impl Dialect for IosXe {
    fn os_type(&self) -> OsType {
        OsType::IosXe
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
                &[&XE_BANNER_RE, &IOSD_VERSION_RE],
            ))),
            CommandFamily::Memory => Ok(DecodedPayload::Memory(text::memory_pools(payload))),
            CommandFamily::Cpu => Ok(DecodedPayload::Cpu(text::cpu(payload))),
            CommandFamily::Environment => {
                nxos::decode_environment(payload).map(DecodedPayload::Environment)
            }
            CommandFamily::VersionDetailed => Err(DecodeError::new(family, "no IOS-XE decoder")),
        }
    }
}
