//! NX-OS: JSON-wrapped tables for environment and version facts.

use super::{CommandFamily, Dialect, OsType};
use crate::decode::json::{decode_document, lenient_string, rows, table};
use crate::decode::{
    text, DecodedPayload, EnvironmentPayload, FanRow, FanZoneRow, LastResetFields,
    PowerModeSummary, PowerSupplyRow, TemperatureRow, UptimeFields, VersionDetailedPayload,
};
use crate::error::DecodeError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static NXOS_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*NXOS:\s+version\s+(\S+)").expect("valid NX-OS version regex"));

// Releases before 9.x label the image "system".
static SYSTEM_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*system:\s+version\s+(\S+)").expect("valid NX-OS system regex"));

pub struct NxOs;

impl Dialect for NxOs {
    fn os_type(&self) -> OsType {
        OsType::NxOs
    }

    fn families(&self) -> &'static [CommandFamily] {
        &[
            CommandFamily::Version,
            CommandFamily::VersionDetailed,
            CommandFamily::Cpu,
            CommandFamily::Environment,
        ]
    }

    fn decode(&self, family: CommandFamily, payload: &str) -> Result<DecodedPayload, DecodeError> {
        match family {
            CommandFamily::Version => Ok(DecodedPayload::Version(text::version(
                payload,
                &[&NXOS_VERSION_RE, &SYSTEM_VERSION_RE],
            ))),
            CommandFamily::VersionDetailed => {
                decode_version_detailed(payload).map(DecodedPayload::VersionDetailed)
            }
            CommandFamily::Cpu => Ok(DecodedPayload::Cpu(text::cpu(payload))),
            CommandFamily::Environment => {
                decode_environment(payload).map(DecodedPayload::Environment)
            }
            CommandFamily::Memory => Err(DecodeError::new(family, "no NX-OS decoder")),
        }
    }
}

// === show environment | json ===

#[derive(Debug, Default, Deserialize)]
struct EnvironmentDoc {
    #[serde(rename = "TABLE_tempinfo", default, deserialize_with = "table")]
    temp_info: TempInfoTable,
    #[serde(rename = "powersup", default)]
    power_sup: Option<PowerSup>,
    #[serde(rename = "fandetails", default, deserialize_with = "table")]
    fan_details: FanDetails,
}

#[derive(Debug, Default, Deserialize)]
struct TempInfoTable {
    #[serde(rename = "ROW_tempinfo", default, deserialize_with = "rows")]
    rows: Vec<TempInfoRow>,
}

#[derive(Debug, Default, Deserialize)]
struct TempInfoRow {
    #[serde(default, deserialize_with = "lenient_string")]
    sensor: String,
    #[serde(default, deserialize_with = "lenient_string")]
    curtemp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    alarmstatus: String,
}

#[derive(Debug, Default, Deserialize)]
struct PowerSup {
    #[serde(rename = "TABLE_psinfo", default, deserialize_with = "table")]
    ps_info: PsInfoTable,
    #[serde(default)]
    power_summary: Option<PowerSummary>,
}

#[derive(Debug, Default, Deserialize)]
struct PsInfoTable {
    #[serde(rename = "ROW_psinfo", default, deserialize_with = "rows")]
    rows: Vec<PsInfoRow>,
}

#[derive(Debug, Default, Deserialize)]
struct PsInfoRow {
    #[serde(default, deserialize_with = "lenient_string")]
    psnum: String,
    #[serde(default, deserialize_with = "lenient_string")]
    psmodel: String,
    #[serde(default, deserialize_with = "lenient_string")]
    actual_out: String,
    #[serde(default, deserialize_with = "lenient_string")]
    actual_input: String,
    #[serde(default, deserialize_with = "lenient_string")]
    tot_capa: String,
    #[serde(default, deserialize_with = "lenient_string")]
    ps_status: String,
}

#[derive(Debug, Default, Deserialize)]
struct PowerSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    ps_redun_mode: String,
    #[serde(default, deserialize_with = "lenient_string")]
    ps_oper_mode: String,
}

#[derive(Debug, Default, Deserialize)]
struct FanDetails {
    #[serde(rename = "TABLE_faninfo", default, deserialize_with = "table")]
    fan_info: FanInfoTable,
    #[serde(rename = "TABLE_fan_zone_speed", default, deserialize_with = "table")]
    fan_zone_speed: FanZoneSpeedTable,
}

#[derive(Debug, Default, Deserialize)]
struct FanInfoTable {
    #[serde(rename = "ROW_faninfo", default, deserialize_with = "rows")]
    rows: Vec<FanInfoRow>,
}

#[derive(Debug, Default, Deserialize)]
struct FanInfoRow {
    #[serde(default, deserialize_with = "lenient_string")]
    fanname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    fanmodel: String,
    #[serde(default, deserialize_with = "lenient_string")]
    fanstatus: String,
}

#[derive(Debug, Default, Deserialize)]
struct FanZoneSpeedTable {
    #[serde(rename = "ROW_fan_zone_speed", default, deserialize_with = "rows")]
    rows: Vec<FanZoneSpeedRow>,
}

#[derive(Debug, Default, Deserialize)]
struct FanZoneSpeedRow {
    #[serde(default, deserialize_with = "lenient_string")]
    zone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    zonespeed: String,
}

/// Decode the TABLE_/ROW_ environment document.
///
/// IOS and IOS-XE answer `show environment | json` with the same layout.
pub(crate) fn decode_environment(payload: &str) -> Result<EnvironmentPayload, DecodeError> {
    let mut doc: EnvironmentDoc = decode_document(CommandFamily::Environment, payload)?;
    // The mode pair follows the supply table; a missing summary leaves it blank.
    let power_mode = doc.power_sup.as_mut().map(|ps| {
        let summary = ps.power_summary.take().unwrap_or_default();
        PowerModeSummary {
            configured: summary.ps_redun_mode,
            operational: summary.ps_oper_mode,
        }
    });
    let power_sup = doc.power_sup.unwrap_or_default();

    Ok(EnvironmentPayload {
        temperatures: doc
            .temp_info
            .rows
            .into_iter()
            .map(|r| TemperatureRow {
                sensor: r.sensor,
                current: r.curtemp,
                alarm_status: r.alarmstatus,
            })
            .collect(),
        power_supplies: power_sup
            .ps_info
            .rows
            .into_iter()
            .map(|r| PowerSupplyRow {
                id: r.psnum,
                model: r.psmodel,
                actual_input: r.actual_input,
                actual_output: r.actual_out,
                capacity: r.tot_capa,
                status: r.ps_status,
            })
            .collect(),
        fans: doc
            .fan_details
            .fan_info
            .rows
            .into_iter()
            .map(|r| FanRow {
                name: r.fanname,
                model: r.fanmodel,
                status: r.fanstatus,
            })
            .collect(),
        power_mode,
        fan_zones: doc
            .fan_details
            .fan_zone_speed
            .rows
            .into_iter()
            .map(|r| FanZoneRow {
                zone: r.zone,
                speed: r.zonespeed,
            })
            .collect(),
    })
}

// === show version | json ===

#[derive(Debug, Default, Deserialize)]
struct VersionDoc {
    #[serde(default, deserialize_with = "lenient_string")]
    chassis_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    host_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    bios_ver_str: String,
    #[serde(default, deserialize_with = "lenient_string")]
    kern_uptm_days: String,
    #[serde(default, deserialize_with = "lenient_string")]
    kern_uptm_hrs: String,
    #[serde(default, deserialize_with = "lenient_string")]
    kern_uptm_mins: String,
    #[serde(default, deserialize_with = "lenient_string")]
    kern_uptm_secs: String,
    #[serde(default, deserialize_with = "lenient_string")]
    rr_usecs: String,
    #[serde(default, deserialize_with = "lenient_string")]
    rr_reason: String,
    #[serde(default, deserialize_with = "lenient_string")]
    rr_service: String,
    #[serde(default, deserialize_with = "lenient_string")]
    rr_sys_ver: String,
}

fn decode_version_detailed(payload: &str) -> Result<VersionDetailedPayload, DecodeError> {
    let doc: VersionDoc = decode_document(CommandFamily::VersionDetailed, payload)?;

    Ok(VersionDetailedPayload {
        chassis_id: doc.chassis_id,
        host_name: doc.host_name,
        bios_version: doc.bios_ver_str,
        uptime: UptimeFields {
            days: doc.kern_uptm_days,
            hours: doc.kern_uptm_hrs,
            minutes: doc.kern_uptm_mins,
            seconds: doc.kern_uptm_secs,
        },
        last_reset: LastResetFields {
            usecs: doc.rr_usecs,
            reason: doc.rr_reason,
            service: doc.rr_service,
            system_version: doc.rr_sys_ver,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NXOS_ENVIRONMENT: &str = r#"{
  "fandetails": {
    "TABLE_faninfo": {
      "ROW_faninfo": [
        {"fanname": "Fan1(sys_fan1)", "fanmodel": "NXA-FAN-30CFM-B", "fanhwver": "--", "fandir": "back-to-front", "fanstatus": "Ok"},
        {"fanname": "Fan2(sys_fan2)", "fanmodel": "NXA-FAN-30CFM-B", "fanhwver": "--", "fandir": "back-to-front", "fanstatus": "Ok"}
      ]
    },
    "TABLE_fan_zone_speed": {"ROW_fan_zone_speed": {"zone": "1", "zonespeed": "0x5f"}},
    "fan_filter_status": "NotSupported"
  },
  "powersup": {
    "voltage_level": 12,
    "TABLE_psinfo": {
      "ROW_psinfo": [
        {"psnum": 1, "psmodel": "NXA-PAC-650W-PE", "actual_out": "98 W", "actual_input": "109 W", "tot_capa": "650 W", "ps_status": "Ok"}
      ]
    },
    "power_summary": {"ps_redun_mode": "PS-Redundant", "ps_oper_mode": "Non-Redundant", "tot_pow_capacity": "650.00 W"}
  },
  "TABLE_tempinfo": {
    "ROW_tempinfo": [
      {"tempmod": "1", "sensor": "FRONT", "majthres": "80", "minthres": "70", "curtemp": "29", "alarmstatus": "Ok"},
      {"tempmod": "1", "sensor": "BACK", "majthres": "70", "minthres": "42", "curtemp": "25", "alarmstatus": "Ok"}
    ]
  }
}"#;

    #[test]
    fn golden_environment_decode() {
        let env = decode_environment(NXOS_ENVIRONMENT).unwrap();
        assert_eq!(env.temperatures.len(), 2);
        assert_eq!(env.temperatures[0].sensor, "FRONT");
        assert_eq!(env.temperatures[0].current, "29");
        assert_eq!(env.power_supplies.len(), 1);
        assert_eq!(env.power_supplies[0].id, "1");
        assert_eq!(env.power_supplies[0].actual_input, "109 W");
        assert_eq!(env.fans.len(), 2);
        assert_eq!(env.fans[1].name, "Fan2(sys_fan2)");
        assert_eq!(
            env.power_mode,
            Some(PowerModeSummary {
                configured: "PS-Redundant".into(),
                operational: "Non-Redundant".into(),
            })
        );
        assert_eq!(env.fan_zones.len(), 1);
        assert_eq!(env.fan_zones[0].speed, "0x5f");
    }

    #[test]
    fn golden_environment_absent_tables() {
        let env = decode_environment(
            r#"{"TABLE_tempinfo":{"ROW_tempinfo":[{"sensor":"CPU","curtemp":"45","alarmstatus":"Ok"}]}}"#,
        )
        .unwrap();
        assert_eq!(env.temperatures.len(), 1);
        assert!(env.power_supplies.is_empty());
        assert!(env.fans.is_empty());
        assert!(env.power_mode.is_none());
        assert!(env.fan_zones.is_empty());
    }

    #[test]
    fn golden_environment_summary_missing() {
        let env = decode_environment(
            r#"{"powersup":{"TABLE_psinfo":{"ROW_psinfo":{"psnum":"1","ps_status":"Ok"}}}}"#,
        )
        .unwrap();
        assert_eq!(env.power_supplies.len(), 1);
        assert_eq!(env.power_mode, Some(PowerModeSummary::default()));
    }

    #[test]
    fn golden_environment_null_tables() {
        let env = decode_environment(
            r#"{"TABLE_tempinfo":{"ROW_tempinfo":[{"sensor":"CPU","curtemp":"45","alarmstatus":"Ok"}]},"fandetails":null}"#,
        )
        .unwrap();
        assert_eq!(env.temperatures.len(), 1);
        assert!(env.fans.is_empty());
        assert!(env.fan_zones.is_empty());

        let env = decode_environment(
            r#"{"TABLE_tempinfo":null,"powersup":{"TABLE_psinfo":null},"fandetails":{"TABLE_faninfo":null,"TABLE_fan_zone_speed":null}}"#,
        )
        .unwrap();
        assert!(env.temperatures.is_empty());
        assert!(env.power_supplies.is_empty());
        assert!(env.fans.is_empty());
        assert!(env.fan_zones.is_empty());
        assert_eq!(env.power_mode, Some(PowerModeSummary::default()));
    }

    #[test]
    fn golden_environment_malformed() {
        let err = decode_environment(r#"{"TABLE_tempinfo": [}"#).unwrap_err();
        assert_eq!(err.family, CommandFamily::Environment);
        assert!(err.offset.is_some());
    }

    #[test]
    fn golden_version_detailed() {
        let payload = r#"{
  "bios_ver_str": "07.69", "chassis_id": "Nexus9000 C93180YC-EX chassis",
  "host_name": "leaf-1", "kern_uptm_days": "12", "kern_uptm_hrs": "3",
  "kern_uptm_mins": "4", "kern_uptm_secs": "5", "rr_usecs": "134703",
  "rr_ctime": "Tue Jan  5 09:18:43 2021", "rr_reason": "Reset Requested by CLI command reload",
  "rr_sys_ver": "9.3(5)", "rr_service": ""
}"#;
        let version = decode_version_detailed(payload).unwrap();
        assert_eq!(version.host_name, "leaf-1");
        assert_eq!(version.bios_version, "07.69");
        assert_eq!(version.uptime.days, "12");
        assert_eq!(version.last_reset.usecs, "134703");
        assert_eq!(version.last_reset.system_version, "9.3(5)");
    }

    #[test]
    fn golden_version_banner() {
        let payload = "Software\n  BIOS: version 07.69\n  NXOS: version 9.3(5)\n  BIOS compile time:  04/08/2021\n";
        let decoded = NxOs.decode(CommandFamily::Version, payload).unwrap();
        assert_eq!(
            decoded,
            DecodedPayload::Version(crate::decode::VersionPayload {
                version: Some("9.3(5)".into())
            })
        );
    }

    #[test]
    fn golden_version_banner_legacy() {
        let payload = "Software\n  BIOS:      version 3.22.0\n  system:    version 6.0(2)U6(10)\n";
        let decoded = NxOs.decode(CommandFamily::Version, payload).unwrap();
        assert!(matches!(
            decoded,
            DecodedPayload::Version(v) if v.version.as_deref() == Some("6.0(2)U6(10)")
        ));
    }
}
