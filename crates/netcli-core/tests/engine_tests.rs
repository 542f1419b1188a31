//! End-to-end tests: scripted device transcripts through the dispatcher.

use netcli_core::*;
use std::collections::HashMap;

/// Replays canned transcripts keyed by command; anything else is a transport error.
struct ScriptedDevice {
    replies: HashMap<String, String>,
}

impl ScriptedDevice {
    fn new(replies: &[(&str, String)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(cmd, reply)| (cmd.to_string(), reply.clone()))
                .collect(),
        }
    }
}

impl CommandExecutor for ScriptedDevice {
    fn run(&self, command: &str) -> Result<String, TransportError> {
        self.replies
            .get(command)
            .cloned()
            .ok_or_else(|| TransportError::Missing {
                command: command.to_string(),
            })
    }
}

fn wrap(command: &str, payload: &str) -> String {
    format!("leaf-1# {}\n{}\nleaf-1#", command, payload)
}

fn environment_json(supplies: usize, fans: usize) -> String {
    let supply_rows: Vec<String> = (1..=supplies)
        .map(|i| {
            format!(
                r#"{{"psnum":"{i}","psmodel":"NXA-PAC-650W","actual_out":"{o} W","actual_input":"{n} W","tot_capa":"650 W","ps_status":"Ok"}}"#,
                i = i,
                o = 90 + i,
                n = 100 + i
            )
        })
        .collect();
    let fan_rows: Vec<String> = (1..=fans)
        .map(|i| format!(r#"{{"fanname":"Fan{i}","fanmodel":"NXA-FAN","fanstatus":"Ok"}}"#, i = i))
        .collect();

    format!(
        r#"{{
  "fandetails": {{
    "TABLE_faninfo": {{"ROW_faninfo": [{fans}]}},
    "TABLE_fan_zone_speed": {{"ROW_fan_zone_speed": {{"zone": "1", "zonespeed": "0xff"}}}}
  }},
  "powersup": {{
    "TABLE_psinfo": {{"ROW_psinfo": [{supplies}]}},
    "power_summary": {{"ps_redun_mode": "PS-Redundant", "ps_oper_mode": "PS-Redundant"}}
  }},
  "TABLE_tempinfo": {{"ROW_tempinfo": []}}
}}"#,
        fans = fan_rows.join(","),
        supplies = supply_rows.join(",")
    )
}

#[test]
fn test_environment_item_count_formula() {
    for (n, m) in [(0, 0), (1, 0), (2, 3), (4, 6)] {
        let raw = wrap("show environment | json", &environment_json(n, m));
        let items = extract(OsType::NxOs, CommandFamily::Environment, &raw).unwrap();
        assert_eq!(items.len(), 4 * n + m + 2 + 1, "n={} m={}", n, m);

        let supply_names: Vec<&str> = items
            .iter()
            .filter(|i| i.kind == ItemKind::PowerIn)
            .map(|i| i.name.as_str())
            .collect();
        let expected: Vec<String> = (1..=n).map(|i| i.to_string()).collect();
        assert_eq!(supply_names, expected);
    }
}

#[test]
fn test_power_mode_pair_without_summary() {
    let payload = r#"{
  "fandetails": {
    "TABLE_faninfo": {"ROW_faninfo": {"fanname": "Fan1", "fanmodel": "NXA-FAN", "fanstatus": "Ok"}},
    "TABLE_fan_zone_speed": {"ROW_fan_zone_speed": {"zone": "1", "zonespeed": "0xff"}}
  },
  "powersup": {
    "TABLE_psinfo": {"ROW_psinfo": {"psnum": "1", "psmodel": "NXA-PAC-650W", "actual_out": "90 W", "actual_input": "100 W", "tot_capa": "650 W", "ps_status": "Ok"}}
  }
}"#;
    let raw = wrap("show environment | json", payload);
    let items = extract(OsType::NxOs, CommandFamily::Environment, &raw).unwrap();

    assert_eq!(items.len(), 4 + 1 + 2 + 1);
    let modes: Vec<(&str, &str)> = items
        .iter()
        .filter(|i| i.kind == ItemKind::PowerMode)
        .map(|i| (i.name.as_str(), i.status.as_str()))
        .collect();
    assert_eq!(modes, vec![("configured", ""), ("operational", "")]);
}

#[test]
fn test_null_table_keeps_sibling_rows() {
    let raw = r#"{"TABLE_tempinfo":{"ROW_tempinfo":[{"sensor":"CPU","curtemp":"45","alarmstatus":"Ok"}]},"fandetails":null,"powersup":{"TABLE_psinfo":null}}"#;
    let items = extract(OsType::NxOs, CommandFamily::Environment, raw).unwrap();

    let kinds: Vec<ItemKind> = items.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![ItemKind::Temperature, ItemKind::PowerMode, ItemKind::PowerMode]);
    assert_eq!(items[0].value(), 45.0);
}

#[test]
fn test_status_coercion_closed_world() {
    use netcli_core::coerce::health_code;
    assert_eq!(health_code("OK"), 1.0);
    assert_eq!(health_code("Good"), 1.0);
    assert_eq!(health_code("NORMAL"), 1.0);
    assert_eq!(health_code("Faulty"), 0.0);
    assert_eq!(health_code(""), 0.0);
}

#[test]
fn test_hex_percent_contract() {
    use netcli_core::coerce::{hex_percent, HexPercent};
    assert_eq!(hex_percent("0xFF").value(), 100.0);
    assert_eq!(hex_percent("0x00").value(), 0.0);
    assert!((hex_percent("0x80").value() - 50.0).abs() < 1.0);
    assert_eq!(hex_percent("zz"), HexPercent::Invalid);
    assert_eq!(hex_percent("0x1FF"), HexPercent::OutOfRange);
    assert_eq!(hex_percent("zz").value(), Reading::INVALID_SENTINEL);
    assert_eq!(hex_percent("0x1FF").value(), Reading::OUT_OF_RANGE_SENTINEL);
}

#[test]
fn test_unsupported_pair_yields_no_items() {
    let device = ScriptedDevice::new(&[(
        "show version | json",
        wrap("show version | json", r#"{"host_name":"sw1"}"#),
    )]);
    let dispatcher = Dispatcher::new("sw1", OsType::Ios, &device)
        .with_families(&[CommandFamily::VersionDetailed]);

    let mut sink: Vec<MetricItem> = Vec::new();
    let report = dispatcher.poll(&mut sink);

    assert!(sink.is_empty());
    assert!(matches!(
        report.outcome(CommandFamily::VersionDetailed),
        Some(FamilyOutcome::Failed(EngineError::UnsupportedPlatform {
            os: OsType::Ios,
            family: CommandFamily::VersionDetailed
        }))
    ));
    assert_eq!(report.errors().count(), 0);
}

#[test]
fn test_unwrapped_transcript_defaults_and_is_idempotent() {
    let raw = "this device printed something unexpected";

    let version = extract(OsType::Ios, CommandFamily::Version, raw).unwrap();
    assert!(version.is_empty());

    let cpu = extract(OsType::Ios, CommandFamily::Cpu, raw).unwrap();
    assert!(cpu.iter().all(|i| i.reading == Reading::Defaulted));

    let memory = extract(OsType::IosXe, CommandFamily::Memory, raw).unwrap();
    assert!(memory.is_empty());

    let empty_env = extract(OsType::NxOs, CommandFamily::Environment, "").unwrap();
    assert!(empty_env.is_empty());

    let bare_json = r#"{"TABLE_tempinfo":{"ROW_tempinfo":[{"sensor":"X","curtemp":"30","alarmstatus":"Ok"}]}}"#;
    let first = extract(OsType::NxOs, CommandFamily::Environment, bare_json).unwrap();
    let second = extract(OsType::NxOs, CommandFamily::Environment, bare_json).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn test_nxos_single_temperature_end_to_end() {
    let raw = "show environment | json\n{\"TABLE_tempinfo\":{\"ROW_tempinfo\":[{\"sensor\":\"CPU\",\"curtemp\":\"45\",\"alarmstatus\":\"Ok\"}]}}\nhostname#";

    let items = extract(OsType::NxOs, CommandFamily::Environment, raw).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, ItemKind::Temperature);
    assert_eq!(items[0].name, "CPU");
    assert_eq!(items[0].status, "Ok");
    assert_eq!(items[0].value(), 45.0);
    assert!(items.iter().all(|i| !matches!(
        i.kind,
        ItemKind::PowerIn
            | ItemKind::PowerOut
            | ItemKind::PowerStatus
            | ItemKind::PowerCapacity
            | ItemKind::PowerMode
            | ItemKind::FanStatus
            | ItemKind::FanSpeed
    )));
}

#[test]
fn test_malformed_json_isolated_to_family() {
    let device = ScriptedDevice::new(&[
        (
            "show version",
            wrap("show version", "  NXOS: version 9.3(5)"),
        ),
        (
            "show environment | json",
            wrap("show environment | json", r#"{"TABLE_tempinfo": {"ROW_tempinfo": [}"#),
        ),
        (
            "show process cpu",
            wrap(
                "show process cpu",
                "CPU utilization for five seconds: 4%/1%; one minute: 5%; five minutes: 6%",
            ),
        ),
    ]);
    let dispatcher = Dispatcher::new("leaf-1", OsType::NxOs, &device);

    let mut sink: Vec<MetricItem> = Vec::new();
    let report = dispatcher.poll(&mut sink);

    assert!(report.outcome(CommandFamily::Version).unwrap().is_collected());
    assert!(report.outcome(CommandFamily::Cpu).unwrap().is_collected());
    match report.outcome(CommandFamily::Environment) {
        Some(FamilyOutcome::Failed(EngineError::Decode(e))) => {
            assert_eq!(e.family, CommandFamily::Environment);
            assert!(e.offset.is_some());
        }
        other => panic!("expected decode failure, got {:?}", other),
    }

    assert_eq!(sink.len(), 1 + 4);
    assert_eq!(sink[0].kind, ItemKind::Version);
    assert_eq!(sink[0].name, "9.3(5)");
    assert_eq!(report.items_collected(), 5);
}

#[test]
fn test_transport_failure_isolated_for_every_family() {
    // Only the last family answers; the earlier ones all fail in transport.
    let device = ScriptedDevice::new(&[(
        "show environment | json",
        wrap("show environment | json", &environment_json(1, 1)),
    )]);
    let dispatcher = Dispatcher::new("sw2", OsType::IosXe, &device);

    let mut sink: Vec<MetricItem> = Vec::new();
    let report = dispatcher.poll(&mut sink);

    assert_eq!(report.outcomes.len(), CommandFamily::ALL.len());
    for family in [CommandFamily::Version, CommandFamily::Memory, CommandFamily::Cpu] {
        assert!(matches!(
            report.outcome(family),
            Some(FamilyOutcome::Failed(EngineError::Transport(_)))
        ));
    }
    assert!(report
        .outcome(CommandFamily::VersionDetailed)
        .map(|o| matches!(o, FamilyOutcome::Failed(e) if e.is_unsupported()))
        .unwrap_or(false));
    assert!(report.outcome(CommandFamily::Environment).unwrap().is_collected());
    assert_eq!(sink.len(), 4 + 1 + 2 + 1);
    assert_eq!(report.errors().count(), 3);
}

#[test]
fn test_full_ios_poll() {
    let device = ScriptedDevice::new(&[
        (
            "show version",
            "Cisco IOS Software, C3750E Software (C3750E-UNIVERSALK9-M), Version 15.2(4)E10, RELEASE SOFTWARE (fc2)\nROM: Bootstrap program is C3750E boot loader\n".to_string(),
        ),
        (
            "show process memory",
            wrap(
                "show process memory",
                "Processor Pool Total:  805306368 Used:  311357160 Free:  493949208\n      I/O Pool Total:   67108864 Used:   31468576 Free:   35640288",
            ),
        ),
        (
            "show process cpu",
            wrap(
                "show process cpu",
                "CPU utilization for five seconds: 12%/3%; one minute: 10%; five minutes: 9%\n PID Runtime(ms)     Invoked      uSecs   5Sec   1Min   5Min TTY Process",
            ),
        ),
        (
            "show environment | json",
            wrap("show environment | json", &environment_json(2, 2)),
        ),
    ]);
    let dispatcher = Dispatcher::new("access-1", OsType::Ios, &device);

    let mut sink: Vec<MetricItem> = Vec::new();
    let report = dispatcher.poll(&mut sink);

    assert_eq!(report.errors().count(), 0);
    let kinds: Vec<ItemKind> = sink.iter().map(|i| i.kind).collect();
    assert_eq!(kinds[0], ItemKind::Version);
    assert_eq!(sink[0].name, "15.2(4)E10");
    assert_eq!(&kinds[1..7], &[
        ItemKind::MemoryTotal,
        ItemKind::MemoryUsed,
        ItemKind::MemoryFree,
        ItemKind::MemoryTotal,
        ItemKind::MemoryUsed,
        ItemKind::MemoryFree,
    ]);
    assert_eq!(sink[1].value(), 805_306_368.0);
    assert_eq!(sink[4].name, "I/O");
    assert_eq!(kinds[7], ItemKind::CpuOneMinute);
    assert_eq!(sink[7].value(), 10.0);
    assert_eq!(sink[8].value(), 12.0);
    assert_eq!(sink[9].value(), 3.0);
    assert_eq!(sink[10].value(), 9.0);
    // environment: 2 supplies, 2 fans, 2 modes, 1 zone
    assert_eq!(sink.len(), 11 + 8 + 2 + 2 + 1);
    assert_eq!(sink.last().map(|i| i.value()), Some(100.0));
}
