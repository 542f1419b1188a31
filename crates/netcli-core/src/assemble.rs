//! Turn decoded payloads into ordered metric items.
//!
//! Rows are walked in device order. Every scalar is coerced on its own, so
//! a bad field in a row never suppresses the other items of that row.

use crate::coerce::{health_code, hex_percent, unit_number, unit_reading};
use crate::decode::{
    CpuPayload, DecodedPayload, EnvironmentPayload, MemoryPayload, VersionDetailedPayload,
    VersionPayload,
};
use crate::item::{ItemKind, MetricItem, Reading};

/// Dispatch to the assembler for the payload's family.
pub fn assemble(payload: &DecodedPayload) -> Vec<MetricItem> {
    match payload {
        DecodedPayload::Version(p) => version(p),
        DecodedPayload::VersionDetailed(p) => version_detailed(p),
        DecodedPayload::Memory(p) => memory(p),
        DecodedPayload::Cpu(p) => cpu(p),
        DecodedPayload::Environment(p) => environment(p),
    }
}

/// Temperatures, then four items per power supply, one per fan, then the
/// power mode pair and fan zone speeds.
pub fn environment(env: &EnvironmentPayload) -> Vec<MetricItem> {
    let mut items = Vec::with_capacity(
        env.temperatures.len() + env.power_supplies.len() * 4 + env.fans.len() + 2 + env.fan_zones.len(),
    );

    for row in &env.temperatures {
        items.push(
            MetricItem::new(ItemKind::Temperature, &row.sensor, unit_reading(&row.current))
                .with_status(&row.alarm_status),
        );
    }

    for row in &env.power_supplies {
        let supply = |kind: ItemKind, reading: Reading| {
            MetricItem::new(kind, &row.id, reading)
                .with_detail(&row.model)
                .with_status(&row.status)
        };
        items.push(supply(ItemKind::PowerIn, unit_reading(&row.actual_input)));
        items.push(supply(ItemKind::PowerOut, unit_reading(&row.actual_output)));
        items.push(supply(ItemKind::PowerCapacity, unit_reading(&row.capacity)));
        items.push(supply(
            ItemKind::PowerStatus,
            Reading::Measured(health_code(&row.status)),
        ));
    }

    for row in &env.fans {
        items.push(
            MetricItem::new(
                ItemKind::FanStatus,
                &row.name,
                Reading::Measured(health_code(&row.status)),
            )
            .with_detail(&row.model)
            .with_status(&row.status),
        );
    }

    // Present whenever the supply section is; mode lives in the status label
    // and the value is fixed at 0.
    if let Some(mode) = &env.power_mode {
        items.push(
            MetricItem::new(ItemKind::PowerMode, "configured", Reading::Measured(0.0))
                .with_status(&mode.configured),
        );
        items.push(
            MetricItem::new(ItemKind::PowerMode, "operational", Reading::Measured(0.0))
                .with_status(&mode.operational),
        );
    }

    for zone in &env.fan_zones {
        items.push(MetricItem::new(
            ItemKind::FanSpeed,
            &zone.zone,
            hex_percent(&zone.speed).into(),
        ));
    }

    items
}

/// A single version item with value 1, or nothing when no banner matched.
pub fn version(payload: &VersionPayload) -> Vec<MetricItem> {
    payload
        .version
        .iter()
        .map(|v| MetricItem::new(ItemKind::Version, v, Reading::Measured(1.0)))
        .collect()
}

/// Chassis, hostname, uptime, last reset and BIOS facts, in that order.
pub fn version_detailed(payload: &VersionDetailedPayload) -> Vec<MetricItem> {
    let up = &payload.uptime;
    let uptime = [
        (up.days.as_str(), 86_400.0),
        (up.hours.as_str(), 3_600.0),
        (up.minutes.as_str(), 60.0),
        (up.seconds.as_str(), 1.0),
    ]
    .iter()
    .map(|(raw, scale)| unit_number(raw).map(|v| v * scale))
    .sum::<Option<f64>>();

    let reset = &payload.last_reset;

    vec![
        MetricItem::new(ItemKind::ChassisId, &payload.chassis_id, Reading::Measured(0.0)),
        MetricItem::new(ItemKind::Hostname, &payload.host_name, Reading::Measured(0.0)),
        MetricItem::new(ItemKind::Uptime, "", Reading::from(uptime)),
        MetricItem::new(ItemKind::LastReset, &reset.reason, unit_reading(&reset.usecs))
            .with_detail(&reset.service)
            .with_status(&reset.system_version),
        MetricItem::new(ItemKind::BiosVersion, &payload.bios_version, Reading::Measured(0.0)),
    ]
}

/// Total, used and free per memory pool.
pub fn memory(payload: &MemoryPayload) -> Vec<MetricItem> {
    payload
        .pools
        .iter()
        .flat_map(|pool| {
            [
                MetricItem::new(ItemKind::MemoryTotal, &pool.pool, unit_reading(&pool.total)),
                MetricItem::new(ItemKind::MemoryUsed, &pool.pool, unit_reading(&pool.used)),
                MetricItem::new(ItemKind::MemoryFree, &pool.pool, unit_reading(&pool.free)),
            ]
        })
        .collect()
}

/// One-minute, five-second, interrupt and five-minute utilization.
pub fn cpu(payload: &CpuPayload) -> Vec<MetricItem> {
    let reading = |field: &Option<String>| field.as_deref().map_or(Reading::Defaulted, unit_reading);

    vec![
        MetricItem::new(ItemKind::CpuOneMinute, "", reading(&payload.one_minute)),
        MetricItem::new(ItemKind::CpuFiveSeconds, "", reading(&payload.five_seconds)),
        MetricItem::new(ItemKind::CpuInterrupts, "", reading(&payload.interrupts)),
        MetricItem::new(ItemKind::CpuFiveMinutes, "", reading(&payload.five_minutes)),
    ]
}
