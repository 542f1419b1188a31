//! Prometheus export of assembled metric items.
//!
//! Owns the mapping from [`ItemKind`] to exported metric name and labels.
//! Descriptors are registered once in [`CollectorMetrics::new`] and shared by
//! reference with every per-device sink.

use netcli_core::{ItemKind, MetricItem, MetricSink};
use prometheus::{
    register_gauge_vec_with_registry, Encoder, GaugeVec, Registry, TextEncoder,
};
use tracing::debug;

pub struct CollectorMetrics {
    // environment
    pub sensor_temp: GaugeVec,
    pub power_in: GaugeVec,
    pub power_out: GaugeVec,
    pub power_up: GaugeVec,
    pub power_capacity: GaugeVec,
    pub power_mode: GaugeVec,
    pub fan_up: GaugeVec,
    pub fan_speed_percent: GaugeVec,

    // facts
    pub version: GaugeVec,
    pub bios_version: GaugeVec,
    pub chassis_id: GaugeVec,
    pub hostname: GaugeVec,
    pub uptime_seconds: GaugeVec,
    pub last_reset_usecs: GaugeVec,
    pub memory_total: GaugeVec,
    pub memory_used: GaugeVec,
    pub memory_free: GaugeVec,
    pub cpu_one_minute_percent: GaugeVec,
    pub cpu_five_seconds_percent: GaugeVec,
    pub cpu_interrupt_percent: GaugeVec,
    pub cpu_five_minutes_percent: GaugeVec,

    registry: Registry,
}

impl CollectorMetrics {
    pub fn new(prefix_environment: &str, prefix_facts: &str) -> prometheus::Result<Self> {
        let registry = Registry::new();
        let env = |name: &str| format!("{}{}", prefix_environment, name);
        let facts = |name: &str| format!("{}{}", prefix_facts, name);

        let sensor_temp = register_gauge_vec_with_registry!(
            env("sensor_temp"),
            "Sensor temperature in degrees celsius",
            &["target", "item"],
            registry
        )?;
        let power_in = register_gauge_vec_with_registry!(
            env("power_in"),
            "Power supply input in watts",
            &["target", "item", "detail"],
            registry
        )?;
        let power_out = register_gauge_vec_with_registry!(
            env("power_out"),
            "Power supply output in watts",
            &["target", "item", "detail"],
            registry
        )?;
        let power_up = register_gauge_vec_with_registry!(
            env("power_up"),
            "Power supply status (1 = ok)",
            &["target", "item", "detail"],
            registry
        )?;
        let power_capacity = register_gauge_vec_with_registry!(
            env("power_capacity"),
            "Power supply capacity in watts",
            &["target", "item", "detail"],
            registry
        )?;
        let power_mode = register_gauge_vec_with_registry!(
            env("power_mode"),
            "Power redundancy mode",
            &["target", "item", "status"],
            registry
        )?;
        let fan_up = register_gauge_vec_with_registry!(
            env("fan_up"),
            "Fan status (1 = ok)",
            &["target", "item", "detail"],
            registry
        )?;
        let fan_speed_percent = register_gauge_vec_with_registry!(
            env("fan_speed_percent"),
            "Fan zone speed in percent (-1 unparsable, -2 out of range)",
            &["target", "item"],
            registry
        )?;

        let version = register_gauge_vec_with_registry!(
            facts("version"),
            "Running OS version",
            &["target", "version"],
            registry
        )?;
        let bios_version = register_gauge_vec_with_registry!(
            facts("bios_version"),
            "BIOS version",
            &["target", "version"],
            registry
        )?;
        let chassis_id = register_gauge_vec_with_registry!(
            facts("chassis_id"),
            "Chassis description",
            &["target", "chassis_id"],
            registry
        )?;
        let hostname = register_gauge_vec_with_registry!(
            facts("hostname"),
            "Configured hostname",
            &["target", "hostname"],
            registry
        )?;
        let uptime_seconds = register_gauge_vec_with_registry!(
            facts("uptime_seconds"),
            "Kernel uptime in seconds",
            &["target"],
            registry
        )?;
        let last_reset_usecs = register_gauge_vec_with_registry!(
            facts("last_reset_usecs"),
            "Time of the last reset in microseconds",
            &["target", "reason", "service", "version"],
            registry
        )?;
        let memory_total = register_gauge_vec_with_registry!(
            facts("memory_total"),
            "Total memory of the pool in bytes",
            &["target", "type"],
            registry
        )?;
        let memory_used = register_gauge_vec_with_registry!(
            facts("memory_used"),
            "Used memory of the pool in bytes",
            &["target", "type"],
            registry
        )?;
        let memory_free = register_gauge_vec_with_registry!(
            facts("memory_free"),
            "Free memory of the pool in bytes",
            &["target", "type"],
            registry
        )?;
        let cpu_one_minute_percent = register_gauge_vec_with_registry!(
            facts("cpu_one_minute_percent"),
            "CPU utilization over one minute",
            &["target"],
            registry
        )?;
        let cpu_five_seconds_percent = register_gauge_vec_with_registry!(
            facts("cpu_five_seconds_percent"),
            "CPU utilization over five seconds",
            &["target"],
            registry
        )?;
        let cpu_interrupt_percent = register_gauge_vec_with_registry!(
            facts("cpu_interrupt_percent"),
            "CPU utilization at interrupt level over five seconds",
            &["target"],
            registry
        )?;
        let cpu_five_minutes_percent = register_gauge_vec_with_registry!(
            facts("cpu_five_minutes_percent"),
            "CPU utilization over five minutes",
            &["target"],
            registry
        )?;

        Ok(Self {
            sensor_temp,
            power_in,
            power_out,
            power_up,
            power_capacity,
            power_mode,
            fan_up,
            fan_speed_percent,
            version,
            bios_version,
            chassis_id,
            hostname,
            uptime_seconds,
            last_reset_usecs,
            memory_total,
            memory_used,
            memory_free,
            cpu_one_minute_percent,
            cpu_five_seconds_percent,
            cpu_interrupt_percent,
            cpu_five_minutes_percent,
            registry,
        })
    }

    /// Record one item for `target`.
    pub fn record(&self, target: &str, item: &MetricItem) {
        let value = item.value();
        let name = item.name.as_str();
        let detail = item.detail.as_str();
        let status = item.status.as_str();

        let gauge = match item.kind {
            ItemKind::Temperature => self.sensor_temp.with_label_values(&[target, name]),
            ItemKind::PowerIn => self.power_in.with_label_values(&[target, name, detail]),
            ItemKind::PowerOut => self.power_out.with_label_values(&[target, name, detail]),
            ItemKind::PowerStatus => self.power_up.with_label_values(&[target, name, detail]),
            ItemKind::PowerCapacity => {
                self.power_capacity.with_label_values(&[target, name, detail])
            }
            ItemKind::PowerMode => self.power_mode.with_label_values(&[target, name, status]),
            ItemKind::FanStatus => self.fan_up.with_label_values(&[target, name, detail]),
            ItemKind::FanSpeed => self.fan_speed_percent.with_label_values(&[target, name]),
            ItemKind::Version => self.version.with_label_values(&[target, name]),
            ItemKind::BiosVersion => self.bios_version.with_label_values(&[target, name]),
            ItemKind::ChassisId => self.chassis_id.with_label_values(&[target, name]),
            ItemKind::Hostname => self.hostname.with_label_values(&[target, name]),
            ItemKind::Uptime => self.uptime_seconds.with_label_values(&[target]),
            ItemKind::LastReset => self
                .last_reset_usecs
                .with_label_values(&[target, name, detail, status]),
            ItemKind::MemoryTotal => self.memory_total.with_label_values(&[target, name]),
            ItemKind::MemoryUsed => self.memory_used.with_label_values(&[target, name]),
            ItemKind::MemoryFree => self.memory_free.with_label_values(&[target, name]),
            ItemKind::CpuOneMinute => self.cpu_one_minute_percent.with_label_values(&[target]),
            ItemKind::CpuFiveSeconds => {
                self.cpu_five_seconds_percent.with_label_values(&[target])
            }
            ItemKind::CpuInterrupts => self.cpu_interrupt_percent.with_label_values(&[target]),
            ItemKind::CpuFiveMinutes => {
                self.cpu_five_minutes_percent.with_label_values(&[target])
            }
        };
        gauge.set(value);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Sink for one device; every published item gets this device's `target` label.
pub struct PrometheusSink<'a> {
    target: &'a str,
    metrics: &'a CollectorMetrics,
}

impl<'a> PrometheusSink<'a> {
    pub fn new(target: &'a str, metrics: &'a CollectorMetrics) -> Self {
        Self { target, metrics }
    }
}

impl MetricSink for PrometheusSink<'_> {
    fn publish(&mut self, items: Vec<MetricItem>) {
        debug!(target = self.target, count = items.len(), "exporting items");
        for item in &items {
            self.metrics.record(self.target, item);
        }
    }
}
