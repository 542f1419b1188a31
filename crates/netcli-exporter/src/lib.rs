//! Runs the netcli-core engine against real devices and exports the result
//! in the Prometheus text format.

pub mod config;
pub mod executor;
pub mod metrics;
pub mod poll;

pub use config::{Config, ConfigError, DeviceConfig, ExporterConfig};
pub use executor::{FixtureExecutor, ShellExecutor};
pub use metrics::{CollectorMetrics, PrometheusSink};
pub use poll::{poll_all, poll_device, DeviceSummary, Transport};
