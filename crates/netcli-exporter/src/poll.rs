//! One poll over every configured device.
//!
//! Devices run in parallel on the blocking pool; within a device the
//! dispatcher walks its families in order.

use crate::config::{Config, DeviceConfig};
use crate::executor::{FixtureExecutor, ShellExecutor};
use crate::metrics::{CollectorMetrics, PrometheusSink};
use anyhow::Result;
use netcli_core::{CommandExecutor, Dispatcher, PollReport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Where transcripts come from.
#[derive(Debug, Clone)]
pub enum Transport {
    /// Live devices through the configured command template
    Shell,
    /// Recorded transcripts under `<dir>/<target>/`
    Replay(PathBuf),
}

#[derive(Debug)]
pub struct DeviceSummary {
    pub target: String,
    pub report: PollReport,
}

impl DeviceSummary {
    pub fn failed_families(&self) -> usize {
        self.report.errors().count()
    }
}

/// Poll every device once into `metrics`, returning one summary per device
/// in configuration order.
pub async fn poll_all(
    config: &Config,
    metrics: Arc<CollectorMetrics>,
    transport: Transport,
) -> Result<Vec<DeviceSummary>> {
    let timeout = Duration::from_secs(config.exporter.timeout_secs);
    let mut handles = Vec::with_capacity(config.devices.len());

    for device in &config.devices {
        let device = device.clone();
        let metrics = Arc::clone(&metrics);
        let template = config.exporter.command_template.clone();
        let transport = transport.clone();
        let runtime = tokio::runtime::Handle::current();

        handles.push(tokio::task::spawn_blocking(move || {
            let executor: Box<dyn CommandExecutor> = match transport {
                Transport::Shell => Box::new(ShellExecutor::new(
                    runtime,
                    device.host(),
                    &template,
                    timeout,
                )),
                Transport::Replay(dir) => Box::new(FixtureExecutor::new(dir.join(&device.target))),
            };
            poll_device(&device, executor.as_ref(), &metrics)
        }));
    }

    let mut summaries = Vec::with_capacity(handles.len());
    for handle in handles {
        let summary = handle.await?;
        let failed = summary.failed_families();
        if failed > 0 {
            warn!(
                "Device {}: {} items, {} families failed",
                summary.target,
                summary.report.items_collected(),
                failed
            );
        } else {
            info!(
                "Device {}: {} items",
                summary.target,
                summary.report.items_collected()
            );
        }
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Run the dispatcher for one device, exporting into `metrics`.
pub fn poll_device(
    device: &DeviceConfig,
    executor: &dyn CommandExecutor,
    metrics: &CollectorMetrics,
) -> DeviceSummary {
    let families = device.families();
    let dispatcher =
        Dispatcher::new(&device.target, device.os, executor).with_families(&families);
    let mut sink = PrometheusSink::new(&device.target, metrics);
    let report = dispatcher.poll(&mut sink);

    DeviceSummary {
        target: device.target.clone(),
        report,
    }
}
