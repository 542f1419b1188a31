//! Per-device poll: registry gate, command, normalize, decode, assemble, sink.
//!
//! Each command family is collected in isolation. An unsupported dialect,
//! transport failure or decode failure in one family is logged and recorded
//! in the [`PollReport`]; the remaining families still run.

use crate::assemble::assemble;
use crate::dialect::{self, CommandFamily, OsType};
use crate::error::{EngineError, TransportError};
use crate::item::MetricItem;
use crate::transcript::normalize;
use tracing::{debug, warn};

/// Runs a CLI command on the device and returns the raw transcript.
///
/// Deadlines and session handling belong to the implementation.
pub trait CommandExecutor {
    fn run(&self, command: &str) -> Result<String, TransportError>;
}

/// Receives the items of one family once they are fully assembled.
pub trait MetricSink {
    fn publish(&mut self, items: Vec<MetricItem>);
}

impl MetricSink for Vec<MetricItem> {
    fn publish(&mut self, items: Vec<MetricItem>) {
        self.extend(items);
    }
}

/// Decode and assemble one transcript. Pure: same input, same items.
pub fn extract(
    os: OsType,
    family: CommandFamily,
    transcript: &str,
) -> Result<Vec<MetricItem>, EngineError> {
    let payload = normalize(transcript, family.command());
    let decoded = dialect::decode(os, family, payload)?;
    Ok(assemble(&decoded))
}

/// Result of one family within a poll.
#[derive(Debug)]
pub enum FamilyOutcome {
    /// Number of items handed to the sink
    Collected(usize),
    Failed(EngineError),
}

impl FamilyOutcome {
    pub fn is_collected(&self) -> bool {
        matches!(self, Self::Collected(_))
    }
}

#[derive(Debug, Default)]
pub struct PollReport {
    pub outcomes: Vec<(CommandFamily, FamilyOutcome)>,
}

impl PollReport {
    pub fn outcome(&self, family: CommandFamily) -> Option<&FamilyOutcome> {
        self.outcomes
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, outcome)| outcome)
    }

    pub fn items_collected(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                FamilyOutcome::Collected(n) => *n,
                FamilyOutcome::Failed(_) => 0,
            })
            .sum()
    }

    /// Failures other than unsupported dialect pairs.
    pub fn errors(&self) -> impl Iterator<Item = (CommandFamily, &EngineError)> + '_ {
        self.outcomes.iter().filter_map(|(family, outcome)| match outcome {
            FamilyOutcome::Failed(e) if !e.is_unsupported() => Some((*family, e)),
            _ => None,
        })
    }
}

/// Polls one device. Borrowed per poll; holds no state across polls.
pub struct Dispatcher<'a, E: CommandExecutor + ?Sized> {
    target: &'a str,
    os: OsType,
    executor: &'a E,
    families: Vec<CommandFamily>,
}

impl<'a, E: CommandExecutor + ?Sized> Dispatcher<'a, E> {
    pub fn new(target: &'a str, os: OsType, executor: &'a E) -> Self {
        Self {
            target,
            os,
            executor,
            families: CommandFamily::ALL.to_vec(),
        }
    }

    /// Restrict the poll to `families`, keeping the standard poll order.
    pub fn with_families(mut self, families: &[CommandFamily]) -> Self {
        self.families = CommandFamily::ALL
            .into_iter()
            .filter(|f| families.contains(f))
            .collect();
        self
    }

    /// Run one family end to end and return its items.
    pub fn collect(&self, family: CommandFamily) -> Result<Vec<MetricItem>, EngineError> {
        if !dialect::supports(self.os, family) {
            return Err(EngineError::UnsupportedPlatform {
                os: self.os,
                family,
            });
        }

        let transcript = self.executor.run(family.command())?;
        extract(self.os, family, &transcript)
    }

    /// Collect every configured family, feeding `sink` as each one completes.
    pub fn poll<S: MetricSink + ?Sized>(&self, sink: &mut S) -> PollReport {
        let mut report = PollReport::default();

        for &family in &self.families {
            let outcome = match self.collect(family) {
                Ok(items) => {
                    debug!(
                        target = self.target,
                        %family,
                        count = items.len(),
                        "assembled items"
                    );
                    let count = items.len();
                    sink.publish(items);
                    FamilyOutcome::Collected(count)
                }
                Err(e) if e.is_unsupported() => {
                    debug!(target = self.target, %family, "skipped: {}", e);
                    FamilyOutcome::Failed(e)
                }
                Err(e) => {
                    warn!(target = self.target, %family, "collection failed: {}", e);
                    FamilyOutcome::Failed(e)
                }
            };
            report.outcomes.push((family, outcome));
        }

        report
    }
}
