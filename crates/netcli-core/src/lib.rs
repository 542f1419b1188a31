//! Output normalization and metric extraction for network device CLIs.
//!
//! A poll runs one CLI command per command family, strips the echoed command
//! and trailing prompt from the transcript, decodes the payload according to
//! the device's OS dialect and assembles a flat, ordered list of typed
//! [`MetricItem`]s.
//!
//! Nothing here keeps state between polls: [`extract`] is a pure function of
//! one transcript, and the [`Dispatcher`] only borrows its executor.

pub mod assemble;
pub mod coerce;
pub mod decode;
pub mod dialect;
pub mod dispatch;
pub mod error;
pub mod item;
pub mod transcript;

pub use decode::DecodedPayload;
pub use dialect::{dialect_for, supports, CommandFamily, Dialect, OsType};
pub use dispatch::{extract, CommandExecutor, Dispatcher, FamilyOutcome, MetricSink, PollReport};
pub use error::{DecodeError, EngineError, TransportError};
pub use item::{ItemKind, MetricItem, Reading};
