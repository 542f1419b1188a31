//! Error types for the extraction engine.

use crate::dialect::{CommandFamily, OsType};
use thiserror::Error;

/// Failure of one sub-collection. The dispatcher isolates these per family.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("'{}' is not implemented for {os}", .family.command())]
    UnsupportedPlatform { os: OsType, family: CommandFamily },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl EngineError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedPlatform { .. })
    }
}

/// Reported by a [`CommandExecutor`](crate::CommandExecutor) when a command
/// could not be run on the device.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with status {code:?}: {stderr}")]
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{command}' timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("no transcript recorded for '{command}'")]
    Missing { command: String },
}

/// Payload of a JSON-bearing command could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decoding '{}' output{}: {message}", .family.command(), offset_suffix(.offset))]
pub struct DecodeError {
    pub family: CommandFamily,
    /// Byte offset into the normalized payload, when the parser reports one
    pub offset: Option<usize>,
    pub message: String,
}

impl DecodeError {
    pub fn new(family: CommandFamily, message: impl Into<String>) -> Self {
        Self {
            family,
            offset: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

fn offset_suffix(offset: &Option<usize>) -> String {
    match offset {
        Some(o) => format!(" at byte offset {}", o),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_command() {
        let err = EngineError::UnsupportedPlatform {
            os: OsType::Ios,
            family: CommandFamily::VersionDetailed,
        };
        assert_eq!(
            err.to_string(),
            "'show version | json' is not implemented for ios"
        );
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_decode_error_with_offset() {
        let err = DecodeError::new(CommandFamily::Environment, "expected value").at(17);
        assert_eq!(
            err.to_string(),
            "decoding 'show environment | json' output at byte offset 17: expected value"
        );
    }

    #[test]
    fn test_decode_error_without_offset() {
        let err = DecodeError::new(CommandFamily::Environment, "bad");
        assert_eq!(err.offset, None);
        assert!(!err.to_string().contains("offset"));
    }
}
