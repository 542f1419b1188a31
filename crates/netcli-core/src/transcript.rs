//! Isolate the command payload from a raw session transcript.
//!
//! Interactive sessions echo the issued command on the first line and end
//! with the device prompt:
//!
//! ```text
//! leaf-1# show environment | json
//! {"TABLE_tempinfo": ...}
//! leaf-1#
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// `<hostname>#` or `<hostname>>`, optionally followed by whatever was typed.
static PROMPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-/:()]*[#>](\s.*)?$").expect("valid prompt regex")
});

/// Return the payload between the echoed `command` and the trailing prompt.
///
/// The interior is returned verbatim and may span several lines. When the
/// transcript is not wrapped this way it is returned unchanged.
pub fn normalize<'a>(transcript: &'a str, command: &str) -> &'a str {
    let body = transcript.trim_matches(|c| c == '\r' || c == '\n');

    let (Some(first_break), Some(last_break)) = (body.find('\n'), body.rfind('\n')) else {
        return transcript;
    };

    let echo = body[..first_break].trim();
    let prompt = body[last_break + 1..].trim();

    if command.is_empty() || !echo.ends_with(command.trim()) || !is_prompt(prompt) {
        return transcript;
    }

    if first_break == last_break {
        return "";
    }

    body[first_break + 1..last_break].trim_end_matches('\r')
}

/// Whether `line` looks like a device prompt.
pub fn is_prompt(line: &str) -> bool {
    PROMPT_RE.is_match(line.trim())
}
