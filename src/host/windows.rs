use super::source::{run_command, KeySource, DEFAULT_COMMAND_TIMEOUT};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Reads the SMBIOS product UUID through WMI using `wmic`.
pub struct WmicSource {
    program: String,
    timeout: Duration,
}

impl WmicSource {
    pub fn new() -> Self {
        Self::with_program("wmic", DEFAULT_COMMAND_TIMEOUT)
    }

    /// Run `program` in place of `wmic`, with the same arguments.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        WmicSource {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for WmicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for WmicSource {
    fn name(&self) -> &'static str {
        "wmic"
    }

    fn probe(&self) -> Option<String> {
        let output = run_command(&self.program, &["csproduct", "get", "uuid"], self.timeout)?;
        parse_wmic_output(&output)
    }
}

/// Extract the UUID from `wmic csproduct get uuid` output, keeping only its
/// hex digits.
pub fn parse_wmic_output(output: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\bUUID\b[\s\r\n]+([^\s\r\n]+)").expect("wmic pattern is valid")
    });
    let token = pattern.captures(output)?.get(1)?.as_str();
    let hex: String = token.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    if hex.is_empty() {
        None
    } else {
        Some(hex)
    }
}
