use super::source::{run_command, KeySource, DEFAULT_COMMAND_TIMEOUT};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Reads `IOPlatformUUID` from the I/O Kit registry via `ioreg`.
pub struct IoregSource {
    program: String,
    timeout: Duration,
}

impl IoregSource {
    pub fn new() -> Self {
        Self::with_program("ioreg", DEFAULT_COMMAND_TIMEOUT)
    }

    /// Run `program` in place of `ioreg`, with the same arguments.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        IoregSource {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for IoregSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for IoregSource {
    fn name(&self) -> &'static str {
        "ioreg"
    }

    fn probe(&self) -> Option<String> {
        let output = run_command(&self.program, &["-rd1", "-c", "IOPlatformExpertDevice"], self.timeout)?;
        parse_ioreg_output(&output)
    }
}

/// Extract the platform UUID from `ioreg -rd1 -c IOPlatformExpertDevice` output.
pub fn parse_ioreg_output(output: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r#""IOPlatformUUID"\s+=\s+"([^"]+)"#).expect("ioreg pattern is valid")
    });
    pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"+-o MacBookPro18,3  <class IOPlatformExpertDevice, id 0x100000218, registered, matched, active, busy 0 (109 ms), retain 36>
  {
    "IOPlatformSerialNumber" = "C02XXXXXXXXX"
    "IOPlatformUUID" = "8F1C2A5E-3B7D-4E21-9A0C-5D6E7F8A9B0C"
    "manufacturer" = <"Apple Inc.">
  }
"#;

    #[test]
    fn test_extracts_platform_uuid() {
        assert_eq!(
            parse_ioreg_output(SAMPLE).as_deref(),
            Some("8F1C2A5E-3B7D-4E21-9A0C-5D6E7F8A9B0C")
        );
    }

    #[test]
    fn test_missing_key_is_none() {
        assert_eq!(parse_ioreg_output("\"IOPlatformSerialNumber\" = \"C02\""), None);
    }
}
