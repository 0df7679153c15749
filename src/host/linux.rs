use super::source::KeySource;
use std::fs;
use std::path::PathBuf;

/// D-Bus machine id, preferred when present.
pub const DBUS_MACHINE_ID: &str = "/var/lib/dbus/machine-id";
/// systemd machine id. Stable across reboots on physical machines, but may
/// be regenerated on cloud-provisioned ones.
pub const ETC_MACHINE_ID: &str = "/etc/machine-id";

/// Reads the first non-empty machine-id file from a list of candidates.
pub struct MachineIdSource {
    paths: Vec<PathBuf>,
}

impl MachineIdSource {
    pub fn new() -> Self {
        Self::with_paths(vec![PathBuf::from(DBUS_MACHINE_ID), PathBuf::from(ETC_MACHINE_ID)])
    }

    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        MachineIdSource { paths }
    }
}

impl Default for MachineIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for MachineIdSource {
    fn name(&self) -> &'static str {
        "machine-id"
    }

    fn probe(&self) -> Option<String> {
        for path in &self.paths {
            match fs::read_to_string(path) {
                Ok(contents) => {
                    let id = contents.trim();
                    if !id.is_empty() {
                        tracing::debug!("using machine id from {}", path.display());
                        return Some(id.to_string());
                    }
                    tracing::debug!("{} is empty", path.display());
                }
                Err(e) => tracing::debug!("cannot read {}: {}", path.display(), e),
            }
        }
        None
    }
}
