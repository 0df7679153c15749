//! Host key resolution
//!
//! Finds a byte string that identifies the current machine without needing
//! elevated privileges. Platform sources are tried in order and the first
//! usable answer wins. When none gives one, the node id (MAC address, or a
//! random number) is used, so resolution always produces a key.

pub mod linux;
pub mod macos;
pub mod node;
pub mod source;
pub mod windows;

pub use linux::MachineIdSource;
pub use macos::IoregSource;
pub use source::KeySource;
pub use windows::WmicSource;

use crate::key::{HostKey, KeyOrigin};

/// Operating system family, as far as key resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "linux" | "android" => Platform::Linux,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }
}

/// Ordered list of key sources with a node-id fallback.
pub struct HostKeyResolver {
    sources: Vec<Box<dyn KeySource>>,
}

impl HostKeyResolver {
    pub fn with_sources(sources: Vec<Box<dyn KeySource>>) -> Self {
        HostKeyResolver { sources }
    }

    pub fn for_platform(platform: Platform) -> Self {
        let sources: Vec<Box<dyn KeySource>> = match platform {
            Platform::MacOs => vec![Box::new(IoregSource::new())],
            Platform::Linux => vec![Box::new(MachineIdSource::new())],
            Platform::Windows => vec![Box::new(WmicSource::new())],
            Platform::Other => Vec::new(),
        };
        Self::with_sources(sources)
    }

    pub fn for_current_platform() -> Self {
        Self::for_platform(Platform::detect())
    }

    pub fn resolve(&self) -> HostKey {
        for source in &self.sources {
            let Some(candidate) = source.probe() else {
                tracing::debug!("key source {} found nothing", source.name());
                continue;
            };
            match HostKey::new(candidate, KeyOrigin::Platform(source.name())) {
                Ok(key) => {
                    tracing::info!("host key resolved from {}", source.name());
                    return key;
                }
                Err(e) => tracing::debug!("key source {} gave unusable key: {}", source.name(), e),
            }
        }

        let (id, origin) = node::node_id();
        tracing::info!("host key falling back to {}", origin);
        HostKey::from_node_id(id, origin)
    }
}

impl Default for HostKeyResolver {
    fn default() -> Self {
        Self::for_current_platform()
    }
}

/// Resolve the current host's key bytes.
pub fn resolve_host_key() -> Vec<u8> {
    HostKeyResolver::for_current_platform()
        .resolve()
        .as_bytes()
        .to_vec()
}
