//! Key material used by the anonymizer

use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest key BLAKE2b accepts, in bytes.
pub const MAX_KEY_LEN: usize = 64;

/// Where the current key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// A platform identifier found by the named key source
    Platform(&'static str),
    /// Integer form of a network interface MAC address
    NodeId,
    /// No MAC address was available, so a random node id was used
    Random,
    /// Set explicitly through `set_unique_key`
    Override,
}

impl fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrigin::Platform(source) => write!(f, "platform ({})", source),
            KeyOrigin::NodeId => write!(f, "node id"),
            KeyOrigin::Random => write!(f, "random node id"),
            KeyOrigin::Override => write!(f, "override"),
        }
    }
}

/// Validated key bytes together with their origin.
#[derive(Clone, PartialEq, Eq)]
pub struct HostKey {
    bytes: Vec<u8>,
    origin: KeyOrigin,
}

impl HostKey {
    pub fn new(bytes: impl Into<Vec<u8>>, origin: KeyOrigin) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidKey("key is empty".to_string()));
        }
        if bytes.len() > MAX_KEY_LEN {
            return Err(Error::InvalidKey(format!(
                "key is {} bytes, maximum is {}",
                bytes.len(),
                MAX_KEY_LEN
            )));
        }
        Ok(HostKey { bytes, origin })
    }

    /// Key from a 48-bit node id in decimal. At most 15 ASCII digits, so it
    /// always fits.
    pub(crate) fn from_node_id(id: u64, origin: KeyOrigin) -> Self {
        HostKey {
            bytes: id.to_string().into_bytes(),
            origin,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }
}

// Keep key bytes out of logs.
impl fmt::Debug for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostKey")
            .field("len", &self.bytes.len())
            .field("origin", &self.origin)
            .finish()
    }
}

/// Conversion of caller-supplied values into key bytes.
///
/// Byte sequences are used as-is. Everything else goes through its text
/// form. Returns `None` when the value has no text form, e.g. an `OsStr`
/// that is not valid Unicode.
pub trait ToKeyBytes {
    fn to_key_bytes(&self) -> Option<Vec<u8>>;
}

impl ToKeyBytes for [u8] {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        Some(self.to_vec())
    }
}

impl<const N: usize> ToKeyBytes for [u8; N] {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        Some(self.to_vec())
    }
}

impl ToKeyBytes for Vec<u8> {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        Some(self.clone())
    }
}

impl ToKeyBytes for str {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        Some(self.as_bytes().to_vec())
    }
}

impl ToKeyBytes for String {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        self.as_str().to_key_bytes()
    }
}

impl ToKeyBytes for OsStr {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        self.to_str().map(|s| s.as_bytes().to_vec())
    }
}

impl ToKeyBytes for OsString {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        self.as_os_str().to_key_bytes()
    }
}

impl ToKeyBytes for Path {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        self.as_os_str().to_key_bytes()
    }
}

impl ToKeyBytes for PathBuf {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        self.as_os_str().to_key_bytes()
    }
}

macro_rules! display_key_bytes {
    ($($t:ty),*) => {
        $(
            impl ToKeyBytes for $t {
                fn to_key_bytes(&self) -> Option<Vec<u8>> {
                    Some(self.to_string().into_bytes())
                }
            }
        )*
    };
}

display_key_bytes!(char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: ToKeyBytes + ?Sized> ToKeyBytes for &T {
    fn to_key_bytes(&self) -> Option<Vec<u8>> {
        (**self).to_key_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert!(HostKey::new(Vec::new(), KeyOrigin::Override).is_err());
        assert!(HostKey::new(vec![0u8; MAX_KEY_LEN + 1], KeyOrigin::Override).is_err());
        assert!(HostKey::new(vec![0u8; MAX_KEY_LEN], KeyOrigin::Override).is_ok());
    }

    #[test]
    fn test_node_id_key_is_decimal() {
        let key = HostKey::from_node_id(0xFFFF_FFFF_FFFF, KeyOrigin::NodeId);
        assert_eq!(key.as_bytes(), b"281474976710655");
        assert!(key.as_bytes().len() <= MAX_KEY_LEN);
        assert_eq!(key.origin(), KeyOrigin::NodeId);
    }

    #[test]
    fn test_integers_use_decimal_text() {
        assert_eq!(42u64.to_key_bytes(), Some(b"42".to_vec()));
        assert_eq!((-7i32).to_key_bytes(), Some(b"-7".to_vec()));
    }

    #[test]
    fn test_debug_hides_bytes() {
        let key = HostKey::new("secret", KeyOrigin::Override).unwrap();
        let shown = format!("{:?}", key);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("len: 6"));
    }
}
