//! Keyed-hash anonymization
//!
//! Text is hashed with BLAKE2b keyed by the current key, and the hex digest
//! is cut down to the requested length. The same key, text and length always
//! give the same output.
//!
//! Each hex character carries 4 bits, so `length` characters give about
//! `2^(2 * length)` outputs before a collision becomes likely. The default of
//! 10 gives roughly a million, which suits small datasets like the email
//! addresses in an application log. Raise `length` for larger ones.

use crate::error::{Error, Result};
use crate::host::HostKeyResolver;
use crate::key::{HostKey, KeyOrigin, ToKeyBytes};
use std::sync::{Arc, OnceLock, RwLock};

pub const DEFAULT_LENGTH: usize = 10;
/// Largest digest BLAKE2b produces, in bytes.
pub const MAX_LENGTH: usize = 64;

pub struct Anonymizer {
    key: RwLock<Arc<HostKey>>,
}

impl Anonymizer {
    pub fn new(key: HostKey) -> Self {
        Anonymizer {
            key: RwLock::new(Arc::new(key)),
        }
    }

    /// Anonymizer keyed by this machine's host key.
    pub fn from_host() -> Self {
        Self::new(HostKeyResolver::for_current_platform().resolve())
    }

    /// Anonymizer with an explicit key, for reproducible output across hosts.
    pub fn with_key<K: ToKeyBytes + ?Sized>(key: &K) -> Result<Self> {
        let bytes = key
            .to_key_bytes()
            .ok_or_else(|| Error::InvalidKey("key has no byte representation".to_string()))?;
        Ok(Self::new(HostKey::new(bytes, KeyOrigin::Override)?))
    }

    /// Hash `text` into `length` lowercase hex characters.
    ///
    /// `None` yields an empty string without looking at `length`.
    pub fn anonymize(&self, text: Option<&str>, length: usize) -> Result<String> {
        let Some(text) = text else {
            return Ok(String::new());
        };
        if length == 0 || length > MAX_LENGTH {
            return Err(Error::InvalidLength(length));
        }

        let key = self.current_key();
        // The digest size is part of BLAKE2b's parameter block, so a
        // different length changes every character, not just the tail.
        let hash = blake2b_simd::Params::new()
            .hash_length(length)
            .key(key.as_bytes())
            .hash(text.as_bytes());

        let mut hex = hex::encode(hash.as_bytes());
        hex.truncate(length);
        Ok(hex)
    }

    /// `anonymize` with the default length.
    pub fn anon_default(&self, text: &str) -> String {
        // DEFAULT_LENGTH is always in range.
        self.anonymize(Some(text), DEFAULT_LENGTH)
            .unwrap_or_default()
    }

    /// Replace the key.
    ///
    /// Meant for tests and debugging only: with a known key anyone can
    /// recompute outputs for guessed inputs. Values that can't be turned into
    /// bytes, or that are not a usable BLAKE2b key (empty, or longer than 64
    /// bytes), are ignored and the current key stays in place.
    pub fn set_unique_key<K: ToKeyBytes + ?Sized>(&self, key: &K) {
        let Some(bytes) = key.to_key_bytes() else {
            tracing::debug!("ignoring key override with no byte representation");
            return;
        };
        let key = match HostKey::new(bytes, KeyOrigin::Override) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!("ignoring key override: {}", e);
                return;
            }
        };
        tracing::warn!("anonymization key overridden; output is no longer host-specific");
        self.store(key);
    }

    pub fn origin(&self) -> KeyOrigin {
        self.current_key().origin()
    }

    fn current_key(&self) -> Arc<HostKey> {
        match self.key.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn store(&self, key: HostKey) {
        let key = Arc::new(key);
        match self.key.write() {
            Ok(mut guard) => *guard = key,
            Err(poisoned) => *poisoned.into_inner() = key,
        }
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::from_host()
    }
}

static GLOBAL: OnceLock<Anonymizer> = OnceLock::new();

/// Process-wide anonymizer, keyed by the host key on first use.
pub fn global() -> &'static Anonymizer {
    GLOBAL.get_or_init(Anonymizer::from_host)
}

/// Anonymize `text` with the process-wide key.
pub fn anon(text: Option<&str>, length: usize) -> Result<String> {
    global().anonymize(text, length)
}

/// Replace the process-wide key. See [`Anonymizer::set_unique_key`].
pub fn set_unique_key<K: ToKeyBytes + ?Sized>(key: &K) {
    global().set_unique_key(key)
}
