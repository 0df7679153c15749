//! Trinomial: trivial anonymization
//!
//! Turns strings such as email addresses into short hex identifiers using a
//! BLAKE2b hash keyed by a per-host key. Output is stable on one machine and
//! differs between machines.
//!
//! ```
//! use trinomial::Anonymizer;
//!
//! let anonymizer = Anonymizer::with_key("x").unwrap();
//! assert_eq!(anonymizer.anon_default("foo@bar.com"), "55086f20ea");
//! ```
//!
//! Outputs are short, so collisions are possible, and anyone holding the host
//! key can test guesses. This hides values from casual readers; it is not a
//! defence against a determined one.

pub mod anonymizer;
pub mod error;
pub mod host;
pub mod key;

pub use anonymizer::{anon, set_unique_key, Anonymizer, DEFAULT_LENGTH, MAX_LENGTH};
pub use error::{Error, Result};
pub use host::{resolve_host_key, HostKeyResolver, KeySource, Platform};
pub use key::{HostKey, KeyOrigin, ToKeyBytes};
