//! Encoding flags and schema strictness.
//!
//! Both types keep the stable numeric codes older callers persisted, so a
//! stored flag set (e.g. `448`) still maps onto the same options.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Flags controlling how a document is encoded.
///
/// Only `pretty_print` changes the output today (it appends a trailing
/// newline). The YAML dumper never escapes slashes or non-ASCII characters,
/// so the other two flags are carried for compatibility and have no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub unescaped_slashes: bool,
    pub pretty_print: bool,
    pub unescaped_unicode: bool,
}

impl EncodeOptions {
    pub const UNESCAPED_SLASHES: u32 = 64;
    pub const PRETTY_PRINT: u32 = 128;
    pub const UNESCAPED_UNICODE: u32 = 256;
    pub const DEFAULT_BITS: u32 =
        Self::UNESCAPED_SLASHES | Self::PRETTY_PRINT | Self::UNESCAPED_UNICODE;

    /// All flags disabled
    pub const fn none() -> Self {
        Self {
            unescaped_slashes: false,
            pretty_print: false,
            unescaped_unicode: false,
        }
    }

    /// Build from a bitmask; unknown bits are ignored
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            unescaped_slashes: bits & Self::UNESCAPED_SLASHES != 0,
            pretty_print: bits & Self::PRETTY_PRINT != 0,
            unescaped_unicode: bits & Self::UNESCAPED_UNICODE != 0,
        }
    }

    /// Bitmask equivalent of these options
    pub const fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.unescaped_slashes {
            bits |= Self::UNESCAPED_SLASHES;
        }
        if self.pretty_print {
            bits |= Self::PRETTY_PRINT;
        }
        if self.unescaped_unicode {
            bits |= Self::UNESCAPED_UNICODE;
        }
        bits
    }

    /// Set pretty_print
    pub fn with_pretty_print(mut self, enabled: bool) -> Self {
        self.pretty_print = enabled;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::from_bits(Self::DEFAULT_BITS)
    }
}

/// Schema validation strictness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Allow additional properties and ignore required fields
    Lax,
    /// Use the schema verbatim
    #[default]
    Strict,
}

impl SchemaMode {
    /// Stable numeric code (Lax = 1, Strict = 2)
    pub const fn code(self) -> u8 {
        match self {
            Self::Lax => 1,
            Self::Strict => 2,
        }
    }
}

impl TryFrom<u8> for SchemaMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Lax),
            2 => Ok(Self::Strict),
            other => Err(Error::invalid_argument(format!(
                "unknown schema mode code: {}",
                other
            ))),
        }
    }
}
