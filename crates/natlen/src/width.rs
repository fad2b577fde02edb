use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Runtime tag for a length-width mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthMode {
    Legacy,
    Native,
}

impl WidthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WidthMode::Legacy => "legacy",
            WidthMode::Native => "native",
        }
    }

    pub fn max_len(self) -> usize {
        match self {
            WidthMode::Legacy => Legacy::MAX_LEN,
            WidthMode::Native => Native::MAX_LEN,
        }
    }
}

impl fmt::Display for WidthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct WidthModeParseError {
    value: String,
}

impl fmt::Display for WidthModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid width mode {:?} (expected one of: legacy, native)",
            self.value
        )
    }
}

impl std::error::Error for WidthModeParseError {}

impl FromStr for WidthMode {
    type Err = WidthModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.to_ascii_lowercase();
        match s.as_str() {
            "legacy" => Ok(WidthMode::Legacy),
            "native" => Ok(WidthMode::Native),
            _ => Err(WidthModeParseError { value: s }),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Compile-time length-width mode. Implemented only by [`Legacy`] and
/// [`Native`].
pub trait LenWidth: sealed::Sealed + Copy + Eq + fmt::Debug + 'static {
    /// The stored length integer for this mode.
    type Repr: Copy + Eq + Ord + fmt::Debug;

    const MODE: WidthMode;

    /// Largest representable element count. A length at or below this bound
    /// always round-trips through `Repr` without loss.
    const MAX_LEN: usize;

    /// `None` when `len` exceeds [`Self::MAX_LEN`].
    fn repr_from_len(len: usize) -> Option<Self::Repr>;

    fn len_from_repr(repr: Self::Repr) -> usize;
}

/// 32-bit length mode: capacity capped at `i32::MAX` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legacy;

/// Pointer-width length mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Native;

impl sealed::Sealed for Legacy {}
impl sealed::Sealed for Native {}

impl LenWidth for Legacy {
    type Repr = u32;

    const MODE: WidthMode = WidthMode::Legacy;
    const MAX_LEN: usize = i32::MAX as usize;

    fn repr_from_len(len: usize) -> Option<u32> {
        if len <= Self::MAX_LEN {
            Some(len as u32)
        } else {
            None
        }
    }

    fn len_from_repr(repr: u32) -> usize {
        repr as usize
    }
}

impl LenWidth for Native {
    type Repr = usize;

    const MODE: WidthMode = WidthMode::Native;
    const MAX_LEN: usize = isize::MAX as usize;

    fn repr_from_len(len: usize) -> Option<usize> {
        if len <= Self::MAX_LEN {
            Some(len)
        } else {
            None
        }
    }

    fn len_from_repr(repr: usize) -> usize {
        repr
    }
}

/// True when `len` is representable under the legacy 32-bit mode.
///
/// Callers that hand a native-length sequence to legacy-width code can use
/// this to pre-check the crossing instead of pattern-matching a conversion
/// error.
pub fn fits_legacy(len: usize) -> bool {
    len <= Legacy::MAX_LEN
}
