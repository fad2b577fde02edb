use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{BoundaryCode, Diagnostic};
use crate::seq::BoundedSeq;
use crate::span::Span;
use crate::width::{LenWidth, Legacy, Native, WidthMode};

/// A narrowing crossing that cannot be completed.
///
/// Range violations inside one mode are `IndexError`; this type is only for
/// crossings between modes, so the two conditions stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// The value's length does not fit the consumer's width.
    LengthOverflow { len: usize, limit: usize },
    /// The crossing is disallowed by policy, independent of the length.
    Forbidden { site: String },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryError::LengthOverflow { len, limit } => {
                write!(f, "length {len} exceeds legacy cap {limit} at a narrowing crossing")
            }
            BoundaryError::Forbidden { site } => {
                write!(f, "narrowing crossing at {site} is forbidden by policy")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

/// Legacy lengths always fit native widths.
pub fn widen_len(len: u32) -> usize {
    len as usize
}

/// Checked native-to-legacy length conversion. Never truncates silently.
pub fn narrow_len(len: usize) -> Result<u32, BoundaryError> {
    match Legacy::repr_from_len(len) {
        Some(repr) => Ok(repr),
        None => Err(BoundaryError::LengthOverflow {
            len,
            limit: Legacy::MAX_LEN,
        }),
    }
}

pub fn widen_span<'a, T>(span: Span<'a, T, Legacy>) -> Span<'a, T, Native> {
    Span::from_checked_slice(span.as_slice())
}

pub fn narrow_span<'a, T>(span: Span<'a, T, Native>) -> Result<Span<'a, T, Legacy>, BoundaryError> {
    narrow_len(span.len())?;
    Ok(Span::from_checked_slice(span.as_slice()))
}

impl<T> BoundedSeq<T, Legacy> {
    /// Re-tags the container as native-width. Infallible.
    pub fn widen(self) -> BoundedSeq<T, Native> {
        let (items, capacity) = self.into_parts();
        BoundedSeq::from_parts(items, capacity)
    }
}

impl<T> BoundedSeq<T, Native> {
    /// Re-tags the container as legacy-width.
    ///
    /// The *capacity* must fit the legacy cap, not just the current length:
    /// a legacy container may never be able to grow past the cap.
    pub fn narrow(self) -> Result<BoundedSeq<T, Legacy>, BoundaryError> {
        if self.capacity() > Legacy::MAX_LEN {
            return Err(BoundaryError::LengthOverflow {
                len: self.capacity(),
                limit: Legacy::MAX_LEN,
            });
        }
        let (items, capacity) = self.into_parts();
        Ok(BoundedSeq::from_parts(items, capacity))
    }
}

/// What to do with a narrowing crossing whose length fits.
///
/// Oversized lengths are an error under every policy; the policy only
/// governs whether fitting crossings are permitted, warned about, or silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossingPolicy {
    Forbid,
    Warn,
    Allow,
}

impl CrossingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CrossingPolicy::Forbid => "forbid",
            CrossingPolicy::Warn => "warn",
            CrossingPolicy::Allow => "allow",
        }
    }
}

impl Default for CrossingPolicy {
    fn default() -> Self {
        CrossingPolicy::Forbid
    }
}

impl fmt::Display for CrossingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CrossingPolicyParseError {
    value: String,
}

impl fmt::Display for CrossingPolicyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid crossing policy {:?} (expected one of: forbid, warn, allow)",
            self.value
        )
    }
}

impl std::error::Error for CrossingPolicyParseError {}

impl FromStr for CrossingPolicy {
    type Err = CrossingPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.to_ascii_lowercase();
        match s.as_str() {
            "forbid" => Ok(CrossingPolicy::Forbid),
            "warn" => Ok(CrossingPolicy::Warn),
            "allow" => Ok(CrossingPolicy::Allow),
            _ => Err(CrossingPolicyParseError { value: s }),
        }
    }
}

#[cfg(feature = "clap")]
impl clap::ValueEnum for CrossingPolicy {
    fn value_variants<'a>() -> &'a [Self] {
        const ALL: [CrossingPolicy; 3] = [
            CrossingPolicy::Forbid,
            CrossingPolicy::Warn,
            CrossingPolicy::Allow,
        ];
        &ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// How a checked crossing was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingOutcome {
    /// No narrowing happened, or the policy allows it silently.
    Clean,
    /// A per-site override admitted the crossing.
    Overridden,
    /// The crossing went through with a warning diagnostic.
    Warned,
}

/// Runtime checker for width crossings.
///
/// Collects diagnostics as it goes; callers drain them with
/// [`Crossing::take_diagnostics`].
#[derive(Debug, Clone)]
pub struct Crossing {
    policy: CrossingPolicy,
    overrides: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Crossing {
    pub fn new(policy: CrossingPolicy) -> Self {
        Crossing {
            policy,
            overrides: BTreeSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_overrides<I, S>(policy: CrossingPolicy, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Crossing {
            policy,
            overrides: sites.into_iter().map(Into::into).collect(),
            diagnostics: Vec::new(),
        }
    }

    pub fn policy(&self) -> CrossingPolicy {
        self.policy
    }

    /// Validates one crossing of `len` from `producer` into `consumer` code.
    ///
    /// An oversized length fails under every policy. A fitting narrowing
    /// crossing is resolved by the override set first, then the policy.
    pub fn check(
        &mut self,
        site: &str,
        producer: WidthMode,
        consumer: WidthMode,
        len: usize,
    ) -> Result<CrossingOutcome, BoundaryError> {
        if !(producer == WidthMode::Native && consumer == WidthMode::Legacy) {
            return Ok(CrossingOutcome::Clean);
        }
        if len > Legacy::MAX_LEN {
            self.diagnostics.push(Diagnostic::error(
                BoundaryCode::Nl0001LengthOverflow,
                Some(site.to_string()),
                format!("length {len} exceeds legacy cap {}", Legacy::MAX_LEN),
            ));
            return Err(BoundaryError::LengthOverflow {
                len,
                limit: Legacy::MAX_LEN,
            });
        }
        if self.overrides.contains(site) {
            self.diagnostics.push(Diagnostic::info(
                BoundaryCode::Nl0004OverrideApplied,
                Some(site.to_string()),
                "override admits this narrowing crossing",
            ));
            return Ok(CrossingOutcome::Overridden);
        }
        match self.policy {
            CrossingPolicy::Forbid => {
                self.diagnostics.push(Diagnostic::error(
                    BoundaryCode::Nl0002NarrowingEdge,
                    Some(site.to_string()),
                    "narrowing crossing forbidden by policy",
                ));
                Err(BoundaryError::Forbidden {
                    site: site.to_string(),
                })
            }
            CrossingPolicy::Warn => {
                self.diagnostics.push(Diagnostic::warning(
                    BoundaryCode::Nl0002NarrowingEdge,
                    Some(site.to_string()),
                    format!("narrowing crossing of length {len}"),
                ));
                Ok(CrossingOutcome::Warned)
            }
            CrossingPolicy::Allow => Ok(CrossingOutcome::Clean),
        }
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
