//! `natlen`: width-typed bounded sequences and narrowing-boundary checks.
//!
//! Sequence lengths come in two widths: `legacy` (32-bit, capacity capped at
//! `i32::MAX` elements) and `native` (pointer-width). Containers and spans
//! carry their width in the type, so a length that fits the mode is a
//! constructor-checked invariant and never re-validated on read.
//!
//! Crossing from native-width code into legacy-width code can truncate a
//! length. Every narrowing path here is checked: conversions return errors,
//! and the [`boundary::Crossing`] checker applies a policy (forbid / warn /
//! allow) with per-site overrides, emitting structured diagnostics. The
//! `audit` module runs the same rules over a declared width manifest.

// Important rule: we do not declare all modules as pub, we will be very
// intentional about what our public interface is.
pub mod audit;
pub mod boundary;
pub mod diagnostics;
pub mod manifest;
mod seq;
mod span;
mod text;
mod width;

pub use seq::{BoundedSeq, CapacityError, IndexError};
pub use span::{Span, SpanMut};
pub use text::BoundedStr;
pub use width::{fits_legacy, LenWidth, Legacy, Native, WidthMode, WidthModeParseError};
