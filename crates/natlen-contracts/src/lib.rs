//! Shared, version-pinned protocol identifiers.
//!
//! These constants are the single source of truth for schema/version strings
//! that appear in machine-readable I/O, plus the stable process exit codes of
//! the audit CLI.

pub const WIDTH_MANIFEST_SCHEMA_VERSION: &str = "natlen.width-manifest@0.1.0";
pub const AUDIT_REPORT_SCHEMA_VERSION: &str = "natlen.audit.report@0.1.0";

/// Audit completed and found nothing at error severity.
pub const EXIT_OK: i32 = 0;
/// Audit completed with error-severity findings.
pub const EXIT_FINDINGS: i32 = 1;
/// Bad usage or unreadable/invalid input.
pub const EXIT_USAGE: i32 = 2;
