use std::collections::{BTreeMap, BTreeSet};

use natlen_contracts::AUDIT_REPORT_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::boundary::CrossingPolicy;
use crate::diagnostics::{BoundaryCode, Diagnostic, Severity};
use crate::manifest::{EdgeKind, WidthManifest};
use crate::width::WidthMode;

#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    pub policy: CrossingPolicy,
    /// Extra override sites merged with the manifest's `overrides`.
    pub allow_sites: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub schema_version: String,
    pub manifest_sha256: String,
    /// True when no error-severity finding was produced.
    pub ok: bool,
    pub counts: AuditCounts,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Flags every narrowing edge of a declared width map.
///
/// A narrowing edge runs from a native-width caller into a legacy-width
/// callee. Direct edges follow the policy and the override set; indirect
/// edges are flagged conservatively because the actual dispatch target may
/// have any width, and an override downgrades them to a warning, never to
/// silence. Edges naming undeclared modules are always errors.
pub fn audit(manifest: &WidthManifest, opts: &AuditOptions) -> Vec<Diagnostic> {
    let widths: BTreeMap<&str, WidthMode> = manifest
        .modules
        .iter()
        .map(|module| (module.id.as_str(), module.width))
        .collect();
    let overrides: BTreeSet<&str> = manifest
        .overrides
        .iter()
        .map(String::as_str)
        .chain(opts.allow_sites.iter().map(String::as_str))
        .collect();

    let mut diagnostics = Vec::new();
    for edge in &manifest.edges {
        let mut unknown = false;
        for endpoint in [edge.caller.as_str(), edge.callee.as_str()] {
            if !widths.contains_key(endpoint) {
                diagnostics.push(Diagnostic::error(
                    BoundaryCode::Nl0005UnknownWidth,
                    Some(edge.site.clone()),
                    format!("module {endpoint:?} has no declared width"),
                ));
                unknown = true;
            }
        }
        if unknown {
            continue;
        }
        let caller = widths[edge.caller.as_str()];
        let callee = widths[edge.callee.as_str()];
        if !(caller == WidthMode::Native && callee == WidthMode::Legacy) {
            continue;
        }
        let overridden = overrides.contains(edge.site.as_str());
        match edge.kind {
            EdgeKind::Direct => {
                if overridden {
                    diagnostics.push(Diagnostic::info(
                        BoundaryCode::Nl0004OverrideApplied,
                        Some(edge.site.clone()),
                        format!("override admits narrowing edge {} -> {}", edge.caller, edge.callee),
                    ));
                    continue;
                }
                let message = format!(
                    "native-width {} calls legacy-width {}",
                    edge.caller, edge.callee
                );
                match opts.policy {
                    CrossingPolicy::Forbid => diagnostics.push(Diagnostic::error(
                        BoundaryCode::Nl0002NarrowingEdge,
                        Some(edge.site.clone()),
                        message,
                    )),
                    CrossingPolicy::Warn => diagnostics.push(Diagnostic::warning(
                        BoundaryCode::Nl0002NarrowingEdge,
                        Some(edge.site.clone()),
                        message,
                    )),
                    CrossingPolicy::Allow => {}
                }
            }
            EdgeKind::Indirect => {
                let severe = opts.policy == CrossingPolicy::Forbid && !overridden;
                let message = format!(
                    "native-width {} reaches legacy-width {} through indirect dispatch",
                    edge.caller, edge.callee
                );
                if severe {
                    diagnostics.push(Diagnostic::error(
                        BoundaryCode::Nl0003IndirectNarrowingEdge,
                        Some(edge.site.clone()),
                        message,
                    ));
                } else {
                    diagnostics.push(Diagnostic::warning(
                        BoundaryCode::Nl0003IndirectNarrowingEdge,
                        Some(edge.site.clone()),
                        message,
                    ));
                }
            }
        }
    }
    diagnostics
}

/// Runs the audit and wraps it in the machine-readable report envelope.
pub fn report(manifest_bytes: &[u8], manifest: &WidthManifest, opts: &AuditOptions) -> AuditReport {
    let diagnostics = audit(manifest, opts);
    let counts = AuditCounts {
        errors: diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count(),
        warnings: diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count(),
        infos: diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .count(),
    };
    AuditReport {
        schema_version: AUDIT_REPORT_SCHEMA_VERSION.to_string(),
        manifest_sha256: sha256_hex(manifest_bytes),
        ok: counts.errors == 0,
        counts,
        diagnostics,
    }
}
