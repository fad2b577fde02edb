use natlen::audit::{audit, report, sha256_hex, AuditOptions};
use natlen::boundary::CrossingPolicy;
use natlen::manifest::WidthManifest;
use natlen_contracts::{AUDIT_REPORT_SCHEMA_VERSION, WIDTH_MANIFEST_SCHEMA_VERSION};
use serde_json::{json, Value};

fn manifest_bytes() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "schema_version": WIDTH_MANIFEST_SCHEMA_VERSION,
        "modules": [
            { "id": "engine", "width": "native" },
            { "id": "codec", "width": "legacy" },
        ],
        "edges": [
            { "caller": "engine", "callee": "codec", "site": "engine::encode#1" },
            { "caller": "engine", "callee": "codec", "kind": "indirect", "site": "engine::hook#1" },
            { "caller": "codec", "callee": "engine", "site": "codec::done#1" },
        ],
        "overrides": ["engine::encode#1"],
    }))
    .expect("encode manifest")
}

#[test]
fn report_json_shape_is_stable() {
    let bytes = manifest_bytes();
    let manifest = WidthManifest::from_slice(&bytes).expect("parse manifest");
    let report = report(&bytes, &manifest, &AuditOptions::default());

    let value: Value = serde_json::to_value(&report).expect("encode report");
    assert_eq!(
        value.get("schema_version").and_then(Value::as_str),
        Some(AUDIT_REPORT_SCHEMA_VERSION)
    );
    assert_eq!(
        value.get("manifest_sha256").and_then(Value::as_str),
        Some(sha256_hex(&bytes).as_str())
    );
    assert_eq!(value.get("ok").and_then(Value::as_bool), Some(false));

    let counts = value.get("counts").expect("counts");
    assert_eq!(counts.get("errors").and_then(Value::as_u64), Some(1));
    assert_eq!(counts.get("warnings").and_then(Value::as_u64), Some(0));
    assert_eq!(counts.get("infos").and_then(Value::as_u64), Some(1));

    let diagnostics = value
        .get("diagnostics")
        .and_then(Value::as_array)
        .expect("diagnostics array");
    assert_eq!(diagnostics.len(), 2);
    let codes: Vec<&str> = diagnostics
        .iter()
        .map(|d| d.get("code").and_then(Value::as_str).expect("code"))
        .collect();
    assert!(codes.contains(&"NL0003"));
    assert!(codes.contains(&"NL0004"));
}

#[test]
fn warn_policy_report_is_ok_with_warnings() {
    let bytes = manifest_bytes();
    let manifest = WidthManifest::from_slice(&bytes).expect("parse manifest");
    let report = report(
        &bytes,
        &manifest,
        &AuditOptions {
            policy: CrossingPolicy::Warn,
            allow_sites: Vec::new(),
        },
    );
    assert!(report.ok);
    assert_eq!(report.counts.errors, 0);
    // the indirect edge stays a warning
    assert_eq!(report.counts.warnings, 1);
}

#[test]
fn diagnostics_round_trip_through_json() {
    let bytes = manifest_bytes();
    let manifest = WidthManifest::from_slice(&bytes).expect("parse manifest");
    let diags = audit(&manifest, &AuditOptions::default());
    let encoded = serde_json::to_vec(&diags).expect("encode diagnostics");
    let decoded: Vec<natlen::diagnostics::Diagnostic> =
        serde_json::from_slice(&encoded).expect("decode diagnostics");
    assert_eq!(decoded, diags);
}

#[test]
fn manifest_loads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("widths.json");
    std::fs::write(&path, manifest_bytes()).expect("write manifest");
    let manifest = WidthManifest::from_path(&path).expect("load manifest");
    assert_eq!(manifest.modules.len(), 2);
    assert_eq!(manifest.edges.len(), 3);
}
