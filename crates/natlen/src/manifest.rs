use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use natlen_contracts::WIDTH_MANIFEST_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

use crate::width::WidthMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Direct,
    Indirect,
}

impl Default for EdgeKind {
    fn default() -> Self {
        EdgeKind::Direct
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDecl {
    pub id: String,
    pub width: WidthMode,
}

/// One call edge between declared modules. `site` is a caller-chosen stable
/// id for the call site (overrides refer to it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDecl {
    pub caller: String,
    pub callee: String,
    #[serde(default)]
    pub kind: EdgeKind,
    pub site: String,
}

/// Declared width map of a program: which modules are compiled under which
/// length-width mode, and the call edges between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidthManifest {
    pub schema_version: String,
    pub modules: Vec<ModuleDecl>,
    #[serde(default)]
    pub edges: Vec<EdgeDecl>,
    /// Sites whose narrowing findings are admitted.
    #[serde(default)]
    pub overrides: Vec<String>,
}

#[derive(Debug)]
pub enum ManifestError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    SchemaVersion {
        found: String,
        expected: &'static str,
    },
    DuplicateModule {
        id: String,
    },
    DuplicateSite {
        site: String,
    },
    UnknownOverrideSite {
        site: String,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Read { path, source } => {
                write!(f, "read manifest {}: {source}", path.display())
            }
            ManifestError::Json(err) => write!(f, "invalid manifest JSON: {err}"),
            ManifestError::SchemaVersion { found, expected } => {
                write!(f, "schema_version {found:?} (expected {expected:?})")
            }
            ManifestError::DuplicateModule { id } => write!(f, "duplicate module id {id:?}"),
            ManifestError::DuplicateSite { site } => write!(f, "duplicate edge site {site:?}"),
            ManifestError::UnknownOverrideSite { site } => {
                write!(f, "override names unknown site {site:?}")
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Read { source, .. } => Some(source),
            ManifestError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        ManifestError::Json(err)
    }
}

impl WidthManifest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let manifest: WidthManifest = serde_json::from_slice(bytes)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.schema_version != WIDTH_MANIFEST_SCHEMA_VERSION {
            return Err(ManifestError::SchemaVersion {
                found: self.schema_version.clone(),
                expected: WIDTH_MANIFEST_SCHEMA_VERSION,
            });
        }
        let mut module_ids = BTreeSet::new();
        for module in &self.modules {
            if !module_ids.insert(module.id.as_str()) {
                return Err(ManifestError::DuplicateModule {
                    id: module.id.clone(),
                });
            }
        }
        let mut sites = BTreeSet::new();
        for edge in &self.edges {
            if !sites.insert(edge.site.as_str()) {
                return Err(ManifestError::DuplicateSite {
                    site: edge.site.clone(),
                });
            }
        }
        for site in &self.overrides {
            if !sites.contains(site.as_str()) {
                return Err(ManifestError::UnknownOverrideSite { site: site.clone() });
            }
        }
        Ok(())
    }

    pub fn module_width(&self, id: &str) -> Option<WidthMode> {
        self.modules
            .iter()
            .find(|module| module.id == id)
            .map(|module| module.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest_json() -> serde_json::Value {
        json!({
            "schema_version": WIDTH_MANIFEST_SCHEMA_VERSION,
            "modules": [
                { "id": "core", "width": "native" },
                { "id": "plugin", "width": "legacy" },
            ],
            "edges": [
                { "caller": "core", "callee": "plugin", "site": "core::emit#1" },
                { "caller": "plugin", "callee": "core", "kind": "indirect", "site": "plugin::cb#1" },
            ],
            "overrides": ["core::emit#1"],
        })
    }

    fn parse(value: serde_json::Value) -> Result<WidthManifest, ManifestError> {
        WidthManifest::from_slice(&serde_json::to_vec(&value).expect("encode"))
    }

    #[test]
    fn parses_a_well_formed_manifest() {
        let manifest = parse(manifest_json()).expect("parse");
        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.module_width("core"), Some(WidthMode::Native));
        assert_eq!(manifest.module_width("missing"), None);
        assert_eq!(manifest.edges[0].kind, EdgeKind::Direct);
        assert_eq!(manifest.edges[1].kind, EdgeKind::Indirect);
    }

    #[test]
    fn rejects_wrong_schema_version() {
        let mut value = manifest_json();
        value["schema_version"] = json!("natlen.width-manifest@9.9.9");
        let err = parse(value).unwrap_err();
        assert!(matches!(err, ManifestError::SchemaVersion { .. }));
    }

    #[test]
    fn rejects_unknown_fields() {
        let mut value = manifest_json();
        value["surprise"] = json!(true);
        let err = parse(value).unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
    }

    #[test]
    fn rejects_duplicate_module_ids() {
        let mut value = manifest_json();
        value["modules"]
            .as_array_mut()
            .expect("modules array")
            .push(json!({ "id": "core", "width": "legacy" }));
        let err = parse(value).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateModule { .. }));
    }

    #[test]
    fn rejects_duplicate_sites() {
        let mut value = manifest_json();
        value["edges"]
            .as_array_mut()
            .expect("edges array")
            .push(json!({ "caller": "core", "callee": "plugin", "site": "core::emit#1" }));
        let err = parse(value).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateSite { .. }));
    }

    #[test]
    fn rejects_overrides_for_unknown_sites() {
        let mut value = manifest_json();
        value["overrides"] = json!(["nowhere#0"]);
        let err = parse(value).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownOverrideSite { .. }));
    }

    #[test]
    fn edges_and_overrides_default_to_empty() {
        let value = json!({
            "schema_version": WIDTH_MANIFEST_SCHEMA_VERSION,
            "modules": [{ "id": "core", "width": "native" }],
        });
        let manifest = parse(value).expect("parse");
        assert!(manifest.edges.is_empty());
        assert!(manifest.overrides.is_empty());
    }

    #[test]
    fn from_path_reports_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = WidthManifest::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }
}
