use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BoundaryCode {
    #[serde(rename = "NL0001")]
    Nl0001LengthOverflow,
    #[serde(rename = "NL0002")]
    Nl0002NarrowingEdge,
    #[serde(rename = "NL0003")]
    Nl0003IndirectNarrowingEdge,
    #[serde(rename = "NL0004")]
    Nl0004OverrideApplied,
    #[serde(rename = "NL0005")]
    Nl0005UnknownWidth,
    #[serde(rename = "NL0901")]
    Nl0901InternalBug,
}

impl BoundaryCode {
    pub fn code_str(self) -> &'static str {
        match self {
            BoundaryCode::Nl0001LengthOverflow => "NL0001",
            BoundaryCode::Nl0002NarrowingEdge => "NL0002",
            BoundaryCode::Nl0003IndirectNarrowingEdge => "NL0003",
            BoundaryCode::Nl0004OverrideApplied => "NL0004",
            BoundaryCode::Nl0005UnknownWidth => "NL0005",
            BoundaryCode::Nl0901InternalBug => "NL0901",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            BoundaryCode::Nl0001LengthOverflow => {
                "length exceeds the legacy 32-bit cap at a narrowing crossing"
            }
            BoundaryCode::Nl0002NarrowingEdge => {
                "native-length value flows into legacy-width code"
            }
            BoundaryCode::Nl0003IndirectNarrowingEdge => {
                "narrowing through indirect dispatch cannot be checked at the call site"
            }
            BoundaryCode::Nl0004OverrideApplied => "override suppressed a narrowing finding",
            BoundaryCode::Nl0005UnknownWidth => "edge references a module with no declared width",
            BoundaryCode::Nl0901InternalBug => "internal natlen bug",
        }
    }

    pub fn default_help(self) -> Option<&'static str> {
        match self {
            BoundaryCode::Nl0001LengthOverflow => Some(
                "Keep the sequence at or below i32::MAX elements, or keep both sides native-width.",
            ),
            BoundaryCode::Nl0002NarrowingEdge => Some(
                "Recompile the callee as native-width, or add the site to overrides after checking lengths with fits_legacy.",
            ),
            BoundaryCode::Nl0003IndirectNarrowingEdge => Some(
                "Indirect targets may have any width; an override can only downgrade this to a warning.",
            ),
            BoundaryCode::Nl0901InternalBug => {
                Some("This is a bug in natlen. Please report it with the input manifest.")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: BoundaryCode,
    pub severity: Severity,
    /// Call-site id the finding applies to, when there is one.
    pub site: Option<String>,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: BoundaryCode, site: Option<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            site,
            message: message.into(),
            help: code.default_help().map(|s| s.to_string()),
        }
    }

    pub fn warning(code: BoundaryCode, site: Option<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code, site, message)
        }
    }

    pub fn info(code: BoundaryCode, site: Option<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Info,
            help: None,
            ..Diagnostic::error(code, site, message)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.code.code_str(), self.severity)?;
        if let Some(site) = &self.site {
            write!(f, " at {site}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

fn all_codes() -> [BoundaryCode; 6] {
    [
        BoundaryCode::Nl0001LengthOverflow,
        BoundaryCode::Nl0002NarrowingEdge,
        BoundaryCode::Nl0003IndirectNarrowingEdge,
        BoundaryCode::Nl0004OverrideApplied,
        BoundaryCode::Nl0005UnknownWidth,
        BoundaryCode::Nl0901InternalBug,
    ]
}

/// Markdown table of every diagnostic code, for docs and the CLI.
pub fn render_codes_md() -> String {
    let mut out = String::new();
    out.push_str("| Code | Message | Help |\n");
    out.push_str("| --- | --- | --- |\n");
    for code in all_codes() {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            code.code_str(),
            code.default_message(),
            code.default_help().unwrap_or("-"),
        ));
    }
    out
}
