//! Core data types used throughout modvet.
//!
//! This module defines the fundamental data structures for representing:
//! - Modules as they appear in the build list and in manifests
//! - Requirement edges from the module graph
//! - Rules, findings and the aggregated vet report
//! - Report formats and severity levels

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One module at one version.
///
/// `version` is absent for the main module and for directory replacement
/// targets, which have no version of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRef {
    /// Module path (e.g., "golang.org/x/text")
    pub path: String,

    /// Module version (e.g., "v0.3.0")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleRef {
    /// Create a versioned module reference.
    #[must_use]
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: Some(version.into()),
        }
    }

    /// Create a reference without a version.
    #[must_use]
    pub fn unversioned(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: None,
        }
    }

    /// Parse `path` or `path@version`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedEdge` if the text holds more than one `@` or an
    /// empty path or version.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split('@');
        let path = parts.next().unwrap_or_default();
        let version = parts.next();
        if path.is_empty() || parts.next().is_some() || version.is_some_and(str::is_empty) {
            return Err(crate::err!(MalformedEdge { edge: text.to_string(), rule: None }));
        }
        Ok(Self {
            path: path.to_string(),
            version: version.map(str::to_string),
        })
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{v}", self.path),
            None => write!(f, "{}", self.path),
        }
    }
}

/// One entry of the resolved build list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedModule {
    /// Module path
    pub path: String,

    /// Version actually selected, after replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Whether this is the main module
    #[serde(default)]
    pub is_main: bool,

    /// Whether the main module only needs this module indirectly
    #[serde(default)]
    pub is_indirect: bool,

    /// Replacement target, present iff a replace directive applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<ModuleRef>,

    /// Newer upstream version, if one exists and upgrade info was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_update: Option<String>,

    /// Handle understood by the manifest accessor (a go.mod path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_location: Option<String>,
}

impl ResolvedModule {
    /// Create a plain dependency entry.
    #[must_use]
    pub fn dependency(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: Some(version.into()),
            is_main: false,
            is_indirect: false,
            replaced_by: None,
            available_update: None,
            manifest_location: None,
        }
    }

    /// Create the main module entry.
    #[must_use]
    pub fn main(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: None,
            is_main: true,
            is_indirect: false,
            replaced_by: None,
            available_update: None,
            manifest_location: None,
        }
    }

    /// The module as a path/version reference.
    #[must_use]
    pub fn module_ref(&self) -> ModuleRef {
        ModuleRef {
            path: self.path.clone(),
            version: self.version.clone(),
        }
    }
}

/// One edge of the flattened requirement graph.
///
/// `version` is the effective version required, with replacements applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementEdge {
    /// Required module path
    pub path: String,

    /// Required version
    pub version: String,

    /// Module declaring the requirement, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_by: Option<ModuleRef>,
}

impl RequirementEdge {
    /// Parse the `path@version` encoding.
    ///
    /// # Errors
    ///
    /// Returns `MalformedEdge` unless the text splits on `@` into exactly
    /// one non-empty path and one non-empty version.
    pub fn parse(encoded: &str) -> Result<Self> {
        match ModuleRef::parse(encoded)? {
            ModuleRef { path, version: Some(version) } => Ok(Self {
                path,
                version,
                required_by: None,
            }),
            ModuleRef { version: None, .. } => {
                Err(crate::err!(MalformedEdge { edge: encoded.to_string(), rule: None }))
            }
        }
    }

    /// Attach the requiring module.
    #[must_use]
    pub fn required_by(mut self, from: ModuleRef) -> Self {
        self.required_by = Some(from);
        self
    }

    /// The `path@version` encoding.
    #[must_use]
    pub fn encoded(&self) -> String {
        format!("{}@{}", self.path, self.version)
    }
}

/// A `require` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    /// Required module path
    pub path: String,
    /// Required version
    pub version: String,
    /// Marked `// indirect`
    #[serde(default)]
    pub indirect: bool,
}

/// A `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replace {
    /// Module (and optionally version) being replaced
    pub old: ModuleRef,
    /// Replacement module or directory
    pub new: ModuleRef,
}

impl fmt::Display for Replace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.old, self.new)
    }
}

/// Parsed directives of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestDirectives {
    /// The `module` directive
    pub module: Option<ModuleRef>,
    /// `require` directives
    pub require: Vec<Require>,
    /// `exclude` directives
    pub exclude: Vec<ModuleRef>,
    /// `replace` directives
    pub replace: Vec<Replace>,
}

/// Identifier of a diagnostic rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    /// go.mod would be rewritten by a build
    ManifestStale,
    /// Dependencies have newer versions upstream
    Upgrades,
    /// A module is present at several major-version paths
    MultipleMajor,
    /// Requirements name potentially incompatible versions
    ConflictingRequires,
    /// A selected version is excluded by a dependency
    ExcludedVersion,
    /// A prerelease version is selected
    Prerelease,
    /// A pseudo-version is selected
    PseudoVersion,
    /// The main module has replace directives
    Replace,
}

impl RuleId {
    /// All rules, in execution order.
    pub const ALL: [Self; 8] = [
        Self::ManifestStale,
        Self::Upgrades,
        Self::MultipleMajor,
        Self::ConflictingRequires,
        Self::ExcludedVersion,
        Self::Prerelease,
        Self::PseudoVersion,
        Self::Replace,
    ];

    /// Stable finding code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ManifestStale => "MV001",
            Self::Upgrades => "MV002",
            Self::MultipleMajor => "MV003",
            Self::ConflictingRequires => "MV004",
            Self::ExcludedVersion => "MV005",
            Self::Prerelease => "MV006",
            Self::PseudoVersion => "MV007",
            Self::Replace => "MV008",
        }
    }

    /// Command-line and config name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ManifestStale => "manifest-stale",
            Self::Upgrades => "upgrades",
            Self::MultipleMajor => "multiple-major",
            Self::ConflictingRequires => "conflicting-requires",
            Self::ExcludedVersion => "excluded-version",
            Self::Prerelease => "prerelease",
            Self::PseudoVersion => "pseudo-version",
            Self::Replace => "replace",
        }
    }

    /// One-line description shown by `modvet rules`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ManifestStale => "go.mod would be updated by 'go build' or 'go list'",
            Self::Upgrades => "dependencies have available updates",
            Self::MultipleMajor => "a module has multiple major versions in this build",
            Self::ConflictingRequires => {
                "a module is required at potentially incompatible v0, v1 or +incompatible versions"
            }
            Self::ExcludedVersion => "the build uses a version excluded by a dependency",
            Self::Prerelease => "the build uses a prerelease version (pseudo-versions excluded)",
            Self::PseudoVersion => "the build uses a pseudo-version",
            Self::Replace => "the main module has 'replace' directives",
        }
    }

    /// Severity used unless overridden by configuration.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::ManifestStale | Self::ConflictingRequires | Self::ExcludedVersion => {
                Severity::Error
            }
            Self::MultipleMajor | Self::Prerelease | Self::PseudoVersion | Self::Replace => {
                Severity::Warning
            }
            Self::Upgrades => Severity::Info,
        }
    }

    /// Look a rule up by its finding code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Plain text format
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Graph output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum GraphFormat {
    /// DOT format (Graphviz)
    #[default]
    Dot,
    /// JSON format
    Json,
    /// Mermaid diagram format
    Mermaid,
}

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational finding
    Info,
    /// Warning - potential issue
    Warning,
    /// Error - definite problem
    Error,
    /// Critical - severe issue requiring immediate attention
    Critical,
}

impl Severity {
    /// Parse a case-insensitive severity name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single structured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule that produced the finding
    pub rule: RuleId,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Offending modules, with the versions involved
    pub modules: Vec<ModuleRef>,

    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Finding {
    /// Create a finding at the rule's default severity.
    #[must_use]
    pub fn new(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.default_severity(),
            message: message.into(),
            modules: Vec::new(),
            suggestion: None,
        }
    }

    /// Attach the offending modules.
    #[must_use]
    pub fn with_modules(mut self, modules: Vec<ModuleRef>) -> Self {
        self.modules = modules;
        self
    }

    /// Attach a suggested fix.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Finding code of the producing rule.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.rule.code()
    }
}

/// Result of running one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Rule that ran
    pub rule: RuleId,
    /// Whether the rule flagged the build
    pub flagged: bool,
    /// Findings emitted
    pub findings: Vec<Finding>,
}

impl RuleOutcome {
    /// Build an outcome; flagged iff any finding was emitted.
    #[must_use]
    pub fn from_findings(rule: RuleId, findings: Vec<Finding>) -> Self {
        Self {
            rule,
            flagged: !findings.is_empty(),
            findings,
        }
    }
}

/// Everything collected by one vet pass.
///
/// Outcomes are kept in execution order. When a pass aborts, the outcomes
/// collected before the failure remain here and are still reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VetReport {
    /// Outcomes of the rules that ran
    pub outcomes: Vec<RuleOutcome>,

    /// Build list snapshot, once resolved
    pub modules: Vec<ResolvedModule>,

    /// Why the pass stopped early, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VetReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rule outcome.
    pub fn push(&mut self, outcome: RuleOutcome) {
        self.outcomes.push(outcome);
    }

    /// Mark the pass as aborted.
    pub fn abort(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }

    /// The error that stopped the pass, if any.
    #[must_use]
    pub fn aborted(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether any rule flagged the build.
    #[must_use]
    pub fn flagged(&self) -> bool {
        self.outcomes.iter().any(|o| o.flagged)
    }

    /// Outcome of a given rule, if it ran.
    #[must_use]
    pub fn outcome(&self, rule: RuleId) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }

    /// All findings across rules, in execution order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.outcomes.iter().flat_map(|o| o.findings.iter())
    }

    /// Rules that flagged the build.
    #[must_use]
    pub fn flagged_rules(&self) -> Vec<RuleId> {
        self.outcomes.iter().filter(|o| o.flagged).map(|o| o.rule).collect()
    }

    /// Count findings per severity label.
    #[must_use]
    pub fn findings_by_severity(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for finding in self.findings() {
            *counts.entry(finding.severity.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Check if there are any error-level findings.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings()
            .any(|f| matches!(f.severity, Severity::Error | Severity::Critical))
    }
}
