//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Finding, ResolvedModule, RuleOutcome, VetReport};
use serde::Serialize;
use std::collections::HashMap;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &VetReport) -> Result<String> {
        let report = JsonReport::from(report);

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Rule outcomes, in execution order
    pub outcomes: Vec<JsonOutcome<'a>>,
    /// Build list snapshot
    pub modules: &'a [ResolvedModule],
}

impl<'a> From<&'a VetReport> for JsonReport<'a> {
    fn from(report: &'a VetReport) -> Self {
        Self {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            summary: ReportSummary {
                rules_run: report.outcomes.len(),
                flagged: report.flagged(),
                flagged_rules: report.flagged_rules().iter().map(|r| r.code()).collect(),
                total_findings: report.findings().count(),
                findings_by_severity: report.findings_by_severity(),
                total_modules: report.modules.len(),
                has_errors: report.has_errors(),
                aborted: report.aborted().is_some(),
                error: report.error.clone(),
            },
            outcomes: report.outcomes.iter().map(JsonOutcome::from).collect(),
            modules: &report.modules,
        }
    }
}

/// Report metadata.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// modvet version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
}

/// Report summary.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    /// Number of rules that ran
    pub rules_run: usize,
    /// Whether any rule flagged the build
    pub flagged: bool,
    /// Codes of the rules that flagged
    pub flagged_rules: Vec<&'static str>,
    /// Total findings
    pub total_findings: usize,
    /// Findings grouped by severity
    pub findings_by_severity: HashMap<String, usize>,
    /// Modules in the build list
    pub total_modules: usize,
    /// Whether there are error-level findings
    pub has_errors: bool,
    /// Whether the pass stopped before every rule ran
    pub aborted: bool,
    /// The error that stopped the pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON representation of a rule outcome.
#[derive(Debug, Serialize)]
pub struct JsonOutcome<'a> {
    /// Finding code
    pub code: &'static str,
    /// Rule name
    pub rule: &'static str,
    /// Whether the rule flagged the build
    pub flagged: bool,
    /// Findings emitted
    pub findings: Vec<JsonFinding<'a>>,
}

impl<'a> From<&'a RuleOutcome> for JsonOutcome<'a> {
    fn from(outcome: &'a RuleOutcome) -> Self {
        Self {
            code: outcome.rule.code(),
            rule: outcome.rule.name(),
            flagged: outcome.flagged,
            findings: outcome.findings.iter().map(JsonFinding::from).collect(),
        }
    }
}

/// JSON representation of a finding.
#[derive(Debug, Serialize)]
pub struct JsonFinding<'a> {
    /// Finding code
    pub code: &'static str,
    /// Severity level
    pub severity: String,
    /// Short message
    pub message: &'a str,
    /// Offending modules as `path@version`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
    /// Suggested fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'a str>,
}

impl<'a> From<&'a Finding> for JsonFinding<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            code: finding.code(),
            severity: finding.severity.to_string(),
            message: &finding.message,
            modules: finding.modules.iter().map(ToString::to_string).collect(),
            suggestion: finding.suggestion.as_deref(),
        }
    }
}
