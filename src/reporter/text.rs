//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Finding, ResolvedModule, RuleId, Severity, VetReport};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list the whole build list
    verbose: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            verbose: config.output.verbose,
        }
    }

    /// Table of every rule, for `modvet rules`.
    #[must_use]
    pub fn rule_catalog(&self, config: &Config) -> String {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Code", "Rule", "Severity", "Enabled", "Description"]);

        for rule in RuleId::ALL {
            let enabled = if config.checks.is_enabled(rule) { "yes" } else { "no" };
            table.add_row(vec![
                Cell::new(rule.code()),
                Cell::new(rule.name()),
                self.severity_cell(config.severity_for(rule)),
                Cell::new(enabled),
                Cell::new(rule.description()),
            ]);
        }

        format!("{table}\n")
    }

    fn severity_cell(&self, severity: Severity) -> Cell {
        let cell = Cell::new(severity);
        if !self.use_colors {
            return cell;
        }
        match severity {
            Severity::Critical | Severity::Error => cell.fg(Color::Red),
            Severity::Warning => cell.fg(Color::Yellow),
            Severity::Info => cell.fg(Color::Blue),
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, report: &VetReport) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str(&self.format_header());
        output.push('\n');

        // Summary
        output.push_str(&self.format_summary(report));
        output.push('\n');

        // Findings
        if report.findings().next().is_some() {
            output.push_str(&self.format_findings(report));
            output.push('\n');
        }

        // Per-rule outcomes
        if !report.outcomes.is_empty() {
            output.push_str(&self.format_outcomes(report));
            output.push('\n');
        }

        // Build list (verbose only)
        if self.verbose && !report.modules.is_empty() {
            output.push_str(&self.format_modules(report));
            output.push('\n');
        }

        // Footer
        output.push_str(&self.format_footer(report));

        Ok(output)
    }
}

impl TextReporter {
    fn section_title(&self, title: &str) -> String {
        let title = if self.use_colors {
            title.bright_cyan().bold().to_string()
        } else {
            title.to_string()
        };
        format!("\n{title}\n{}\n", "-".repeat(80))
    }

    /// Format the report header.
    fn format_header(&self) -> String {
        let title = "modvet Report";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        if self.use_colors {
            format!(
                "\n{} {} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                format!("({timestamp})").dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{title} {version} ({timestamp})\n{}\n", "=".repeat(80))
        }
    }

    /// Format the summary section.
    fn format_summary(&self, report: &VetReport) -> String {
        let mut output = self.section_title("Summary");

        let count = |want: fn(Severity) -> bool| report.findings().filter(|f| want(f.severity)).count();
        let errors = count(|s| matches!(s, Severity::Error | Severity::Critical));
        let warnings = count(|s| s == Severity::Warning);
        let infos = count(|s| s == Severity::Info);

        let plural = |n: usize, one: &'static str, many: &'static str| if n == 1 { one } else { many };
        if self.use_colors {
            output.push_str(&format!(
                "  {} {} | {} {} | {} {}\n",
                errors.to_string().red().bold(),
                plural(errors, "Error", "Errors"),
                warnings.to_string().yellow().bold(),
                plural(warnings, "Warning", "Warnings"),
                infos.to_string().blue(),
                plural(infos, "Info", "Infos"),
            ));
        } else {
            output.push_str(&format!(
                "  {errors} {} | {warnings} {} | {infos} {}\n",
                plural(errors, "Error", "Errors"),
                plural(warnings, "Warning", "Warnings"),
                plural(infos, "Info", "Infos"),
            ));
        }

        output.push_str(&format!(
            "  {} rules run | {} flagged | {} modules in build list\n",
            report.outcomes.len(),
            report.flagged_rules().len(),
            report.modules.len()
        ));

        output
    }

    /// Format the findings section, most severe first.
    fn format_findings(&self, report: &VetReport) -> String {
        let mut output = self.section_title("Findings");

        let mut findings: Vec<&Finding> = report.findings().collect();
        findings.sort_by(|a, b| b.severity.cmp(&a.severity));

        for finding in findings {
            output.push_str(&self.format_finding(finding));
        }

        output
    }

    /// Format a single finding.
    fn format_finding(&self, finding: &Finding) -> String {
        let label = finding.severity.to_string();
        let severity_str = if self.use_colors {
            match finding.severity {
                Severity::Critical => label.red().bold().to_string(),
                Severity::Error => label.red().to_string(),
                Severity::Warning => label.yellow().to_string(),
                Severity::Info => label.blue().to_string(),
            }
        } else {
            label
        };

        let mut output = format!("\n  [{severity_str}] {} ({})\n", finding.message, finding.code());

        if !finding.modules.is_empty() {
            let modules = finding
                .modules
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let line = format!("    -> {modules}");
            output.push_str(&if self.use_colors { line.dimmed().to_string() } else { line });
            output.push('\n');
        }

        if let Some(suggestion) = &finding.suggestion {
            let line = format!("    Suggestion: {suggestion}");
            output.push_str(&if self.use_colors { line.green().to_string() } else { line });
            output.push('\n');
        }

        output
    }

    /// Format the per-rule outcome table.
    fn format_outcomes(&self, report: &VetReport) -> String {
        let mut output = self.section_title("Rules");

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Code", "Rule", "Status", "Findings"]);

        for outcome in &report.outcomes {
            let status = if outcome.flagged { "FLAGGED" } else { "ok" };
            let status_cell = match (self.use_colors, outcome.flagged) {
                (true, true) => Cell::new(status).fg(Color::Red),
                (true, false) => Cell::new(status).fg(Color::Green),
                (false, _) => Cell::new(status),
            };
            table.add_row(vec![
                Cell::new(outcome.rule.code()),
                Cell::new(outcome.rule.name()),
                status_cell,
                Cell::new(outcome.findings.len()),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Format the build-list table.
    fn format_modules(&self, report: &VetReport) -> String {
        let mut output = self.section_title("Build List");

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Module", "Version", "Notes"]);

        for module in &report.modules {
            table.add_row(vec![
                Cell::new(truncate(&module.path, 60)),
                Cell::new(module.version.as_deref().unwrap_or("-")),
                Cell::new(module_notes(module)),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Format the report footer.
    fn format_footer(&self, report: &VetReport) -> String {
        let flagged = report.flagged_rules();
        let status = if let Some(error) = report.aborted() {
            let mut text = format!("ABORTED: {error}");
            if !flagged.is_empty() {
                let codes = flagged.iter().map(|r| r.code()).collect::<Vec<_>>().join(", ");
                text.push_str(&format!("\nFAILED - Flagged by {codes}"));
            }
            if self.use_colors {
                text.red().bold().to_string()
            } else {
                text
            }
        } else if flagged.is_empty() {
            if self.use_colors {
                "PASSED - No issues found".green().bold().to_string()
            } else {
                "PASSED - No issues found".to_string()
            }
        } else {
            let codes = flagged.iter().map(|r| r.code()).collect::<Vec<_>>().join(", ");
            let text = format!("FAILED - Flagged by {codes}");
            if self.use_colors {
                text.red().bold().to_string()
            } else {
                text
            }
        };

        format!("\n{status}\n\n")
    }
}

fn module_notes(module: &ResolvedModule) -> String {
    let mut notes = Vec::new();
    if module.is_main {
        notes.push("main".to_string());
    }
    if module.is_indirect {
        notes.push("indirect".to_string());
    }
    if let Some(replacement) = &module.replaced_by {
        notes.push(format!("replaced by {replacement}"));
    }
    if let Some(update) = &module.available_update {
        notes.push(format!("update {update}"));
    }
    notes.join(", ")
}

/// Truncate a string to a maximum length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
