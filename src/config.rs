//! Configuration module for modvet.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`modvet.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # modvet.yaml
//!
//! # Rules to run (manifest-stale always runs)
//! checks:
//!   upgrades: true
//!   multiple_major: true
//!   conflicting_requires: true
//!   excluded_version: true
//!   prerelease: true
//!   pseudo_version: true
//!   replace: false
//!
//! # Output options
//! output:
//!   colored: true
//!   verbose: false
//!   pretty: true
//!
//! # Toolchain options
//! toolchain:
//!   go_binary: ${GOROOT}/bin/go  # Environment variable expansion
//!   working_dir: ./service
//!   timeout_secs: 120
//!
//! # Policy rules
//! policies:
//!   severity_overrides:
//!     MV003: error
//!     pseudo-version: info
//! ```

use crate::error::Result;
use crate::types::{RuleId, Severity};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static BRACED_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Default configuration file names, in lookup order.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["modvet.yaml", "modvet.yml", ".modvet.yaml"];

/// Which rules run.
///
/// `manifest-stale` is not listed: every other rule depends on a current
/// manifest, so it always runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksOptions {
    /// MV002: available upgrades. Requires network access.
    #[serde(default = "default_true")]
    pub upgrades: bool,

    /// MV003: multiple major versions of one module.
    #[serde(default = "default_true")]
    pub multiple_major: bool,

    /// MV004: potentially incompatible requirements.
    #[serde(default = "default_true")]
    pub conflicting_requires: bool,

    /// MV005: excluded versions in use.
    #[serde(default = "default_true")]
    pub excluded_version: bool,

    /// MV006: prerelease versions in use.
    #[serde(default = "default_true")]
    pub prerelease: bool,

    /// MV007: pseudo-versions in use.
    #[serde(default = "default_true")]
    pub pseudo_version: bool,

    /// MV008: replace directives in the main module.
    #[serde(default = "default_true")]
    pub replace: bool,
}

impl Default for ChecksOptions {
    fn default() -> Self {
        Self {
            upgrades: true,
            multiple_major: true,
            conflicting_requires: true,
            excluded_version: true,
            prerelease: true,
            pseudo_version: true,
            replace: true,
        }
    }
}

impl ChecksOptions {
    /// Whether `rule` should run.
    #[must_use]
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        match rule {
            RuleId::ManifestStale => true,
            RuleId::Upgrades => self.upgrades,
            RuleId::MultipleMajor => self.multiple_major,
            RuleId::ConflictingRequires => self.conflicting_requires,
            RuleId::ExcludedVersion => self.excluded_version,
            RuleId::Prerelease => self.prerelease,
            RuleId::PseudoVersion => self.pseudo_version,
            RuleId::Replace => self.replace,
        }
    }

    /// Enable or disable `rule`. Returns false if the rule cannot be
    /// toggled.
    pub fn set(&mut self, rule: RuleId, enabled: bool) -> bool {
        let slot = match rule {
            RuleId::ManifestStale => return false,
            RuleId::Upgrades => &mut self.upgrades,
            RuleId::MultipleMajor => &mut self.multiple_major,
            RuleId::ConflictingRequires => &mut self.conflicting_requires,
            RuleId::ExcludedVersion => &mut self.excluded_version,
            RuleId::Prerelease => &mut self.prerelease,
            RuleId::PseudoVersion => &mut self.pseudo_version,
            RuleId::Replace => &mut self.replace,
        };
        *slot = enabled;
        true
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Log per-module rule detail and list the build list in reports.
    pub verbose: bool,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            pretty: true,
        }
    }
}

/// How to reach the Go toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainOptions {
    /// The `go` binary to run.
    #[serde(default = "default_go_binary")]
    pub go_binary: String,

    /// Directory to run in (default: current directory).
    pub working_dir: Option<PathBuf>,

    /// Time limit per toolchain call, in seconds. 0 or unset means none.
    pub timeout_secs: Option<u64>,
}

impl Default for ToolchainOptions {
    fn default() -> Self {
        Self {
            go_binary: default_go_binary(),
            working_dir: None,
            timeout_secs: None,
        }
    }
}

/// Policy rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PoliciesOptions {
    /// Severity per finding code or rule name.
    pub severity_overrides: HashMap<String, String>,
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Rules to run
    pub checks: ChecksOptions,

    /// Output options
    pub output: OutputOptions,

    /// Toolchain options
    pub toolchain: ToolchainOptions,

    /// Policy rules
    pub policies: PoliciesOptions,
}

fn default_true() -> bool {
    true
}

fn default_go_binary() -> String {
    "go".to_string()
}

/// Resolve a severity-override key: a finding code or a rule name.
fn rule_for_key(key: &str) -> Option<RuleId> {
    RuleId::from_code(key).or_else(|| RuleId::ALL.into_iter().find(|r| r.name() == key))
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Config = serde_yaml::from_str(&expanded).map_err(|e| {
            crate::err!(ConfigParse {
                message: e.to_string(),
                source: Some(Box::new(e)),
            })
        })?;

        tracing::debug!(
            go_binary = %config.toolchain.go_binary,
            overrides = config.policies.severity_overrides.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::ModvetError::io(path, e, file!(), line!()))?;
        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` for an empty `go_binary`, an unknown rule in
    /// `severity_overrides`, or an unknown severity.
    pub fn validate(&self) -> Result<()> {
        if self.toolchain.go_binary.trim().is_empty() {
            return Err(crate::err!(ConfigValue {
                key: "toolchain.go_binary".to_string(),
                message: "must not be empty".to_string(),
            }));
        }

        let mut overrides: Vec<_> = self.policies.severity_overrides.iter().collect();
        overrides.sort();

        let mut seen: HashMap<RuleId, &str> = HashMap::new();
        for (key, value) in overrides {
            let Some(rule) = rule_for_key(key) else {
                return Err(crate::err!(ConfigValue {
                    key: format!("policies.severity_overrides.{key}"),
                    message: "unknown rule code or name (see 'modvet rules')".to_string(),
                }));
            };
            if let Some(first) = seen.insert(rule, key) {
                return Err(crate::err!(ConfigValue {
                    key: format!("policies.severity_overrides.{key}"),
                    message: format!("{} is already overridden as '{first}'", rule.code()),
                }));
            }
            if Severity::parse(value).is_none() {
                return Err(crate::err!(ConfigValue {
                    key: format!("policies.severity_overrides.{key}"),
                    message: format!("unknown severity '{value}' (expected info, warning, error or critical)"),
                }));
            }
        }
        Ok(())
    }

    /// Severity for findings of `rule`, after overrides.
    #[must_use]
    pub fn severity_for(&self, rule: RuleId) -> Severity {
        self.policies
            .severity_overrides
            .iter()
            .filter(|(key, _)| rule_for_key(key) == Some(rule))
            .find_map(|(_, value)| Severity::parse(value))
            .unwrap_or_else(|| rule.default_severity())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# modvet configuration file

# Rules to run. manifest-stale (MV001) always runs first.
checks:
  # MV002: dependencies have available updates (needs network access)
  upgrades: true

  # MV003: a module is present at several /vN major-version paths
  multiple_major: true

  # MV004: a module is required at potentially incompatible v0, v1 or +incompatible versions
  conflicting_requires: true

  # MV005: the build uses a version excluded by a dependency
  excluded_version: true

  # MV006: the build uses a prerelease version
  prerelease: true

  # MV007: the build uses a pseudo-version
  pseudo_version: true

  # MV008: the main module has replace directives
  replace: true

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Log per-module rule detail and list the build list in text reports
  verbose: false

  # Pretty-print JSON output
  pretty: true

# Toolchain options
toolchain:
  # The go binary to run (can use environment variables)
  go_binary: go

  # Directory holding the module to vet (default: current directory)
  # working_dir: ./service

  # Time limit per go invocation, in seconds
  # timeout_secs: 120

# Policy rules
policies:
  # Severity overrides by finding code or rule name
  # severity_overrides:
  #   MV003: error         # Treat split major versions as errors
  #   pseudo-version: info # Tolerate pseudo-versions
"#
        .to_string()
    }

    /// Merge `check` command arguments into the configuration.
    pub fn merge_check_args(&mut self, args: &crate::cli::CheckArgs) {
        for &rule in &args.skip {
            if !self.checks.set(rule, false) {
                tracing::warn!(rule = %rule, "Rule cannot be skipped; it always runs");
            }
        }
        if args.verbose_rules {
            self.output.verbose = true;
        }
        if args.no_color {
            self.output.colored = false;
        }
        self.merge_toolchain_args(&args.toolchain);
    }

    /// Merge toolchain arguments into the configuration.
    pub fn merge_toolchain_args(&mut self, args: &crate::cli::ToolchainArgs) {
        if let Some(dir) = &args.dir {
            self.toolchain.working_dir = Some(dir.clone());
        }
        if let Some(go) = &args.go {
            self.toolchain.go_binary.clone_from(go);
        }
        if let Some(timeout) = args.timeout {
            self.toolchain.timeout_secs = Some(timeout);
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unset variables are left as is.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    for pattern in [&*BRACED_VAR_PATTERN, &*BARE_VAR_PATTERN] {
        for cap in pattern.captures_iter(content) {
            if let Ok(value) = std::env::var(&cap[1]) {
                result = result.replace(&cap[0], &value);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        for rule in RuleId::ALL {
            assert!(config.checks.is_enabled(rule), "{rule}");
        }
        assert_eq!(config.toolchain.go_binary, "go");
        assert!(config.output.colored);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml_nested() {
        let yaml = r#"
checks:
  upgrades: false
  replace: false
output:
  colored: false
toolchain:
  go_binary: /opt/go/bin/go
  timeout_secs: 30
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert!(!config.checks.is_enabled(RuleId::Upgrades));
        assert!(!config.checks.is_enabled(RuleId::Replace));
        assert!(config.checks.is_enabled(RuleId::Prerelease));
        assert!(!config.output.colored);
        assert!(config.output.pretty);
        assert_eq!(config.toolchain.go_binary, "/opt/go/bin/go");
        assert_eq!(config.toolchain.timeout_secs, Some(30));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert!(config.checks.upgrades);
        assert_eq!(config.toolchain.go_binary, "go");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("checks: [").unwrap_err();
        assert!(matches!(err, crate::ModvetError::ConfigParse { .. }));
    }

    #[test]
    fn test_env_var_expansion() {
        // Unset variables are left untouched.
        let expanded = expand_env_vars("go_binary: ${MODVET_TEST_SURELY_UNSET}/go");
        assert_eq!(expanded, "go_binary: ${MODVET_TEST_SURELY_UNSET}/go");

        for pattern in ["no vars here", "$NOTAVAR123", "${NESTED${VAR}}", "normal = ${KEY}"] {
            let _ = expand_env_vars(pattern);
        }
    }

    #[test]
    fn test_example_yaml_is_valid() {
        let config = Config::from_yaml(&Config::example_yaml()).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.checks.replace);
    }

    #[test]
    fn test_severity_overrides() {
        let yaml = r#"
policies:
  severity_overrides:
    MV003: error
    pseudo-version: info
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.severity_for(RuleId::MultipleMajor), Severity::Error);
        assert_eq!(config.severity_for(RuleId::PseudoVersion), Severity::Info);
        assert_eq!(config.severity_for(RuleId::Replace), Severity::Warning);
    }

    #[test]
    fn test_validate_rejects_unknown_rule() {
        let config = Config::from_yaml("policies:\n  severity_overrides:\n    MV999: error\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("MV999"));
    }

    #[test]
    fn test_validate_rejects_unknown_severity() {
        let config = Config::from_yaml("policies:\n  severity_overrides:\n    MV004: fatal\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown severity 'fatal'"));
    }

    #[test]
    fn test_validate_rejects_duplicate_override() {
        let yaml = "policies:\n  severity_overrides:\n    MV003: error\n    multiple-major: info\n";
        let err = Config::from_yaml(yaml).unwrap().validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("policies.severity_overrides.multiple-major"), "{msg}");
        assert!(msg.contains("MV003 is already overridden as 'MV003'"), "{msg}");
    }

    #[test]
    fn test_validate_rejects_empty_binary() {
        let config = Config::from_yaml("toolchain:\n  go_binary: ''\n").unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            crate::ModvetError::ConfigValue { .. }
        ));
    }

    #[test]
    fn test_manifest_stale_cannot_be_disabled() {
        let mut checks = ChecksOptions::default();
        assert!(!checks.set(RuleId::ManifestStale, false));
        assert!(checks.is_enabled(RuleId::ManifestStale));
        assert!(checks.set(RuleId::Prerelease, false));
        assert!(!checks.is_enabled(RuleId::Prerelease));
    }
}
