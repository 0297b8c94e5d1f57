//! Error types for modvet.
//!
//! All fallible operations return [`Result`], whose error type is the
//! single [`ModvetError`] enum. Every variant records the source file and
//! line that raised it; use the [`err!`](crate::err) macro to fill those
//! in automatically.
//!
//! # Error Categories
//!
//! - **Environment errors**: not inside a module, `go` binary missing
//! - **Stale manifest**: `go.mod` would be rewritten by a build
//! - **Resolution errors**: a toolchain call failed or timed out
//! - **Malformed data**: invalid versions, edges or build lists
//! - **Config / report errors**: YAML parsing, invalid values, serialization
//!
//! # Example
//!
//! ```rust
//! use modvet::error::{ModvetError, Result};
//!
//! fn require_version(version: &str) -> Result<()> {
//!     if !version.starts_with('v') {
//!         return Err(modvet::err!(MalformedVersion {
//!             version: version.to_string(),
//!             message: "missing 'v' prefix".to_string(),
//!             rule: None,
//!         }));
//!     }
//!     Ok(())
//! }
//! ```

use crate::types::RuleId;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Fields may use shorthand initialization.
///
/// Usage:
/// ```ignore
/// return Err(err!(Resolution { message: "go list failed".to_string(), rule: None }));
/// return Err(err!(NotInProject { dir }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident $(: $value:expr)?),* $(,)? }) => {
        $crate::error::ModvetError::$variant {
            $($field $(: $value)?,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for modvet operations.
pub type Result<T> = std::result::Result<T, ModvetError>;

/// The main error type for modvet.
#[derive(Error, Debug)]
pub enum ModvetError {
    // =========================================================================
    // Environment Errors
    // =========================================================================
    /// The working directory is not inside a module.
    #[error("no current 'go.mod' file in '{dir}'; run from within a module with module mode enabled ({src_path}:{src_line})")]
    NotInProject {
        /// Directory that was checked
        dir: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The external toolchain could not be started.
    #[error("toolchain '{binary}' is unavailable ({src_path}:{src_line}): {message}")]
    ToolchainUnavailable {
        /// Binary that failed to start
        binary: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Staleness
    // =========================================================================
    /// The manifest would be rewritten by a build.
    #[error("the current module's 'go.mod' would be updated by 'go build' or 'go list'; update it before vetting ({src_path}:{src_line})")]
    StaleManifest {
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Resolution Errors
    // =========================================================================
    /// A resolver or manifest call failed.
    #[error("{}resolution failed ({src_path}:{src_line}): {message}", rule_prefix(.rule))]
    Resolution {
        /// Error message
        message: String,
        /// Rule that triggered the call, if known
        rule: Option<RuleId>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A toolchain call exceeded its time budget.
    #[error("{}'{command}' timed out after {limit:?} ({src_path}:{src_line})", rule_prefix(.rule))]
    Timeout {
        /// The command line that timed out
        command: String,
        /// Configured limit
        limit: Duration,
        /// Rule that triggered the call, if known
        rule: Option<RuleId>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Malformed Data
    // =========================================================================
    /// A version string is not valid semver.
    #[error("{}invalid semver version '{version}' ({src_path}:{src_line}): {message}", rule_prefix(.rule))]
    MalformedVersion {
        /// The offending version string
        version: String,
        /// Why it was rejected
        message: String,
        /// Rule that was evaluating it, if known
        rule: Option<RuleId>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A requirement edge is not of the form `path@version`.
    #[error("{}unexpected requirement '{edge}' ({src_path}:{src_line})", rule_prefix(.rule))]
    MalformedEdge {
        /// The raw edge text
        edge: String,
        /// Rule that was evaluating it, if known
        rule: Option<RuleId>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The build list violates its invariants.
    #[error("malformed build list ({src_path}:{src_line}): {message}")]
    MalformedBuildList {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Internal error (should not happen in normal operation).
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

fn rule_prefix(rule: &Option<RuleId>) -> String {
    rule.map(|r| format!("{}: ", r.name())).unwrap_or_default()
}

impl ModvetError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error, src_path: &'static str, src_line: u32) -> Self {
        Self::Io { path: path.into(), source, src_path, src_line }
    }

    /// Creates a `Resolution` error not yet attributed to a rule.
    #[must_use]
    pub fn resolution(message: String, src_path: &'static str, src_line: u32) -> Self {
        Self::Resolution { message, rule: None, src_path, src_line }
    }

    /// Attributes an error to the rule it surfaced in.
    ///
    /// Applies to resolution, timeout and malformed version or edge errors.
    /// Other variants pass through untouched, as does an error that already
    /// names a rule.
    #[must_use]
    pub fn with_rule(mut self, id: RuleId) -> Self {
        if let Self::Resolution { rule, .. }
        | Self::Timeout { rule, .. }
        | Self::MalformedVersion { rule, .. }
        | Self::MalformedEdge { rule, .. } = &mut self
        {
            if rule.is_none() {
                *rule = Some(id);
            }
        }
        self
    }

    /// The rule an error was attributed to, if any.
    #[must_use]
    pub fn rule(&self) -> Option<RuleId> {
        match self {
            Self::Resolution { rule, .. }
            | Self::Timeout { rule, .. }
            | Self::MalformedVersion { rule, .. }
            | Self::MalformedEdge { rule, .. } => *rule,
            _ => None,
        }
    }

    /// Whether this error means no rule could run at all.
    #[must_use]
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::NotInProject { .. } | Self::ToolchainUnavailable { .. })
    }

    /// Whether this error reports malformed toolchain data.
    #[must_use]
    pub fn is_malformed_data(&self) -> bool {
        matches!(
            self,
            Self::MalformedVersion { .. } | Self::MalformedEdge { .. } | Self::MalformedBuildList { .. }
        )
    }

    /// Returns the process exit code for the error.
    ///
    /// Every failure exits with 1, matching a flagged run; argument errors
    /// are reported by clap with 2 before this is reached.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<std::io::Error> for ModvetError {
    fn from(source: std::io::Error) -> Self {
        // Prefer ModvetError::io(path, ...) where a path is known.
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

impl From<serde_json::Error> for ModvetError {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization/deserialization error: {source}"),
            src_path: file!(),
            src_line: line!(),
        }
    }
}
