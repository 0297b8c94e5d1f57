//! # modvet
//!
//! A read-only auditor for a Go module's build list.
//!
//! modvet asks the Go toolchain for the module's resolved build list and
//! requirement graph, then runs a fixed set of rules over that snapshot.
//! Each rule reports structured findings; none of them modify `go.mod`.
//!
//! ## Features
//!
//! - **Staleness gate**: refuses to vet a `go.mod` a build would rewrite
//! - **Version classification**: prerelease, pseudo-version, major tiers
//! - **Requirement analysis**: split major versions, incompatible
//!   requirements, excluded versions, replace directives
//! - **Injected clients**: a real `go` toolchain or a fixed fixture
//! - **Multiple output formats**: plain text and JSON reports, plus DOT,
//!   JSON and Mermaid requirement graphs
//!
//! ## Example
//!
//! ```rust,no_run
//! use modvet::{Config, ReportFormat, Vetter, VetReport};
//! use modvet::reporter::Reporter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let vetter = Vetter::new(config.clone());
//!
//!     let mut report = VetReport::new();
//!     vetter.run(&mut report).await?;
//!
//!     let text = Reporter::new(&config).generate(&report, ReportFormat::Text)?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analyzer;
pub mod buildlist;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod reporter;
pub mod toolchain;
pub mod types;
pub mod version;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{ModvetError, Result};
pub use types::{
    Finding, GraphFormat, ModuleRef, ReportFormat, ResolvedModule, RuleId, RuleOutcome, Severity,
    VetReport,
};

use analyzer::{ManifestStale, RuleContext};
use buildlist::BuildList;
use graph::RequirementGraph;
use std::path::PathBuf;
use std::sync::Arc;
use toolchain::{GoToolchain, ManifestAccessor, ResolverClient};

/// Driver for one vet pass.
///
/// The `Vetter` owns the configuration and the two clients, and runs the
/// rules in code order over a single build-list snapshot.
///
/// # Example
///
/// ```rust,no_run
/// use modvet::{Config, Vetter, VetReport};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let vetter = Vetter::new(Config::default());
///     let mut report = VetReport::new();
///
///     // Outcomes gathered before a failure stay in `report`.
///     let result = vetter.run(&mut report).await;
///
///     println!("{} rules ran", report.outcomes.len());
///     result?;
///     Ok(())
/// }
/// ```
pub struct Vetter {
    config: Config,
    resolver: Arc<dyn ResolverClient>,
    manifests: Arc<dyn ManifestAccessor>,
}

impl Vetter {
    /// Create a vetter backed by the `go` toolchain described in `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let go = Arc::new(GoToolchain::from_config(&config.toolchain));
        Self {
            config,
            resolver: go.clone(),
            manifests: go,
        }
    }

    /// Create a vetter backed by the given clients.
    #[must_use]
    pub fn with_clients(
        config: Config,
        resolver: Arc<dyn ResolverClient>,
        manifests: Arc<dyn ManifestAccessor>,
    ) -> Self {
        Self {
            config,
            resolver,
            manifests,
        }
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every enabled rule, pushing outcomes into `report` as they
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not inside a module, the
    /// manifest is stale, a client call fails, or the toolchain reports
    /// malformed data. Outcomes collected before the failure remain in
    /// `report`, which also records the error.
    pub async fn run(&self, report: &mut VetReport) -> Result<()> {
        let result = self.run_rules(report).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, rules = report.outcomes.len(), "Vet pass aborted");
            report.abort(e);
        }
        result
    }

    async fn run_rules(&self, report: &mut VetReport) -> Result<()> {
        self.ensure_inside_project().await?;

        let stale = ManifestStale;
        let outcome = stale
            .run(self.resolver.as_ref(), self.config.output.verbose)
            .await
            .map_err(|e| e.with_rule(stale.id()))?;
        let is_stale = outcome.flagged;
        report.push(self.apply_overrides(outcome));
        if is_stale {
            tracing::warn!("Manifest is stale; skipping remaining rules");
            return Err(crate::err!(StaleManifest {}));
        }

        let build_list = self.resolve().await?;
        report.modules = build_list.all().to_vec();

        let ctx = RuleContext {
            build_list: &build_list,
            manifests: self.manifests.as_ref(),
            verbose: self.config.output.verbose,
        };

        for rule in analyzer::rules_in_order() {
            let id = rule.id();
            if !self.config.checks.is_enabled(id) {
                tracing::debug!(rule = %id, "Rule disabled; skipping");
                continue;
            }

            tracing::debug!(rule = %id, "Running rule");
            let outcome = rule.run(&ctx).await.map_err(|e| e.with_rule(id))?;
            tracing::debug!(
                rule = %id,
                flagged = outcome.flagged,
                findings = outcome.findings.len(),
                "Rule finished"
            );
            report.push(self.apply_overrides(outcome));
        }

        tracing::info!(
            rules = report.outcomes.len(),
            flagged = report.flagged(),
            "Vet pass complete"
        );
        Ok(())
    }

    /// Resolve the requirement graph for visualization.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not inside a module or the
    /// toolchain fails.
    pub async fn requirement_graph(&self) -> Result<RequirementGraph> {
        self.ensure_inside_project().await?;
        let build_list = self.resolve().await?;
        Ok(RequirementGraph::from_build_list(&build_list))
    }

    async fn ensure_inside_project(&self) -> Result<()> {
        if self.resolver.is_inside_project().await? {
            return Ok(());
        }
        let dir = match &self.config.toolchain.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        Err(crate::err!(NotInProject { dir }))
    }

    async fn resolve(&self) -> Result<BuildList> {
        let include_upgrades = self.config.checks.is_enabled(RuleId::Upgrades);
        let modules = self.resolver.resolve_build_list(include_upgrades).await?;
        let requirements = self.resolver.resolve_requirement_graph().await?;
        tracing::debug!(
            modules = modules.len(),
            edges = requirements.len(),
            include_upgrades,
            "Build list resolved"
        );
        BuildList::new(modules, requirements)
    }

    fn apply_overrides(&self, mut outcome: RuleOutcome) -> RuleOutcome {
        let severity = self.config.severity_for(outcome.rule);
        for finding in &mut outcome.findings {
            finding.severity = severity;
        }
        outcome
    }
}
