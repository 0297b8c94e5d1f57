//! MV001: the manifest would be rewritten by a build.

use crate::error::Result;
use crate::toolchain::ResolverClient;
use crate::types::{Finding, RuleId, RuleOutcome};

/// Flags a manifest that a build would have to update.
///
/// This runs before any build list is resolved, so it takes the resolver
/// directly instead of implementing [`Rule`](super::Rule).
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestStale;

impl ManifestStale {
    /// Which rule this is.
    #[must_use]
    pub fn id(&self) -> RuleId {
        RuleId::ManifestStale
    }

    /// Ask the resolver whether the manifest is current.
    ///
    /// # Errors
    ///
    /// Passes through the resolver's error when the project does not build
    /// at all; nothing is flagged in that case.
    pub async fn run(&self, resolver: &dyn ResolverClient, verbose: bool) -> Result<RuleOutcome> {
        let current = resolver.check_manifest_current().await?;
        if verbose {
            tracing::info!(rule = %self.id(), current, "Checked manifest against build");
        }

        let findings = if current {
            Vec::new()
        } else {
            vec![Finding::new(
                self.id(),
                "the current module's 'go.mod' would be updated by 'go build' or 'go list'",
            )
            .with_suggestion("Run 'go mod tidy' (or 'go build ./...') and commit the updated go.mod before vetting")]
        };
        Ok(RuleOutcome::from_findings(self.id(), findings))
    }
}
