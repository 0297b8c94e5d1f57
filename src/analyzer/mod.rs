//! Diagnostic rules over a resolved build list.
//!
//! Each rule inspects an immutable [`BuildList`] and produces a
//! [`RuleOutcome`]: zero or more findings and a flagged bit. Rules do not
//! share state and can run in any order; the driver runs them in code
//! order.
//!
//! | Code | Rule | Looks at |
//! |------|------|----------|
//! | MV001 | [`ManifestStale`] | resolver only |
//! | MV002 | [`AvailableUpgrades`] | build list |
//! | MV003 | [`MultipleMajorVersions`] | build list |
//! | MV004 | [`ConflictingRequires`] | requirement graph |
//! | MV005 | [`ExcludedVersionInUse`] | build list + dependency manifests |
//! | MV006 | [`PrereleaseInUse`] | build list |
//! | MV007 | [`PseudoVersionInUse`] | build list |
//! | MV008 | [`ReplaceDirectivesPresent`] | main manifest |
//!
//! Any client error or malformed version aborts the rule; there are no
//! partial results.

mod conflict;
mod excluded;
mod majors;
mod prerelease;
mod replace;
mod stale;
mod upgrades;

pub use conflict::{representatives, ConflictingRequires};
pub use excluded::ExcludedVersionInUse;
pub use majors::{family_key, MultipleMajorVersions};
pub use prerelease::{PrereleaseInUse, PseudoVersionInUse};
pub use replace::ReplaceDirectivesPresent;
pub use stale::ManifestStale;
pub use upgrades::AvailableUpgrades;

use crate::buildlist::BuildList;
use crate::error::Result;
use crate::toolchain::ManifestAccessor;
use crate::types::{ResolvedModule, RuleId, RuleOutcome};
use async_trait::async_trait;

/// Everything a rule may consult.
pub struct RuleContext<'a> {
    /// Resolved build list and requirement graph
    pub build_list: &'a BuildList,
    /// Manifest reader
    pub manifests: &'a dyn ManifestAccessor,
    /// Log per-module detail
    pub verbose: bool,
}

impl RuleContext<'_> {
    /// Log a module under inspection when running verbosely.
    pub(crate) fn inspect(&self, rule: RuleId, module: &ResolvedModule) {
        if self.verbose {
            tracing::info!(
                rule = %rule,
                module = %module.path,
                version = module.version.as_deref().unwrap_or("<none>"),
                main = module.is_main,
                replaced_by = ?module.replaced_by,
                "Inspecting module"
            );
        }
    }
}

/// A diagnostic rule over the build list.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Which rule this is.
    fn id(&self) -> RuleId;

    /// Run the rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a client call fails or a version is malformed.
    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome>;
}

/// Rules that run over a build list, in execution order.
#[must_use]
pub fn rules_in_order() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(AvailableUpgrades),
        Box::new(MultipleMajorVersions),
        Box::new(ConflictingRequires),
        Box::new(ExcludedVersionInUse),
        Box::new(PrereleaseInUse),
        Box::new(PseudoVersionInUse),
        Box::new(ReplaceDirectivesPresent),
    ]
}
