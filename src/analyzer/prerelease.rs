//! MV006 and MV007: prerelease and pseudo-versions in the build.
//!
//! Pseudo-versions are prereleases by syntax but get their own rule, so a
//! version is reported by at most one of the two.

use super::{Rule, RuleContext};
use crate::error::Result;
use crate::types::{Finding, RuleId, RuleOutcome};
use crate::version::ModVersion;
use async_trait::async_trait;

/// Flags modules selected at a prerelease that is not a pseudo-version.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrereleaseInUse;

/// Flags modules selected at a pseudo-version.
#[derive(Debug, Clone, Copy, Default)]
pub struct PseudoVersionInUse;

/// Build a finding for each versioned module matching `matches`.
fn scan(
    ctx: &RuleContext<'_>,
    rule: RuleId,
    matches: fn(&ModVersion) -> bool,
    describe: &str,
    suggestion: &str,
) -> Result<RuleOutcome> {
    let mut findings = Vec::new();
    for module in ctx.build_list.all() {
        ctx.inspect(rule, module);
        let Some(raw) = module.version.as_deref() else {
            continue;
        };
        let version = ModVersion::parse_in(raw, format_args!("selected for {}", module.path))?;
        if matches(&version) {
            findings.push(
                Finding::new(
                    rule,
                    format!("a module is using a {describe} version: {} {raw}", module.path),
                )
                .with_modules(vec![module.module_ref()])
                .with_suggestion(suggestion),
            );
        }
    }
    Ok(RuleOutcome::from_findings(rule, findings))
}

#[async_trait]
impl Rule for PrereleaseInUse {
    fn id(&self) -> RuleId {
        RuleId::Prerelease
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        scan(
            ctx,
            self.id(),
            ModVersion::is_prerelease,
            "prerelease",
            "Upgrade to a stable release once one is available",
        )
    }
}

#[async_trait]
impl Rule for PseudoVersionInUse {
    fn id(&self) -> RuleId {
        RuleId::PseudoVersion
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        scan(
            ctx,
            self.id(),
            ModVersion::is_pseudo,
            "pseudo-version",
            "Depend on a tagged release instead of a commit",
        )
    }
}
