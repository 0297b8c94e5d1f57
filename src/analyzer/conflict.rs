//! MV004: a module required at potentially incompatible versions.
//!
//! Minimal version selection picks one version per path, so two
//! requirements on different major lines of the same path are silently
//! merged. Without a `/vN` suffix the path cannot tell those lines apart,
//! which makes v0, v1 and `+incompatible` releases the ones at risk.

use super::{Rule, RuleContext};
use crate::error::Result;
use crate::types::{Finding, ModuleRef, RuleId, RuleOutcome};
use crate::version::ModVersion;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Detects paths required at several potentially incompatible versions.
///
/// # Algorithm
///
/// The rule reads the requirement graph, not the build list, since only
/// the graph still shows every version that was asked for.
///
/// ## Phase 1: Grouping
///
/// Group edges by path and canonicalize each version, keeping any
/// `+incompatible` marker.
///
/// ```text
/// example.com/a: v0.1.0, v1.2.0, v1.0.0, v1.2.0
/// ```
///
/// ## Phase 2: Walk
///
/// Sort descending, drop repeats, then walk the list comparing each
/// version with the previous distinct one:
///
/// | Version | Representative when |
/// |---------|--------------------|
/// | before v1.0.0 | always |
/// | v1 | previous was not v1 |
/// | v2+ `+incompatible` | previous had another major |
/// | anything else | never |
///
/// ```text
/// v1.2.0  v1, nothing before      -> representative
/// v1.0.0  v1, previous is v1      -> skip
/// v0.1.0  before v1               -> representative
/// ```
///
/// ## Phase 3: Report
///
/// Two or more representatives for a path give one finding listing them
/// in ascending order. Paths are visited lexically.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictingRequires;

/// Representative incompatible versions among `versions`, ascending and
/// canonicalized.
#[must_use]
pub fn representatives(versions: &[ModVersion]) -> Vec<String> {
    let mut sorted: Vec<(&ModVersion, String)> = versions.iter().map(|v| (v, v.canonical())).collect();
    sorted.sort_by(|(a, a_canon), (b, b_canon)| {
        b.cmp_precedence(a).then_with(|| b_canon.cmp(a_canon))
    });
    sorted.dedup_by(|(_, a), (_, b)| a == b);

    let mut found = Vec::new();
    let mut prior: Option<&ModVersion> = None;
    for (version, canonical) in sorted {
        let representative = if version.is_before_v1() {
            true
        } else if version.is_v1() {
            !prior.is_some_and(ModVersion::is_v1)
        } else if version.is_v2_plus_incompatible() {
            prior.is_none_or(|p| p.major() != version.major())
        } else {
            false
        };
        if representative {
            found.push(canonical);
        }
        prior = Some(version);
    }

    found.reverse();
    found
}

#[async_trait]
impl Rule for ConflictingRequires {
    fn id(&self) -> RuleId {
        RuleId::ConflictingRequires
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let mut by_path: BTreeMap<&str, Vec<ModVersion>> = BTreeMap::new();
        for edge in ctx.build_list.requirements() {
            let version = ModVersion::parse_in(&edge.version, format_args!("required for {}", edge.path))?;
            by_path.entry(edge.path.as_str()).or_default().push(version);
        }

        let mut findings = Vec::new();
        for (path, versions) in by_path {
            let found = representatives(&versions);
            if ctx.verbose {
                tracing::info!(
                    rule = %self.id(),
                    module = %path,
                    required = versions.len(),
                    representatives = ?found,
                    "Required versions"
                );
            }
            if found.len() < 2 {
                continue;
            }

            findings.push(
                Finding::new(
                    self.id(),
                    format!(
                        "module \"{path}\" was required with potentially incompatible versions: {}",
                        found.join(", ")
                    ),
                )
                .with_modules(found.iter().map(|v| ModuleRef::new(path, v)).collect())
                .with_suggestion(format!(
                    "Align every requirement of {path} on a single major version line"
                )),
            );
        }

        Ok(RuleOutcome::from_findings(self.id(), findings))
    }
}
