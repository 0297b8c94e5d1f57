//! MV003: one module present at several major-version paths.

use super::{Rule, RuleContext};
use crate::error::Result;
use crate::types::{Finding, ResolvedModule, RuleId, RuleOutcome};
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static MAJOR_SUFFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v[0-9]+$").expect("Invalid regex"));

/// Strip every trailing `/vN` element from a module path.
///
/// `example.com/mod/v3` and `example.com/mod` share the family key
/// `example.com/mod`. Stripping is repeated, so the key of a key is
/// itself.
#[must_use]
pub fn family_key(path: &str) -> &str {
    let mut key = path;
    while let Some(m) = MAJOR_SUFFIX_PATTERN.find(key) {
        key = &key[..m.start()];
    }
    key
}

/// Flags module families present under more than one path.
///
/// Only semantic-import-versioning `/vN` suffixes are considered;
/// `gopkg.in/pkg.v3` style paths are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleMajorVersions;

#[async_trait]
impl Rule for MultipleMajorVersions {
    fn id(&self) -> RuleId {
        RuleId::MultipleMajor
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let mut families: BTreeMap<&str, Vec<&ResolvedModule>> = BTreeMap::new();
        for module in ctx.build_list.all() {
            ctx.inspect(self.id(), module);
            families.entry(family_key(&module.path)).or_default().push(module);
        }

        let findings = families
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|(family, members)| {
                let paths: Vec<&str> = members.iter().map(|m| m.path.as_str()).collect();
                Finding::new(
                    self.id(),
                    format!(
                        "a module has multiple major versions in this build: {}",
                        paths.join(", ")
                    ),
                )
                .with_modules(members.iter().map(|m| m.module_ref()).collect())
                .with_suggestion(format!(
                    "Migrate importers of {family} to a single major version"
                ))
            })
            .collect();

        Ok(RuleOutcome::from_findings(self.id(), findings))
    }
}
