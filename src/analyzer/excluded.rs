//! MV005: a selected version excluded by a dependency's manifest.

use super::{Rule, RuleContext};
use crate::error::{ModvetError, Result};
use crate::types::{Finding, ModuleRef, RuleId, RuleOutcome};
use async_trait::async_trait;
use std::collections::HashMap;

/// Flags selected versions that some dependency excludes.
///
/// Only dependency manifests are read. The main module cannot select a
/// version its own manifest excludes, as the toolchain enforces that when
/// building the list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludedVersionInUse;

#[async_trait]
impl Rule for ExcludedVersionInUse {
    fn id(&self) -> RuleId {
        RuleId::ExcludedVersion
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let selected: HashMap<&str, &str> = ctx
            .build_list
            .all()
            .iter()
            .filter_map(|m| m.version.as_deref().map(|v| (m.path.as_str(), v)))
            .collect();

        let mut findings = Vec::new();
        for module in ctx.build_list.dependencies() {
            ctx.inspect(self.id(), module);

            let location = module.manifest_location.as_deref().ok_or_else(|| {
                ModvetError::resolution(
                    format!("module '{}' has no manifest location", module.module_ref()),
                    file!(),
                    line!(),
                )
            })?;
            let manifest = ctx.manifests.read_manifest(location).await?;

            for exclude in &manifest.exclude {
                let Some(excluded) = exclude.version.as_deref() else {
                    return Err(crate::err!(MalformedEdge {
                        edge: format!("exclude {} (in {location})", exclude.path),
                        rule: None,
                    }));
                };
                if selected.get(exclude.path.as_str()) != Some(&excluded) {
                    continue;
                }

                findings.push(
                    Finding::new(
                        self.id(),
                        format!(
                            "a module is using a version excluded by another module: {} {excluded} (excluded by {})",
                            exclude.path, module.path
                        ),
                    )
                    .with_modules(vec![
                        ModuleRef::new(&exclude.path, excluded),
                        module.module_ref(),
                    ])
                    .with_suggestion(format!(
                        "Require a version of {} other than {excluded}",
                        exclude.path
                    )),
                );
            }
        }

        Ok(RuleOutcome::from_findings(self.id(), findings))
    }
}
