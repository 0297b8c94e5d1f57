//! MV002: dependencies with newer upstream versions.

use super::{Rule, RuleContext};
use crate::error::Result;
use crate::types::{Finding, ModuleRef, RuleId, RuleOutcome};
use async_trait::async_trait;

/// Reports every module with an available update.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailableUpgrades;

#[async_trait]
impl Rule for AvailableUpgrades {
    fn id(&self) -> RuleId {
        RuleId::Upgrades
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let mut findings = Vec::new();

        for module in ctx.build_list.all() {
            ctx.inspect(self.id(), module);
            let Some(update) = &module.available_update else {
                continue;
            };

            let current = module.version.as_deref().unwrap_or("(none)");
            findings.push(
                Finding::new(
                    self.id(),
                    format!("dependency has an available update: {} {current} -> {update}", module.path),
                )
                .with_modules(vec![module.module_ref(), ModuleRef::new(&module.path, update)])
                .with_suggestion(format!("go get {}@{update}", module.path)),
            );
        }

        Ok(RuleOutcome::from_findings(self.id(), findings))
    }
}
