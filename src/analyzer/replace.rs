//! MV008: replace directives in the main module.

use super::{Rule, RuleContext};
use crate::error::{ModvetError, Result};
use crate::types::{Finding, RuleId, RuleOutcome};
use async_trait::async_trait;

/// Flags every `replace` directive in the main module's manifest.
///
/// The manifest is read as written, so directives that do not affect the
/// build are reported too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceDirectivesPresent;

#[async_trait]
impl Rule for ReplaceDirectivesPresent {
    fn id(&self) -> RuleId {
        RuleId::Replace
    }

    async fn run(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let Some(main) = ctx.build_list.main_module() else {
            tracing::debug!(rule = %self.id(), "No main module in build list");
            return Ok(RuleOutcome::from_findings(self.id(), Vec::new()));
        };
        ctx.inspect(self.id(), main);

        let location = main.manifest_location.as_deref().ok_or_else(|| {
            ModvetError::resolution(
                format!("main module '{}' has no manifest location", main.path),
                file!(),
                line!(),
            )
        })?;
        let manifest = ctx.manifests.read_manifest(location).await?;

        let findings = manifest
            .replace
            .iter()
            .map(|replace| {
                Finding::new(
                    self.id(),
                    format!("the main module has a 'replace' directive: {replace}"),
                )
                .with_modules(vec![replace.old.clone(), replace.new.clone()])
                .with_suggestion("Remove the directive before publishing the module")
            })
            .collect();

        Ok(RuleOutcome::from_findings(self.id(), findings))
    }
}
