//! In-memory toolchain for tests and offline runs.
//!
//! A [`FixtureToolchain`] answers every client call from fixed data. It can
//! be built in code or loaded from a JSON file:
//!
//! ```json
//! {
//!   "modules": [
//!     {"path": "example.com/hello", "is_main": true, "manifest_location": "hello/go.mod"},
//!     {"path": "rsc.io/quote", "version": "v1.5.2", "manifest_location": "quote/go.mod"}
//!   ],
//!   "requirements": ["example.com/hello rsc.io/quote@v1.5.2"],
//!   "manifests": {
//!     "hello/go.mod": {"replace": []},
//!     "quote/go.mod": {"exclude": [{"path": "rsc.io/sampler", "version": "v1.99.99"}]}
//!   }
//! }
//! ```

use super::{ManifestAccessor, ResolverClient};
use crate::error::{ModvetError, Result};
use crate::types::{ManifestDirectives, ModuleRef, RequirementEdge, ResolvedModule};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// A client call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixtureCall {
    /// `is_inside_project`
    InsideProject,
    /// `check_manifest_current`
    ManifestCurrent,
    /// `resolve_build_list`
    BuildList,
    /// `resolve_requirement_graph`
    RequirementGraph,
    /// `read_manifest`
    ReadManifest,
}

impl fmt::Display for FixtureCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InsideProject => "inside-project",
            Self::ManifestCurrent => "manifest-current",
            Self::BuildList => "build-list",
            Self::RequirementGraph => "requirement-graph",
            Self::ReadManifest => "read-manifest",
        };
        f.write_str(name)
    }
}

/// Client answering from fixed data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureToolchain {
    /// Reported by `is_inside_project`
    pub inside_project: bool,
    /// Reported by `check_manifest_current`
    pub manifest_current: bool,
    /// Build list, in order
    pub modules: Vec<ResolvedModule>,
    /// Requirement edges as `path@version` or `from path@version`
    pub requirements: Vec<String>,
    /// Manifests keyed by location
    pub manifests: BTreeMap<String, ManifestDirectives>,
    /// Calls that return a resolution error
    pub fail_on: BTreeSet<FixtureCall>,
}

impl Default for FixtureToolchain {
    fn default() -> Self {
        Self {
            inside_project: true,
            manifest_current: true,
            modules: Vec::new(),
            requirements: Vec::new(),
            manifests: BTreeMap::new(),
            fail_on: BTreeSet::new(),
        }
    }
}

impl FixtureToolchain {
    /// A current project with the given build list.
    #[must_use]
    pub fn new(modules: Vec<ResolvedModule>) -> Self {
        Self {
            modules,
            ..Self::default()
        }
    }

    /// Parse a fixture from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if the JSON does not describe a fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::err!(ConfigParse {
                message: format!("invalid toolchain fixture: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }

    /// Load a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModvetError::io(path, e, file!(), line!()))?;
        Self::from_json(&content)
    }

    /// Set the requirement edges.
    #[must_use]
    pub fn with_requirements<S: AsRef<str>>(mut self, edges: &[S]) -> Self {
        self.requirements = edges.iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    /// Register a manifest at `location`.
    #[must_use]
    pub fn with_manifest(mut self, location: impl Into<String>, directives: ManifestDirectives) -> Self {
        self.manifests.insert(location.into(), directives);
        self
    }

    /// Report the working directory as outside any project.
    #[must_use]
    pub fn outside_project(mut self) -> Self {
        self.inside_project = false;
        self
    }

    /// Report the manifest as stale.
    #[must_use]
    pub fn stale(mut self) -> Self {
        self.manifest_current = false;
        self
    }

    /// Make `call` fail with a resolution error.
    #[must_use]
    pub fn failing(mut self, call: FixtureCall) -> Self {
        self.fail_on.insert(call);
        self
    }

    fn check(&self, call: FixtureCall) -> Result<()> {
        if self.fail_on.contains(&call) {
            return Err(ModvetError::resolution(
                format!("fixture call '{call}' configured to fail"),
                file!(),
                line!(),
            ));
        }
        Ok(())
    }
}

/// Parse `to@version`, or a `go mod graph` line `from to@version`.
fn parse_requirement(entry: &str) -> Result<RequirementEdge> {
    let fields: Vec<&str> = entry.split_whitespace().collect();
    match fields.as_slice() {
        [to] => RequirementEdge::parse(to),
        [from, to] => Ok(RequirementEdge::parse(to)?.required_by(ModuleRef::parse(from)?)),
        _ => Err(crate::err!(MalformedEdge {
            edge: entry.to_string(),
            rule: None,
        })),
    }
}

#[async_trait]
impl ResolverClient for FixtureToolchain {
    async fn resolve_build_list(&self, include_upgrades: bool) -> Result<Vec<ResolvedModule>> {
        self.check(FixtureCall::BuildList)?;
        let mut modules = self.modules.clone();
        if !include_upgrades {
            for module in &mut modules {
                module.available_update = None;
            }
        }
        Ok(modules)
    }

    async fn resolve_requirement_graph(&self) -> Result<Vec<RequirementEdge>> {
        self.check(FixtureCall::RequirementGraph)?;
        self.requirements.iter().map(|e| parse_requirement(e)).collect()
    }

    async fn check_manifest_current(&self) -> Result<bool> {
        self.check(FixtureCall::ManifestCurrent)?;
        Ok(self.manifest_current)
    }

    async fn is_inside_project(&self) -> Result<bool> {
        self.check(FixtureCall::InsideProject)?;
        Ok(self.inside_project)
    }
}

#[async_trait]
impl ManifestAccessor for FixtureToolchain {
    async fn read_manifest(&self, location: &str) -> Result<ManifestDirectives> {
        self.check(FixtureCall::ReadManifest)?;
        self.manifests.get(location).cloned().ok_or_else(|| {
            ModvetError::resolution(format!("no manifest at '{location}'"), file!(), line!())
        })
    }
}
