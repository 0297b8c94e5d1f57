//! The resolved build list for one invocation.
//!
//! A [`BuildList`] is built once from the resolver's output and never
//! mutated. It keeps modules in the order the resolver produced them and
//! indexes them by path.

use crate::error::Result;
use crate::types::{RequirementEdge, ResolvedModule};
use std::collections::HashMap;

/// Immutable snapshot of the build list and requirement graph.
#[derive(Debug, Clone, Default)]
pub struct BuildList {
    modules: Vec<ResolvedModule>,
    by_path: HashMap<String, usize>,
    main: Option<usize>,
    requirements: Vec<RequirementEdge>,
}

impl BuildList {
    /// Build the snapshot, enforcing its invariants.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBuildList` if two modules share a path or more than
    /// one module is marked as main.
    pub fn new(modules: Vec<ResolvedModule>, requirements: Vec<RequirementEdge>) -> Result<Self> {
        let mut by_path = HashMap::with_capacity(modules.len());
        let mut main = None;

        for (idx, module) in modules.iter().enumerate() {
            if by_path.insert(module.path.clone(), idx).is_some() {
                return Err(crate::err!(MalformedBuildList {
                    message: format!("module path '{}' appears more than once", module.path),
                }));
            }
            if module.is_main {
                if let Some(prev) = main.replace(idx) {
                    let prev: &ResolvedModule = &modules[prev];
                    return Err(crate::err!(MalformedBuildList {
                        message: format!(
                            "both '{}' and '{}' are marked as the main module",
                            prev.path, module.path
                        ),
                    }));
                }
            }
        }

        tracing::debug!(
            modules = modules.len(),
            requirements = requirements.len(),
            main = main.map(|i| modules[i].path.as_str()).unwrap_or("<none>"),
            "Build list loaded"
        );

        Ok(Self {
            modules,
            by_path,
            main,
            requirements,
        })
    }

    /// Look a module up by path.
    #[must_use]
    pub fn by_path(&self, path: &str) -> Option<&ResolvedModule> {
        self.by_path.get(path).map(|&i| &self.modules[i])
    }

    /// All modules, in resolver order.
    #[must_use]
    pub fn all(&self) -> &[ResolvedModule] {
        &self.modules
    }

    /// The main module, if the build list has one.
    #[must_use]
    pub fn main_module(&self) -> Option<&ResolvedModule> {
        self.main.map(|i| &self.modules[i])
    }

    /// Every module except the main one, in resolver order.
    pub fn dependencies(&self) -> impl Iterator<Item = &ResolvedModule> {
        self.modules.iter().filter(|m| !m.is_main)
    }

    /// Requirement edges, in resolver order.
    #[must_use]
    pub fn requirements(&self) -> &[RequirementEdge] {
        &self.requirements
    }

    /// Number of modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the build list holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
