//! Clients for the host toolchain.
//!
//! Rules never shell out themselves. They see the project only through the
//! two traits defined here:
//!
//! - [`ResolverClient`]: the build list, the requirement graph and the
//!   project-level checks.
//! - [`ManifestAccessor`]: the directives of one module's manifest.
//!
//! [`GoToolchain`] implements both over the `go` command. [`FixtureToolchain`]
//! implements both over fixed data for tests and offline runs.

pub mod fixture;
pub mod go;

pub use fixture::{FixtureCall, FixtureToolchain};
pub use go::GoToolchain;

use crate::error::Result;
use crate::types::{ManifestDirectives, RequirementEdge, ResolvedModule};
use async_trait::async_trait;

/// Resolves the build list of the current project.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResolverClient: Send + Sync {
    /// Resolve the build list, in the order the toolchain reports it.
    ///
    /// `available_update` is only populated when `include_upgrades` is set,
    /// since fetching it may require network access.
    ///
    /// # Errors
    ///
    /// Returns an error if the toolchain call fails or its output is malformed.
    async fn resolve_build_list(&self, include_upgrades: bool) -> Result<Vec<ResolvedModule>>;

    /// Resolve the flattened requirement graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the toolchain call fails or an edge is malformed.
    async fn resolve_requirement_graph(&self) -> Result<Vec<RequirementEdge>>;

    /// Whether the manifest already matches what a build would compute.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not build with or without
    /// manifest updates.
    async fn check_manifest_current(&self) -> Result<bool>;

    /// Whether the working directory is inside a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the toolchain cannot be queried.
    async fn is_inside_project(&self) -> Result<bool>;
}

/// Reads manifest directives by location.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ManifestAccessor: Send + Sync {
    /// Read the manifest at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    async fn read_manifest(&self, location: &str) -> Result<ManifestDirectives>;
}
