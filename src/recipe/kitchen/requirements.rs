// src/recipe/kitchen/requirements.rs

//! Requirement resolution for recipe builds

use crate::error::Result;
use crate::recipe::format::Requirement;

/// Trait for resolving and installing requirements before building
///
/// This allows the Kitchen to remain decoupled from the package installation
/// logic while still being able to ensure requirements are available.
pub trait RequirementResolver: Send + Sync {
    /// Check which requirements are missing
    fn check_missing(&self, reqs: &[Requirement]) -> Result<Vec<Requirement>>;

    /// Install the specified requirements
    ///
    /// Returns the requirements that were actually installed (for later cleanup).
    fn install(&self, reqs: &[Requirement]) -> Result<Vec<Requirement>>;

    /// Uninstall requirements that were installed for a build
    fn cleanup(&self, installed: &[Requirement]) -> Result<()>;
}

/// A no-op resolver that assumes all requirements are satisfied
///
/// Use this when you want to skip resolution entirely
/// (e.g., in a pre-configured build container).
pub struct NoopResolver;

impl RequirementResolver for NoopResolver {
    fn check_missing(&self, _reqs: &[Requirement]) -> Result<Vec<Requirement>> {
        Ok(Vec::new())
    }

    fn install(&self, _reqs: &[Requirement]) -> Result<Vec<Requirement>> {
        Ok(Vec::new())
    }

    fn cleanup(&self, _installed: &[Requirement]) -> Result<()> {
        Ok(())
    }
}

/// Result of requirement resolution
#[derive(Debug, Default, Clone)]
pub struct RequirementsResult {
    /// Requirements that were already installed
    pub already_installed: Vec<Requirement>,
    /// Requirements that were installed for this build
    pub newly_installed: Vec<Requirement>,
    /// Build-only requirements among `newly_installed`, removed after the cook
    pub build_only: Vec<Requirement>,
    /// Requirements that could not be resolved
    pub unresolved: Vec<Requirement>,
}
