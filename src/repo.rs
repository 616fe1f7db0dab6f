use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::DeployError;
use crate::sanitize::is_safe_identifier;

/// A repository owner/name pair that has passed identifier validation.
///
/// Construction is the only way to obtain one, so any `RepoRef` reaching
/// the orchestrator is safe to splice into paths and command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    /// Validates and builds a repository reference.
    ///
    /// Rejects components with characters outside `[A-Za-z0-9._-]`, empty
    /// components, and the `.`/`..` path components.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, DeployError> {
        let owner = owner.into();
        let name = name.into();
        validate_component("owner", &owner)?;
        validate_component("repository name", &name)?;
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical clone URL under `base`, e.g. `https://github.com/alice/demo.git`.
    pub fn clone_url(&self, base: &str) -> String {
        format!(
            "{}/{}/{}.git",
            base.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }

    /// `<root>/<owner>`
    pub fn owner_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.owner)
    }

    /// `<root>/<owner>/<name>`
    pub fn repo_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.owner).join(&self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn validate_component(what: &str, value: &str) -> Result<(), DeployError> {
    if value.is_empty() {
        return Err(DeployError::InvalidPayload(format!("{} is empty", what)));
    }
    // "." and ".." satisfy the grammar but name directories.
    if value == "." || value == ".." {
        return Err(DeployError::InvalidPayload(format!(
            "{} '{}' is a path component",
            what, value
        )));
    }
    if !is_safe_identifier(value) {
        return Err(DeployError::InvalidPayload(format!(
            "{} contains characters outside [A-Za-z0-9._-]",
            what
        )));
    }
    Ok(())
}
