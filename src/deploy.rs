//! Deploy orchestration: bring a repository's checkout up to date, then
//! rebuild its containers.

use std::time::Duration;

use tracing::info;

use crate::command::{self, CommandSpec};
use crate::error::{DeployError, Result};
use crate::repo::RepoRef;
use crate::{AgentConfig, AppState};

/// Plans the commands for one deploy without touching the filesystem.
///
/// A fresh deploy clones into the owner directory; an existing checkout is
/// fast-forwarded in place. Either way the compose rebuild runs afterwards
/// from the repository directory.
pub fn plan_steps(config: &AgentConfig, repo: &RepoRef, fresh: bool) -> Result<Vec<CommandSpec>> {
    let Some((compose_program, compose_args)) = config.compose_command.split_first() else {
        return Err(DeployError::Config("compose_command is empty".to_string()));
    };

    let repo_dir = repo.repo_dir(&config.repos_root);
    let sync = if fresh {
        CommandSpec::new("git", repo.owner_dir(&config.repos_root))
            .arg("clone")
            .arg(repo.clone_url(&config.clone_base))
    } else {
        CommandSpec::new("git", &repo_dir).arg("pull").arg("--ff-only")
    };

    let rebuild = CommandSpec::new(compose_program, &repo_dir).args(compose_args.iter().cloned());

    Ok(vec![sync, rebuild])
}

/// Runs a full deploy for one repository.
///
/// Deploys for the same repository are serialized on its lock; the
/// clone-or-pull decision is made with the lock held so two concurrent
/// deliveries cannot both decide to clone.
pub async fn deploy(state: &AppState, repo: &RepoRef) -> Result<()> {
    let repo_dir = repo.repo_dir(&state.config.repos_root);
    let lock = state.repo_locks.lock_for(&repo_dir);
    let _guard = lock.lock().await;

    let fresh = !repo_dir.exists();
    if fresh {
        info!(repo = %repo, "target missing, cloning");
        tokio::fs::create_dir_all(repo.owner_dir(&state.config.repos_root)).await?;
    } else {
        info!(repo = %repo, "target present, pulling");
    }

    let timeout = state.config.command_timeout_secs.map(Duration::from_secs);
    for step in plan_steps(&state.config, repo, fresh)? {
        command::run(&step, timeout).await?;
    }

    Ok(())
}
