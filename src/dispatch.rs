use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{DeployError, Result};
use crate::repo::RepoRef;
use crate::{AppState, deploy};

/// Response body returned once a deploy has completed.
#[derive(Debug, Serialize)]
pub struct DeployAck {
    pub repository: String,
    pub deploy_id: String,
}

/// Routes a verified event to its handler. Only `push` triggers a deploy;
/// every other event type is rejected.
pub async fn handle_event(state: &AppState, event: &str, repo: &RepoRef) -> Result<DeployAck> {
    match event {
        "push" => {
            let deploy_id = Uuid::now_v7().to_string();
            info!(deploy_id = %deploy_id, repo = %repo, "push accepted, deploying");
            deploy::deploy(state, repo).await?;
            info!(deploy_id = %deploy_id, repo = %repo, "deploy finished");
            Ok(DeployAck {
                repository: repo.to_string(),
                deploy_id,
            })
        }
        other => Err(DeployError::UnsupportedEvent(other.to_string())),
    }
}
