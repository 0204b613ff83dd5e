//! Handle the check command: report whether the target repository exists.

use anyhow::Result;

use crate::config::{RepoTarget, UploaderConfig};
use crate::github::GithubClient;
use crate::token_store::TokenStore;
use crate::uploader::ProjectUploader;

pub async fn handle(
    owner: Option<String>,
    repo: String,
    token: Option<String>,
    config: &UploaderConfig,
    store: &dyn TokenStore,
) -> Result<()> {
    let token = super::token::resolve(token, store)?;
    let owner = super::resolve_owner(owner, config)?;
    let target = RepoTarget::new(owner, repo, token)?;

    let client = GithubClient::with_api_url(&config.api_url, &target.token);
    let uploader = ProjectUploader::new(client, &target.owner, &target.repo);

    // a failed check is indistinguishable from a missing repository
    if uploader.repo_exists().await {
        println!(
            "Repository {}/{} exists: {}",
            target.owner,
            target.repo,
            uploader.repo_url()
        );
    } else {
        println!(
            "Repository {}/{} was not found (or the check failed)",
            target.owner, target.repo
        );
    }
    Ok(())
}
