//! Handle the upload command: collect project files, ensure the remote
//! repository exists, run the batch upload with a progress bar.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{RepoTarget, UploaderConfig};
use crate::github::GithubClient;
use crate::progress::{UploadProgress, UploadStatus};
use crate::project;
use crate::token_store::TokenStore;
use crate::uploader::ProjectUploader;

#[allow(clippy::too_many_arguments)]
pub async fn handle(
    path: &Path,
    owner: Option<String>,
    repo: String,
    token: Option<String>,
    description: Option<String>,
    save_token: bool,
    config: &UploaderConfig,
    store: &dyn TokenStore,
) -> Result<()> {
    let token = super::token::resolve(token, store)?;
    let owner = super::resolve_owner(owner, config)?;
    let target = RepoTarget::new(owner, repo, token)?;

    let files = project::collect_files(path)?;
    if files.is_empty() {
        anyhow::bail!("No files to upload in {:?}", path);
    }

    if save_token {
        store.save(&target.token)?;
    }

    println!(
        "Uploading {} file(s) from {:?} to {}/{}",
        files.len(),
        path,
        target.owner,
        target.repo
    );

    let client = GithubClient::with_api_url(&config.api_url, &target.token);
    let uploader = ProjectUploader::new(client, &target.owner, &target.repo)
        .with_delay(Duration::from_millis(config.file_delay_ms));

    let description = description.unwrap_or_else(|| config.default_description.clone());
    if let Some(info) = uploader.ensure_repo(&description).await? {
        println!("Created repository {}", info.full_name);
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
            .expect("Failed to create progress template")
            .progress_chars("█▓░"),
    );

    let mut sink = |event: UploadProgress| match event.status {
        UploadStatus::Uploading => {
            bar.set_position((event.current - 1) as u64);
            bar.set_message(event.message);
        }
        UploadStatus::Success => {
            bar.set_position(event.total as u64);
            bar.finish_with_message(event.message);
        }
        UploadStatus::Error => {
            bar.abandon_with_message(event.message);
        }
    };
    uploader.upload_all(&files, &mut sink).await?;

    println!("Project uploaded: {}", uploader.repo_url());
    Ok(())
}
