//! Sequential batch upload of project files to a GitHub repository.
//!
//! Files are pushed strictly one at a time, in the given order: each upload
//! is one commit, so interleaved writes to the same branch would race on the
//! parent SHA. The run stops at the first failure and performs no rollback;
//! files already uploaded stay in the repository, and re-running the whole
//! operation is the recovery path.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::github::{GithubApi, RepoInfo};
use crate::progress::{ProgressSink, UploadProgress, UploadStatus};

/// Pause between consecutive file uploads, to stay under the GitHub API
/// rate limit.
pub const DEFAULT_FILE_DELAY: Duration = Duration::from_secs(1);

/// One file to upload: repo-relative path and raw text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Uploads an ordered list of files to one repository.
///
/// The target is fixed for the lifetime of a run; nothing here is mutated
/// while a run is in flight.
pub struct ProjectUploader<A> {
    api: A,
    owner: String,
    repo: String,
    delay: Duration,
}

impl<A: GithubApi> ProjectUploader<A> {
    pub fn new(api: A, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api,
            owner: owner.into(),
            repo: repo.into(),
            delay: DEFAULT_FILE_DELAY,
        }
    }

    /// Override the inter-file delay (tests use zero).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether the target repository exists.
    ///
    /// Any failure of the metadata request (404, bad credentials, network)
    /// reads as `false`; the caller cannot distinguish "missing" from a
    /// transient error here. A spurious `false` surfaces later as a
    /// creation-time name collision.
    pub async fn repo_exists(&self) -> bool {
        match self.api.get_repo(&self.owner, &self.repo).await {
            Ok(info) => {
                tracing::debug!("Repository {} exists", info.full_name);
                true
            }
            Err(err) => {
                tracing::debug!(
                    "Repository check for {}/{} failed: {:#}",
                    self.owner,
                    self.repo,
                    err
                );
                false
            }
        }
    }

    /// Create the repository if the existence check fails.
    ///
    /// Returns `Some(info)` when a repository was created, `None` when it
    /// already existed. Creation targets the user authenticated by the
    /// token, with no initial commit.
    pub async fn ensure_repo(&self, description: &str) -> Result<Option<RepoInfo>> {
        if self.repo_exists().await {
            return Ok(None);
        }
        tracing::info!("Creating repository {}", self.repo);
        let info = self
            .api
            .create_repo(&self.repo, description)
            .await
            .with_context(|| format!("Failed to create repository {}", self.repo))?;
        Ok(Some(info))
    }

    /// Upload all files sequentially, emitting a progress event after every
    /// attempt and a single terminal event at the end of the run.
    ///
    /// The first file-level error aborts the run. Between successful files
    /// the uploader sleeps [`DEFAULT_FILE_DELAY`] (or the override); no
    /// delay is issued after the last file or before an error is reported.
    pub async fn upload_all(
        &self,
        files: &[FileEntry],
        sink: &mut dyn ProgressSink,
    ) -> Result<()> {
        let total = files.len();

        for (i, file) in files.iter().enumerate() {
            sink.emit(UploadProgress {
                current: i + 1,
                total,
                current_file: file.path.clone(),
                status: UploadStatus::Uploading,
                message: format!("Uploading {} ({}/{})", file.path, i + 1, total),
            });

            let message = format!("Add {}", file.path);
            if let Err(err) = self
                .api
                .put_contents(&self.owner, &self.repo, &file.path, &message, &file.content)
                .await
            {
                sink.emit(UploadProgress {
                    current: i + 1,
                    total,
                    current_file: file.path.clone(),
                    status: UploadStatus::Error,
                    message: format!("Failed to upload {}: {:#}", file.path, err),
                });
                return Err(err.context(format!("Failed to upload {}", file.path)));
            }

            if i + 1 < total {
                tokio::time::sleep(self.delay).await;
            }
        }

        sink.emit(UploadProgress {
            current: total,
            total,
            current_file: String::new(),
            status: UploadStatus::Success,
            message: format!(
                "Uploaded {} file(s) to {}/{}",
                total, self.owner, self.repo
            ),
        });
        Ok(())
    }

    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        exists: bool,
        fail_on: Option<String>,
        uploads: Mutex<Vec<(String, String)>>,
        created: Mutex<Vec<String>>,
    }

    fn repo_info(name: &str) -> RepoInfo {
        RepoInfo {
            id: 1,
            name: name.to_string(),
            full_name: format!("alice/{}", name),
            html_url: format!("https://github.com/alice/{}", name),
        }
    }

    #[async_trait]
    impl GithubApi for FakeApi {
        async fn get_repo(&self, _owner: &str, repo: &str) -> Result<RepoInfo> {
            if self.exists {
                Ok(repo_info(repo))
            } else {
                anyhow::bail!("Not Found")
            }
        }

        async fn create_repo(&self, name: &str, _description: &str) -> Result<RepoInfo> {
            self.created.lock().unwrap().push(name.to_string());
            Ok(repo_info(name))
        }

        async fn put_contents(
            &self,
            _owner: &str,
            _repo: &str,
            path: &str,
            message: &str,
            _content: &str,
        ) -> Result<()> {
            if self.fail_on.as_deref() == Some(path) {
                anyhow::bail!("Invalid request: {} rejected", path);
            }
            self.uploads
                .lock()
                .unwrap()
                .push((path.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn uploader(api: FakeApi) -> ProjectUploader<FakeApi> {
        ProjectUploader::new(api, "alice", "demo").with_delay(Duration::ZERO)
    }

    fn files(paths: &[&str]) -> Vec<FileEntry> {
        paths
            .iter()
            .map(|p| FileEntry::new(*p, format!("content of {}", p)))
            .collect()
    }

    #[tokio::test]
    async fn successful_run_emits_one_event_per_file_then_success() {
        let up = uploader(FakeApi::default());
        let files = files(&["a.txt", "b.txt", "c.txt"]);

        let mut events = Vec::new();
        up.upload_all(&files, &mut |p: UploadProgress| events.push(p))
            .await
            .unwrap();

        assert_eq!(events.len(), 4);
        for (i, event) in events[..3].iter().enumerate() {
            assert_eq!(event.status, UploadStatus::Uploading);
            assert_eq!(event.current, i + 1);
            assert_eq!(event.total, 3);
            assert_eq!(event.current_file, files[i].path);
        }
        let last = events.last().unwrap();
        assert_eq!(last.status, UploadStatus::Success);
        assert_eq!(last.current, 3);
        assert_eq!(last.total, 3);
        assert!(last.current_file.is_empty());

        let uploads = up.api.uploads.lock().unwrap();
        let paths: Vec<&str> = uploads.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, ["a.txt", "b.txt", "c.txt"]);
    }

    #[tokio::test]
    async fn commit_message_is_derived_from_path() {
        let up = uploader(FakeApi::default());
        up.upload_all(&files(&["src/lib.rs"]), &mut |_: UploadProgress| {})
            .await
            .unwrap();

        let uploads = up.api.uploads.lock().unwrap();
        assert_eq!(uploads[0].1, "Add src/lib.rs");
    }

    #[tokio::test]
    async fn first_failure_aborts_the_run() {
        let api = FakeApi {
            fail_on: Some("b.txt".to_string()),
            ..Default::default()
        };
        let up = uploader(api);
        let files = files(&["a.txt", "b.txt", "c.txt"]);

        let mut events = Vec::new();
        let result = up
            .upload_all(&files, &mut |p: UploadProgress| events.push(p))
            .await;
        assert!(result.is_err());

        // a.txt uploading, b.txt uploading, b.txt error, nothing for c.txt
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].status, UploadStatus::Uploading);
        assert_eq!(events[1].status, UploadStatus::Uploading);
        assert_eq!(events[2].status, UploadStatus::Error);
        assert_eq!(events[2].current, 2);
        assert_eq!(events[2].current_file, "b.txt");
        assert!(events[2].message.contains("b.txt"));

        let uploads = up.api.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "a.txt");
    }

    #[tokio::test]
    async fn empty_run_emits_single_terminal_event() {
        let up = uploader(FakeApi::default());
        let mut events = Vec::new();
        up.upload_all(&[], &mut |p: UploadProgress| events.push(p))
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, UploadStatus::Success);
        assert_eq!(events[0].current, 0);
        assert_eq!(events[0].total, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn delays_are_issued_between_files_only() {
        let up = ProjectUploader::new(FakeApi::default(), "alice", "demo")
            .with_delay(Duration::from_secs(1));
        let start = tokio::time::Instant::now();
        up.upload_all(&files(&["a.txt", "b.txt", "c.txt"]), &mut |_: UploadProgress| {})
            .await
            .unwrap();
        // three files, two inter-file delays
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn single_file_run_issues_no_delay() {
        let up = ProjectUploader::new(FakeApi::default(), "alice", "demo")
            .with_delay(Duration::from_secs(1));
        let start = tokio::time::Instant::now();
        up.upload_all(&files(&["a.txt"]), &mut |_: UploadProgress| {})
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_file_issues_no_delay() {
        let api = FakeApi {
            fail_on: Some("a.txt".to_string()),
            ..Default::default()
        };
        let up = ProjectUploader::new(api, "alice", "demo").with_delay(Duration::from_secs(1));
        let start = tokio::time::Instant::now();
        let result = up.upload_all(&files(&["a.txt", "b.txt"]), &mut |_: UploadProgress| {}).await;
        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn repo_exists_swallows_check_errors() {
        assert!(!uploader(FakeApi::default()).repo_exists().await);
        let existing = FakeApi {
            exists: true,
            ..Default::default()
        };
        assert!(uploader(existing).repo_exists().await);
    }

    #[tokio::test]
    async fn ensure_repo_creates_only_when_missing() {
        let up = uploader(FakeApi::default());
        let created = up.ensure_repo("demo project").await.unwrap();
        assert_eq!(created.map(|info| info.name), Some("demo".to_string()));
        assert_eq!(*up.api.created.lock().unwrap(), ["demo"]);

        let up = uploader(FakeApi {
            exists: true,
            ..Default::default()
        });
        assert!(up.ensure_repo("demo project").await.unwrap().is_none());
        assert!(up.api.created.lock().unwrap().is_empty());
    }

    #[test]
    fn repo_url_points_at_the_target() {
        let up = uploader(FakeApi::default());
        assert_eq!(up.repo_url(), "https://github.com/alice/demo");
    }
}
