use serde::{Deserialize, Serialize};

/// Repository metadata returned by the GitHub API.
///
/// Only the fields we use; the API returns many more, so unknown fields are
/// tolerated.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct RepoInfo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
}

/// Error body returned by the GitHub API on non-success responses.
///
/// Defaults to an empty message so a non-JSON body degrades gracefully.
#[derive(Debug, Default, Deserialize)]
pub struct ApiError {
    pub message: Option<String>,
}

/// POST body for creating a repository under the authenticated user.
#[derive(Debug, Serialize)]
pub struct CreateRepoRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
    pub auto_init: bool,
}

/// PUT body for the create-or-update-contents endpoint.
///
/// `content` is the base64 encoding of the file's UTF-8 bytes. Updating an
/// existing path additionally requires the current blob `sha`, which this
/// client never fetches or sends: uploads only reliably create new files,
/// and re-uploading an existing unchanged path may be rejected by the API.
#[derive(Debug, Serialize)]
pub struct PutContentsRequest<'a> {
    pub message: &'a str,
    pub content: String,
}
