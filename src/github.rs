//! GitHub REST API surface: request/response types and the client.

mod client;
mod types;

pub use client::{GithubApi, GithubClient, DEFAULT_API_URL};
pub use types::RepoInfo;
