//! CLI command handlers.

pub mod check;
pub mod token;
pub mod upload;

use anyhow::Result;

use crate::config::UploaderConfig;

/// Owner for a run: the `--owner` flag wins, then the configured default.
pub(crate) fn resolve_owner(flag: Option<String>, config: &UploaderConfig) -> Result<String> {
    flag.or_else(|| config.default_owner.clone()).ok_or_else(|| {
        anyhow::anyhow!(
            "Repository owner is required (pass --owner or set default_owner in the config file)"
        )
    })
}
