//! Credential lifecycle commands and token resolution.

use anyhow::Result;

use crate::token_store::TokenStore;

/// Resolve the token for a run: explicit flag, then the `GITHUB_TOKEN`
/// environment variable, then the stored credential.
pub fn resolve(flag: Option<String>, store: &dyn TokenStore) -> Result<String> {
    if let Some(token) = flag {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Ok(token);
        }
    }
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Ok(token);
        }
    }
    if let Some(token) = store.load()? {
        return Ok(token);
    }
    anyhow::bail!(
        "No GitHub token available. Pass --token, set GITHUB_TOKEN, or run `ghpush token save <token>`"
    )
}

pub fn save(store: &dyn TokenStore, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Refusing to save an empty token");
    }
    store.save(token)?;
    println!("Token saved");
    Ok(())
}

pub fn show(store: &dyn TokenStore) -> Result<()> {
    match store.load()? {
        Some(token) => println!("Stored token: {}", mask(&token)),
        None => println!("No token stored"),
    }
    Ok(())
}

pub fn clear(store: &dyn TokenStore) -> Result<()> {
    store.clear()?;
    println!("Token cleared");
    Ok(())
}

/// Masked rendering that never reveals the middle of the secret.
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}
