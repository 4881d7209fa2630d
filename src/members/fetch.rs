//! Startup fetch of the member list.
//!
//! The transfer is handed to `curl` so we don't carry a TLS stack of our own.
//! curl prints the body followed by a final line holding the HTTP status,
//! which `split_response` peels off again.

use std::process::Command;
use thiserror::Error;

use super::{dedupe_ids, Member};

/// Default endpoint serving the member list
pub const DEFAULT_SOURCE_URL: &str =
    "https://geektrust.s3-ap-southeast-1.amazonaws.com/adminui-problem/members.json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not run curl: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("fetch task failed: {0}")]
    Task(String),

    #[error("transfer failed (curl exit {code:?}): {stderr}")]
    Transport { code: Option<i32>, stderr: String },

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("unexpected response format")]
    Malformed,

    #[error("payload is not a member list: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Fetch and decode the member list from `url`.
pub async fn fetch_members(url: &str) -> Result<Vec<Member>, FetchError> {
    let url_owned = url.to_string();

    let output = tokio::task::spawn_blocking(move || {
        Command::new("curl")
            .args([
                "-s",  // Silent
                "-S",  // ...but still report transport errors
                "-L",  // Follow redirects
                "-w", "\n%{http_code}",
                url_owned.as_str(),
            ])
            .output()
    })
    .await
    .map_err(|e| FetchError::Task(e.to_string()))??;

    if !output.status.success() {
        return Err(FetchError::Transport {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let (body, status) = split_response(&stdout)?;
    check_status(url, status)?;

    parse_members(body)
}

/// Fetch the member list, logging and swallowing any failure.
/// The table simply starts empty when the source is unreachable.
pub async fn load_members(url: &str) -> Vec<Member> {
    match fetch_members(url).await {
        Ok(members) => {
            tracing::info!("Loaded {} members from {}", members.len(), url);
            members
        }
        Err(e) => {
            tracing::error!("Error fetching data from {}: {}", url, e);
            Vec::new()
        }
    }
}

/// Decode a JSON array of members and enforce unique ids.
pub fn parse_members(body: &str) -> Result<Vec<Member>, FetchError> {
    let members: Vec<Member> = serde_json::from_str(body)?;
    Ok(dedupe_ids(members))
}

/// Split curl output into (body, status code).
fn split_response(stdout: &str) -> Result<(&str, u16), FetchError> {
    let (body, code) = stdout.rsplit_once('\n').ok_or(FetchError::Malformed)?;
    let code = code.trim().parse::<u16>().map_err(|_| FetchError::Malformed)?;
    Ok((body, code))
}

/// Only 200 is accepted, except for `file://` sources where curl reports 0.
fn check_status(url: &str, status: u16) -> Result<(), FetchError> {
    match status {
        200 => Ok(()),
        0 if url.starts_with("file://") => Ok(()),
        other => Err(FetchError::Status(other)),
    }
}
