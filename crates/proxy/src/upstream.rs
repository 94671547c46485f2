//! The two upstream calls: refresh-token grant, then recently-played.

use crate::error::ProxyError;
use crate::secrets::Credentials;
use crate::track::RecentTrack;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const RECENT_URL: &str = "https://api.spotify.com/v1/me/player/recently-played?limit=1";

/// Characters of an upstream error body kept in the log.
const PREVIEW_CHARS: usize = 200;

/// Upstream endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub token_url: String,
    pub recent_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.to_string(),
            recent_url: RECENT_URL.to_string(),
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

/// Exchanges the refresh token for an access token.
pub async fn access_token(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    creds: &Credentials,
) -> Result<String, ProxyError> {
    let start = Instant::now();
    let res = client
        .post(&endpoints.token_url)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", creds.refresh_token.as_str()),
        ])
        .send()
        .await?;
    let status = res.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            duration_ms,
            body_preview = %preview(&body),
            "token request failed"
        );
        return Err(ProxyError::TokenStatus(status.as_u16()));
    }
    debug!(status = status.as_u16(), duration_ms, "token request ok");

    let body: Value = res.json().await.map_err(|_| ProxyError::InvalidToken)?;
    body["access_token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(ProxyError::InvalidToken)
}

/// Fetches the latest played track with a bearer token.
pub async fn recent_track(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    token: &str,
) -> Result<RecentTrack, ProxyError> {
    let start = Instant::now();
    let res = client.get(&endpoints.recent_url).bearer_auth(token).send().await?;
    let status = res.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            duration_ms,
            body_preview = %preview(&body),
            "recent request failed"
        );
        return Err(ProxyError::RecentStatus(status.as_u16()));
    }
    debug!(status = status.as_u16(), duration_ms, "recent request ok");

    let body: Value = res.json().await?;
    Ok(RecentTrack::from_recently_played(&body))
}
