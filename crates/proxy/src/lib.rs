#![deny(unsafe_code)]
//! Server-side proxy for the "recently played" widget.
//!
//! `GET /api/spotify/recent` trades a stored refresh token for an access
//! token, asks the music API for the last played track and returns a small
//! camelCase JSON object. Failures come back as `500 {error: true, message}`.
//! Secrets are never logged.

pub mod error;
pub mod secrets;
pub mod track;
pub mod upstream;

pub use error::{ErrorBody, ProxyError};
pub use secrets::{Credentials, EnvSecrets, SecretSource, StaticSecrets};
pub use track::RecentTrack;
pub use upstream::Endpoints;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use core::future::Future;
use std::{sync::Arc, time::Instant};
use tokio::net::TcpListener;

/// Shared by every request.
pub struct AppState {
    pub client: reqwest::Client,
    pub endpoints: Endpoints,
    pub secrets: Arc<dyn SecretSource>,
}

impl AppState {
    pub fn new(secrets: Arc<dyn SecretSource>, endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
            secrets,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/spotify/recent", get(recent))
        .route("/health", get(|| async {}))
        .with_state(state)
}

/// Serves until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await;
    match &result {
        Ok(()) => tracing::debug!("proxy shutdown successful"),
        Err(e) => tracing::error!(?e, "proxy shutdown error"),
    }
    result
}

async fn fetch(state: &AppState) -> Result<RecentTrack, ProxyError> {
    let creds = Credentials::load(state.secrets.as_ref())?;
    let token = upstream::access_token(&state.client, &state.endpoints, &creds).await?;
    upstream::recent_track(&state.client, &state.endpoints, &token).await
}

async fn recent(State(state): State<Arc<AppState>>) -> Response {
    let start = Instant::now();
    tracing::debug!("recent track requested");
    match fetch(&state).await {
        Ok(track) => {
            let total_ms = start.elapsed().as_millis() as u64;
            tracing::info!(total_ms, track = %track.track_name, "recent track served");
            (StatusCode::OK, Json(track)).into_response()
        },
        Err(e) => {
            let total_ms = start.elapsed().as_millis() as u64;
            tracing::error!(total_ms, error = %e, "recent track failed");
            e.into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::Form,
        http::{header, HeaderMap, Request},
        routing::post,
    };
    use serde_json::{json, Value};
    use std::{collections::HashMap, net::SocketAddr};
    use tower::ServiceExt;

    fn full_secrets() -> Arc<dyn SecretSource> {
        Arc::new(
            StaticSecrets::new()
                .with(secrets::CLIENT_ID, "id")
                .with(secrets::CLIENT_SECRET, "secret")
                .with(secrets::REFRESH_TOKEN, "refresh"),
        )
    }

    fn state_for(secrets: Arc<dyn SecretSource>, addr: SocketAddr) -> Arc<AppState> {
        Arc::new(AppState {
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            endpoints: Endpoints {
                token_url: format!("http://{addr}/token"),
                recent_url: format!("http://{addr}/recent"),
            },
            secrets,
        })
    }

    async fn spawn(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn get_recent(state: Arc<AppState>) -> (StatusCode, Value) {
        let resp = router(state)
            .oneshot(Request::builder().uri("/api/spotify/recent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn token_ok(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
        let basic = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !basic.starts_with("Basic ")
            || form.get("grant_type").map(String::as_str) != Some("refresh_token")
            || form.get("refresh_token").map(String::as_str) != Some("refresh")
        {
            return StatusCode::BAD_REQUEST.into_response();
        }
        Json(json!({"access_token": "tok", "token_type": "Bearer"})).into_response()
    }

    async fn recent_ok(headers: HeaderMap) -> Response {
        let bearer = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        if bearer != Some("Bearer tok") {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!({"items": [{
            "played_at": "2024-05-01T10:00:00Z",
            "track": {
                "name": "Sakura",
                "artists": [{"name": "Ikimono"}, {"name": "Gakari"}],
                "album": {"images": [{"url": "https://img/a"}]},
                "external_urls": {"spotify": "https://open/t"}
            }
        }]}))
        .into_response()
    }

    #[tokio::test]
    async fn missing_env_is_500() {
        // Unreachable upstream: the request must fail before any network call.
        let state = state_for(Arc::new(StaticSecrets::new()), "127.0.0.1:9".parse().unwrap());
        let (status, body) = get_recent(state).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], true);
        assert_eq!(
            body["message"],
            "Missing env vars: SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET, SPOTIFY_REFRESH_TOKEN"
        );
    }

    #[tokio::test]
    async fn serves_latest_track() {
        let upstream = Router::new()
            .route("/token", post(token_ok))
            .route("/recent", get(recent_ok));
        let addr = spawn(upstream).await;
        let (status, body) = get_recent(state_for(full_secrets(), addr)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "trackName": "Sakura",
                "artistName": "Ikimono, Gakari",
                "imageUrl": "https://img/a",
                "trackUrl": "https://open/t",
                "playedAt": "2024-05-01T10:00:00Z"
            })
        );
    }

    #[tokio::test]
    async fn token_failure_status_is_reported() {
        let upstream = Router::new().route(
            "/token",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad client") }),
        );
        let addr = spawn(upstream).await;
        let (status, body) = get_recent(state_for(full_secrets(), addr)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Token error: 401");
    }

    #[tokio::test]
    async fn token_without_access_token_is_invalid() {
        let upstream = Router::new().route(
            "/token",
            post(|| async { Json(json!({"token_type": "Bearer"})) }),
        );
        let addr = spawn(upstream).await;
        let (_, body) = get_recent(state_for(full_secrets(), addr)).await;
        assert_eq!(body["message"], "Invalid token response");
    }

    #[tokio::test]
    async fn recent_failure_status_is_reported() {
        let upstream = Router::new()
            .route("/token", post(token_ok))
            .route("/recent", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let addr = spawn(upstream).await;
        let (status, body) = get_recent(state_for(full_secrets(), addr)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Recent error: 503");
    }

    #[tokio::test]
    async fn health() {
        let state = state_for(full_secrets(), "127.0.0.1:9".parse().unwrap());
        let resp = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
