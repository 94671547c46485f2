use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Everything that turns a request into a 500. The display string is sent
/// to the client as the `message` field.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing env vars: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),

    #[error("Token error: {0}")]
    TokenStatus(u16),

    #[error("Invalid token response")]
    InvalidToken,

    #[error("Recent error: {0}")]
    RecentStatus(u16),

    /// Connection, TLS or body decoding failure, passed through verbatim.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: true,
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ProxyError::MissingEnv(vec!["SPOTIFY_CLIENT_ID", "SPOTIFY_REFRESH_TOKEN"]).to_string(),
            "Missing env vars: SPOTIFY_CLIENT_ID, SPOTIFY_REFRESH_TOKEN"
        );
        assert_eq!(ProxyError::TokenStatus(401).to_string(), "Token error: 401");
        assert_eq!(ProxyError::InvalidToken.to_string(), "Invalid token response");
        assert_eq!(ProxyError::RecentStatus(429).to_string(), "Recent error: 429");
    }

    #[test]
    fn responds_with_500() {
        let resp = ProxyError::InvalidToken.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
