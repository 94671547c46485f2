//! Credential lookup. Secrets are read on every request so a rotated
//! refresh token takes effect without a restart.

use crate::error::ProxyError;
use std::collections::HashMap;

pub const CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN: &str = "SPOTIFY_REFRESH_TOKEN";

/// Where credentials come from.
pub trait SecretSource: Send + Sync {
    /// The value for `name`, or `None` when unset or empty.
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed in-memory secrets.
#[derive(Debug, Default, Clone)]
pub struct StaticSecrets(HashMap<String, String>);

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// The three values needed for a refresh-token grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    /// Reads all three values, naming every missing one in a fixed order.
    pub fn load(source: &dyn SecretSource) -> Result<Self, ProxyError> {
        let client_id = source.get(CLIENT_ID);
        let client_secret = source.get(CLIENT_SECRET);
        let refresh_token = source.get(REFRESH_TOKEN);

        match (client_id, client_secret, refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(Self {
                client_id,
                client_secret,
                refresh_token,
            }),
            (id, secret, token) => {
                let missing = [(CLIENT_ID, id), (CLIENT_SECRET, secret), (REFRESH_TOKEN, token)]
                    .into_iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(ProxyError::MissingEnv(missing))
            }
        }
    }
}

// Never print secret values.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}
