/*
    family-playlist-export | Rust CLI tool to export family playlists with Qobuz links.
    Copyright (C) 2025  The family-playlist-export contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Prefix used by the `.env` files of the first version of this tool.
const LEGACY_PREFIX: &str = "SPOTIPY_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing Spotify credential {0}. Check your .env file.")]
    MissingVar(&'static str),
    #[error("Failed to read user registry '{path}': {source}")]
    RegistryRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid user registry: {0}")]
    RegistryParse(#[from] serde_json::Error),
    #[error("User registry is empty")]
    EmptyRegistry,
    #[error("Username '{0}' is listed more than once")]
    DuplicateUsername(String),
    #[error("Token cache '{0}' is shared by more than one user")]
    DuplicateTokenCache(PathBuf),
}

/// Spotify application credentials.
///
/// Loaded once at startup and handed to the session factory.
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl SpotifyConfig {
    /// Reads `CLIENT_ID`, `CLIENT_SECRET` and `REDIRECT_URI` through `lookup`.
    ///
    /// Each variable may also carry the `SPOTIPY_` prefix; the bare name wins
    /// when both are set. Empty values are treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| {
                    lookup(format!("{}{}", LEGACY_PREFIX, key).as_str()).filter(|v| !v.trim().is_empty())
                })
                .ok_or(ConfigError::MissingVar(key))
        };

        Ok(Self {
            client_id: read("CLIENT_ID")?,
            client_secret: read("CLIENT_SECRET")?,
            redirect_uri: read("REDIRECT_URI")?,
        })
    }

    /// First six characters of the client id, safe to print.
    pub fn masked_client_id(&self) -> String {
        let visible: String = self.client_id.chars().take(6).collect();
        format!("{}...", visible)
    }
}

impl fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.masked_client_id())
            .field("client_secret", &"<hidden>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// A family member and the file holding their cached token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub token_cache: PathBuf,
}

impl UserEntry {
    pub fn new(username: &str, token_cache: impl Into<PathBuf>) -> Self {
        Self {
            username: username.to_string(),
            token_cache: token_cache.into(),
        }
    }
}

/// Ordered list of users to export. Usernames and token caches are unique.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<UserEntry>,
}

impl Registry {
    pub fn new(entries: Vec<UserEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let mut usernames = HashSet::new();
        let mut caches = HashSet::new();
        for entry in &entries {
            if !usernames.insert(entry.username.as_str()) {
                return Err(ConfigError::DuplicateUsername(entry.username.clone()));
            }
            if !caches.insert(cache_key(&entry.token_cache)) {
                return Err(ConfigError::DuplicateTokenCache(entry.token_cache.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The two accounts of the household.
    pub fn family() -> Self {
        Self {
            entries: vec![
                UserEntry::new("micah", "micah_token.json"),
                UserEntry::new("partner", "clare_token.json"),
            ],
        }
    }

    /// Parses a JSON array of `{"username": ..., "token_cache": ...}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<UserEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::RegistryRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn entries(&self) -> &[UserEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Token cache path with `.` components dropped, so `a.json` and `./a.json`
/// compare equal.
fn cache_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_loads_all_credentials() {
        let config = SpotifyConfig::from_lookup(lookup_from(&[
            ("CLIENT_ID", "abcdef123456"),
            ("CLIENT_SECRET", "s3cr3t"),
            ("REDIRECT_URI", "http://127.0.0.1:8888/callback"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "abcdef123456");
        assert_eq!(config.client_secret, "s3cr3t");
        assert_eq!(config.redirect_uri, "http://127.0.0.1:8888/callback");
    }

    #[test]
    fn test_accepts_legacy_prefix() {
        let config = SpotifyConfig::from_lookup(lookup_from(&[
            ("SPOTIPY_CLIENT_ID", "legacy-id"),
            ("SPOTIPY_CLIENT_SECRET", "legacy-secret"),
            ("SPOTIPY_REDIRECT_URI", "http://localhost:8888/callback"),
            ("CLIENT_ID", "bare-id"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "bare-id");
        assert_eq!(config.client_secret, "legacy-secret");
    }

    #[test]
    fn test_each_missing_credential_is_reported() {
        let full = [
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", "secret"),
            ("REDIRECT_URI", "http://localhost/cb"),
        ];

        for skipped in 0..full.len() {
            let partial: Vec<_> = full
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skipped)
                .map(|(_, kv)| *kv)
                .collect();

            match SpotifyConfig::from_lookup(lookup_from(&partial)) {
                Err(ConfigError::MissingVar(key)) => assert_eq!(key, full[skipped].0),
                other => panic!("expected MissingVar, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let result = SpotifyConfig::from_lookup(lookup_from(&[
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", "  "),
            ("REDIRECT_URI", "http://localhost/cb"),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingVar("CLIENT_SECRET"))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = SpotifyConfig {
            client_id: "abcdef123456".to_string(),
            client_secret: "topsecret".to_string(),
            redirect_uri: "http://localhost/cb".to_string(),
        };

        assert_eq!(config.masked_client_id(), "abcdef...");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("123456"));
    }

    #[test]
    fn test_family_registry_order() {
        let registry = Registry::family();
        let names: Vec<_> = registry.entries().iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["micah", "partner"]);
        assert_eq!(
            registry.entries()[1].token_cache,
            PathBuf::from("clare_token.json")
        );
    }

    #[test]
    fn test_registry_from_json() {
        let registry = Registry::from_json_str(
            r#"[
                {"username": "alex", "token_cache": "alex_token.json"},
                {"username": "sam", "token_cache": "tokens/sam.json"}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[1], UserEntry::new("sam", "tokens/sam.json"));
    }

    #[test]
    fn test_registry_rejects_shared_token_cache() {
        let result = Registry::new(vec![
            UserEntry::new("alex", "shared.json"),
            UserEntry::new("sam", "shared.json"),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateTokenCache(_))));
    }

    #[test]
    fn test_registry_rejects_same_cache_spelled_differently() {
        let result = Registry::new(vec![
            UserEntry::new("alex", "a.json"),
            UserEntry::new("sam", "./a.json"),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateTokenCache(path)) if path == Path::new("./a.json")));

        let nested = Registry::new(vec![
            UserEntry::new("alex", "tokens/a.json"),
            UserEntry::new("sam", "./tokens/./a.json"),
        ]);
        assert!(matches!(nested, Err(ConfigError::DuplicateTokenCache(_))));

        assert!(Registry::new(vec![
            UserEntry::new("alex", "a.json"),
            UserEntry::new("sam", "tokens/a.json"),
        ])
        .is_ok());
    }

    #[test]
    fn test_registry_rejects_duplicate_username_and_empty_list() {
        let dup = Registry::new(vec![
            UserEntry::new("alex", "a.json"),
            UserEntry::new("alex", "b.json"),
        ]);
        assert!(matches!(dup, Err(ConfigError::DuplicateUsername(name)) if name == "alex"));

        assert!(matches!(Registry::new(vec![]), Err(ConfigError::EmptyRegistry)));
        assert!(matches!(
            Registry::from_json_str("{not json"),
            Err(ConfigError::RegistryParse(_))
        ));
    }
}
