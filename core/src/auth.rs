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

use crate::config::SpotifyConfig;
use crate::export::{ExportError, PlaylistSource};
use crate::models::{PlaylistRef, TrackEntry, TrackPage};
use crate::orchestrator::SessionFactory;
use async_trait::async_trait;
use log::debug;
use rspotify::{
    model::{Page, PlayableItem, PlaylistId, PlaylistItem},
    prelude::*,
    AuthCodeSpotify, Config, Credentials, OAuth,
};
use std::path::Path;
use thiserror::Error;

/// Scope requested for every family member. Read-only playlist access.
pub const SCOPE: &str = "playlist-read-private playlist-read-collaborative";

/// Page size used when listing the user's playlists.
const PLAYLISTS_LIMIT: u32 = 50;
/// Page size used when listing playlist items.
const TRACKS_LIMIT: u32 = 100;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Initializes and authenticates a Spotify client for one family member.
///
/// This function:
/// 1. Uses the credentials and redirect URI from `config`.
/// 2. Requests read access to private and collaborative playlists.
/// 3. Caches the token in `token_cache`, which must be unique per user.
///
/// If the cache holds a valid token it is reused (and refreshed when expired).
/// Otherwise the browser is opened on the consent page and the redirected URL
/// is read from stdin.
pub async fn create_session(
    config: &SpotifyConfig,
    token_cache: &Path,
) -> Result<AuthCodeSpotify, AuthError> {
    let creds = Credentials::new(&config.client_id, &config.client_secret);

    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes: SCOPE.split_whitespace().map(str::to_string).collect(),
        ..Default::default()
    };

    let spotify_config = Config {
        token_cached: true,
        token_refreshing: true,
        cache_path: token_cache.to_path_buf(),
        ..Default::default()
    };

    let spotify = AuthCodeSpotify::with_config(creds, oauth, spotify_config);

    // `show_dialog` makes Spotify ask who is logging in, so a browser that is
    // already signed in as one family member does not silently reuse them.
    let url = spotify.get_authorize_url(true)?;

    debug!("Using token cache {}", token_cache.display());
    spotify.prompt_for_token(&url).await?;

    Ok(spotify)
}

/// An authenticated Spotify client bound to one user.
pub struct SpotifySession {
    spotify: AuthCodeSpotify,
}

impl SpotifySession {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        Self { spotify }
    }
}

fn to_track_entry(item: PlaylistItem) -> Option<TrackEntry> {
    match item.track {
        Some(PlayableItem::Track(track)) => Some(TrackEntry {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.name,
        }),
        // Removed tracks come back as null; episodes have no artist or album.
        _ => None,
    }
}

/// Converts a page of playlist items, turning Spotify's `next` URL into the
/// offset of the following page.
fn to_track_page(page: Page<PlaylistItem>) -> TrackPage {
    let next = page.next.as_ref().map(|_| page.offset + page.limit);
    let items = page.items.into_iter().map(to_track_entry).collect();

    TrackPage { items, next }
}

#[async_trait]
impl PlaylistSource for SpotifySession {
    async fn display_name(&self) -> Result<String, ExportError> {
        let user = self.spotify.current_user().await?;
        Ok(user.display_name.unwrap_or_else(|| user.id.id().to_string()))
    }

    async fn playlists(&self) -> Result<Vec<PlaylistRef>, ExportError> {
        // Only the first page is read; accounts with more playlists are truncated.
        let page = self
            .spotify
            .current_user_playlists_manual(Some(PLAYLISTS_LIMIT), Some(0))
            .await?;

        Ok(page
            .items
            .into_iter()
            .map(|pl| PlaylistRef {
                id: pl.id.id().to_string(),
                name: pl.name,
            })
            .collect())
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        offset: u32,
    ) -> Result<TrackPage, ExportError> {
        let id = PlaylistId::from_id(playlist_id)
            .map_err(|_| ExportError::InvalidPlaylistId(playlist_id.to_string()))?;

        let page = self
            .spotify
            .playlist_items_manual(id, None, None, Some(TRACKS_LIMIT), Some(offset))
            .await?;

        Ok(to_track_page(page))
    }
}

/// Opens one [`SpotifySession`] per token cache with shared app credentials.
pub struct SpotifySessions {
    config: SpotifyConfig,
}

impl SpotifySessions {
    pub fn new(config: SpotifyConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for SpotifySessions {
    type Session = SpotifySession;

    async fn create_session(&self, token_cache: &Path) -> Result<SpotifySession, ExportError> {
        let spotify = create_session(&self.config, token_cache).await?;
        Ok(SpotifySession::new(spotify))
    }
}
