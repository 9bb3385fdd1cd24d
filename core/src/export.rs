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

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::models::{PlaylistRef, TrackPage, TrackRecord};
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("Invalid Playlist ID: {0}")]
    InvalidPlaylistId(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read access to one user's playlists.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Name shown in progress messages. Not exported.
    async fn display_name(&self) -> Result<String, ExportError>;

    /// First page of the user's playlists.
    async fn playlists(&self) -> Result<Vec<PlaylistRef>, ExportError>;

    /// Page of playlist items starting at `offset`.
    async fn playlist_tracks(&self, playlist_id: &str, offset: u32)
        -> Result<TrackPage, ExportError>;
}

/// Lazily walks the pages of a playlist, yielding one batch of records per page.
///
/// Null track references are dropped. The stream ends after the first page
/// without a `next` offset.
pub fn track_pages<'a, S>(
    source: &'a S,
    username: &'a str,
    playlist: &'a PlaylistRef,
) -> impl Stream<Item = Result<Vec<TrackRecord>, ExportError>> + 'a
where
    S: PlaylistSource + ?Sized,
{
    stream::try_unfold(Some(0u32), move |cursor| async move {
        let offset = match cursor {
            Some(offset) => offset,
            None => return Ok::<_, ExportError>(None),
        };

        let page = source.playlist_tracks(&playlist.id, offset).await?;
        debug!(
            "Playlist '{}' offset {}: {} items, next {:?}",
            playlist.name,
            offset,
            page.items.len(),
            page.next
        );

        let batch: Vec<TrackRecord> = page
            .items
            .into_iter()
            .flatten()
            .map(|track| TrackRecord::new(username, &playlist.name, track))
            .collect();

        Ok(Some((batch, page.next)))
    })
}

/// Exports every track of every playlist on the user's first playlist page.
///
/// Records are returned in traversal order: playlist listing order, then page
/// order, then in-page order.
pub async fn export_for_user<S>(source: &S, username: &str) -> Result<Vec<TrackRecord>, ExportError>
where
    S: PlaylistSource + ?Sized,
{
    let display_name = source.display_name().await?;
    info!("Exporting playlists for {} ({})", display_name, username);

    let playlists = source.playlists().await?;
    info!("{} playlists found for {}", playlists.len(), username);

    let mut records = Vec::new();
    for playlist in &playlists {
        info!("Fetching tracks from playlist: {}", playlist.name);

        let mut pages = std::pin::pin!(track_pages(source, username, playlist));
        while let Some(batch) = pages.try_next().await? {
            records.extend(batch);
        }
    }

    info!("{} tracks exported for {}", records.len(), username);
    Ok(records)
}
