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

use crate::link::generate_link;
use serde::Serialize;
use std::path::PathBuf;

/// A playlist as listed on the first page of the user's playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

/// A resolved track inside a playlist page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
}

impl TrackEntry {
    /// Name of the first listed artist. Co-artists are not exported.
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }
}

/// One page of playlist items.
///
/// `None` items are entries whose track reference is null (removed from the
/// catalog) or that are not tracks at all. `next` is the offset of the
/// following page, if there is one.
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<Option<TrackEntry>>,
    pub next: Option<u32>,
}

/// One exported CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRecord {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Playlist")]
    pub playlist: String,
    #[serde(rename = "Track")]
    pub track: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Album")]
    pub album: String,
    #[serde(rename = "Qobuz_Search_Link")]
    pub search_link: String,
}

impl TrackRecord {
    pub fn new(user: &str, playlist: &str, track: TrackEntry) -> Self {
        let artist = track.primary_artist().to_string();
        let search_link = generate_link(&track.name, &artist);

        Self {
            user: user.to_string(),
            playlist: playlist.to_string(),
            track: track.name,
            artist,
            album: track.album,
            search_link,
        }
    }
}

/// Result of a completed export run.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub users: usize,
    pub records: usize,
    pub output: PathBuf,
}
