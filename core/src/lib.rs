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

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod export;
pub mod link;
pub mod models;
pub mod orchestrator;
pub mod output;

// Re-export key items for convenience
pub use auth::{create_session, SpotifySession, SpotifySessions, SCOPE};
pub use bootstrap::{BootstrapError, BootstrapReport, Bootstrapper};
pub use config::{ConfigError, Registry, SpotifyConfig, UserEntry};
pub use export::{export_for_user, track_pages, ExportError, PlaylistSource};
pub use link::generate_link;
pub use models::{ExportSummary, PlaylistRef, TrackEntry, TrackPage, TrackRecord};
pub use orchestrator::{export_all, run, SessionFactory};
pub use output::{write_csv_file, write_records, CSV_HEADER, DEFAULT_OUTPUT};
