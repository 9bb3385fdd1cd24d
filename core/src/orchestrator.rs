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

use crate::config::{Registry, SpotifyConfig};
use crate::export::{export_for_user, ExportError, PlaylistSource};
use crate::models::{ExportSummary, TrackRecord};
use crate::output::write_csv_file;
use async_trait::async_trait;
use log::info;
use std::path::Path;

/// Opens an authenticated session from a per-user token cache.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: PlaylistSource;

    async fn create_session(&self, token_cache: &Path) -> Result<Self::Session, ExportError>;
}

/// Exports every user of the registry, one after the other, in registry order.
pub async fn export_all<F>(factory: &F, registry: &Registry) -> Result<Vec<TrackRecord>, ExportError>
where
    F: SessionFactory,
{
    let mut all_tracks = Vec::new();

    for user in registry.entries() {
        info!("Logging in for: {}", user.username);

        let session = factory.create_session(&user.token_cache).await?;
        let tracks = export_for_user(&session, &user.username).await?;
        all_tracks.extend(tracks);
    }

    Ok(all_tracks)
}

/// Runs a full export and writes the CSV to `output`.
///
/// Credentials are resolved through `lookup` before `connect` builds the
/// session factory, so a missing credential aborts before any login or API
/// call. The output file is only written once every user has been exported.
pub async fn run<L, C, F>(
    lookup: L,
    registry: &Registry,
    output: &Path,
    connect: C,
) -> Result<ExportSummary, ExportError>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(SpotifyConfig) -> F,
    F: SessionFactory,
{
    let config = SpotifyConfig::from_lookup(lookup)?;

    info!(
        "Environment loaded. Client ID: {} (hidden), Redirect URI: {}",
        config.masked_client_id(),
        config.redirect_uri
    );

    let factory = connect(config);
    let records = export_all(&factory, registry).await?;

    write_csv_file(output, &records)?;
    info!("Wrote {} rows to {}", records.len(), output.display());

    Ok(ExportSummary {
        users: registry.len(),
        records: records.len(),
        output: output.to_path_buf(),
    })
}
