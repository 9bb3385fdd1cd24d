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

use crate::export::ExportError;
use crate::models::TrackRecord;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "all_family_spotify_playlists.csv";

/// Column order of the exported CSV.
pub const CSV_HEADER: [&str; 6] = [
    "User",
    "Playlist",
    "Track",
    "Artist",
    "Album",
    "Qobuz_Search_Link",
];

/// Writes the header row followed by one row per record and hands the writer back.
///
/// The header is always written, even when there are no records.
pub fn write_records<W: Write>(writer: W, records: &[TrackRecord]) -> Result<W, ExportError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;

    csv.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Replaces `path` with the CSV rendering of `records`.
///
/// The file is rendered in memory first and written in one go.
pub fn write_csv_file(path: &Path, records: &[TrackRecord]) -> Result<(), ExportError> {
    let buffer = write_records(Vec::new(), records)?;
    fs::write(path, buffer)?;
    Ok(())
}
