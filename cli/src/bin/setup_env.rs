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

use export_core::bootstrap::{Bootstrapper, EnvState};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut bootstrapper = Bootstrapper::new();
    if let Some(python) = std::env::var_os("PYTHON") {
        bootstrapper = bootstrapper.interpreter(python);
    }

    match bootstrapper.ensure_environment() {
        Ok(report) => {
            if report.env == EnvState::AlreadyPresent {
                log::debug!("Reused existing environment {}", report.env_dir.display());
            }
            println!();
            println!("{}", report);
            println!("[OK] Environment ready!");
            println!("To activate it, run:");
            println!("  {}", report.activation_hint());
        }
        Err(e) => {
            eprintln!();
            eprintln!("[ERROR] Environment setup failed: {}", e);
            process::exit(1);
        }
    }
}
