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

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use export_core::{run, Registry, SpotifySessions, DEFAULT_OUTPUT};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "family-export")]
#[command(
    about = "Exports every family member's Spotify playlists to one CSV with Qobuz search links",
    long_about = None
)]
struct Cli {
    /// JSON file listing users and their token caches
    /// (e.g. [{"username": "micah", "token_cache": "micah_token.json"}]).
    /// Defaults to the built-in family list.
    #[arg(long, value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Where to write the CSV. Overwritten on every run.
    #[arg(long, short = 'o', value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if dotenv().is_err() {
        // Silently ignore
    }

    let cli = Cli::parse();

    if let Err(e) = handle_export(&cli).await {
        eprintln!();
        eprintln!("[ERROR] Export failed: {:#}", e);
        process::exit(1);
    }
}

async fn handle_export(cli: &Cli) -> anyhow::Result<()> {
    let registry = match &cli.registry {
        Some(path) => Registry::load(path)
            .with_context(|| format!("loading registry {}", path.display()))?,
        None => Registry::family(),
    };

    let summary = run(
        |key| std::env::var(key).ok(),
        &registry,
        &cli.output,
        SpotifySessions::new,
    )
    .await?;

    println!();
    println!("---------------------------------------------------");
    println!("EXPORT COMPLETE");
    println!("---------------------------------------------------");
    println!("Users exported: {}", summary.users);
    println!("Tracks written: {}", summary.records);
    println!("---------------------------------------------------");
    println!("[SAVED] Export saved to: {}", summary.output.display());

    Ok(())
}
