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

use log::{debug, info};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

pub const DEFAULT_ENV_DIR: &str = "venv";
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("pip not found in virtual environment: {0}")]
    MissingExecutable(PathBuf),
    #[error("'{program}' exited with {status}")]
    CommandFailed { program: String, status: String },
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Runs external programs on behalf of the bootstrapper.
pub trait CommandRunner {
    fn run(&self, program: &OsStr, args: &[&OsStr]) -> Result<(), BootstrapError>;
}

/// Runs commands with `std::process::Command`, inheriting stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &OsStr, args: &[&OsStr]) -> Result<(), BootstrapError> {
        let name = program.to_string_lossy().into_owned();
        debug!("Running {} {:?}", name, args);

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| BootstrapError::Spawn {
                program: name.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BootstrapError::CommandFailed {
                program: name,
                status: status.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvState {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyState {
    Installed(PathBuf),
    ManifestMissing(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub env_dir: PathBuf,
    pub env: EnvState,
    pub dependencies: DependencyState,
}

impl BootstrapReport {
    /// Shell command that activates the environment.
    pub fn activation_hint(&self) -> String {
        if cfg!(windows) {
            format!("{}\\Scripts\\activate", self.env_dir.display())
        } else {
            format!("source {}/bin/activate", self.env_dir.display())
        }
    }
}

impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = match self.env {
            EnvState::Created => "created",
            EnvState::AlreadyPresent => "already present",
        };
        let deps = match &self.dependencies {
            DependencyState::Installed(m) => format!("installed from {}", m.display()),
            DependencyState::ManifestMissing(m) => format!("skipped ({} not found)", m.display()),
        };
        write!(f, "{} ({}), dependencies {}", self.env_dir.display(), env, deps)
    }
}

/// Creates a Python virtual environment and installs its requirements.
pub struct Bootstrapper<R = SystemRunner> {
    env_dir: PathBuf,
    manifest: PathBuf,
    interpreter: OsString,
    runner: R,
}

impl Bootstrapper<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for Bootstrapper<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Bootstrapper<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            env_dir: PathBuf::from(DEFAULT_ENV_DIR),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            interpreter: default_interpreter(),
            runner,
        }
    }

    pub fn env_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.env_dir = dir.into();
        self
    }

    pub fn manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = path.into();
        self
    }

    pub fn interpreter(mut self, interpreter: impl Into<OsString>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Path of pip inside the environment.
    pub fn installer_path(&self) -> PathBuf {
        installer_path(&self.env_dir)
    }

    /// Brings the environment to a ready state.
    ///
    /// An existing environment directory is left untouched. A missing manifest
    /// skips the install step; a missing pip is an error.
    pub fn ensure_environment(&self) -> Result<BootstrapReport, BootstrapError> {
        let env = self.ensure_env_dir()?;
        let dependencies = self.install_dependencies()?;

        Ok(BootstrapReport {
            env_dir: self.env_dir.clone(),
            env,
            dependencies,
        })
    }

    fn ensure_env_dir(&self) -> Result<EnvState, BootstrapError> {
        if self.env_dir.exists() {
            info!("Virtual environment already exists.");
            return Ok(EnvState::AlreadyPresent);
        }

        info!(
            "Creating virtual environment in '{}'...",
            self.env_dir.display()
        );
        self.runner.run(
            &self.interpreter,
            &[OsStr::new("-m"), OsStr::new("venv"), self.env_dir.as_os_str()],
        )?;
        info!("Created virtual environment {}", self.env_dir.display());

        Ok(EnvState::Created)
    }

    fn install_dependencies(&self) -> Result<DependencyState, BootstrapError> {
        let pip = self.installer_path();
        if !pip.exists() {
            return Err(BootstrapError::MissingExecutable(pip));
        }

        if !self.manifest.exists() {
            info!(
                "No {} found. Skipping dependency installation.",
                self.manifest.display()
            );
            return Ok(DependencyState::ManifestMissing(self.manifest.clone()));
        }

        info!("Installing dependencies from {}...", self.manifest.display());
        self.runner.run(
            pip.as_os_str(),
            &[
                OsStr::new("install"),
                OsStr::new("-r"),
                self.manifest.as_os_str(),
            ],
        )?;

        Ok(DependencyState::Installed(self.manifest.clone()))
    }
}

fn installer_path(env_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        env_dir.join("Scripts").join("pip.exe")
    } else {
        env_dir.join("bin").join("pip")
    }
}

fn default_interpreter() -> OsString {
    if cfg!(windows) {
        OsString::from("python")
    } else {
        OsString::from("python3")
    }
}
