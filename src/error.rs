//! Error taxonomy.
//!
//! Typed errors live here so the library modules can be precise about what
//! went wrong; `main` re-wraps them with `anyhow::Context` at the binary
//! boundary. `ConfigError` covers the configuration tree, `GatewayError`
//! covers the window-manager subprocess, and `Error` is the umbrella the
//! engine and toggles return.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures reading, parsing, or writing the configuration tree.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file (or a subtree) could not be parsed as TOML.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A required setting was absent at the given dotted path.
    #[error("required setting `{0}` is missing")]
    Missing(String),

    /// A setting had the wrong type for the given dotted path.
    #[error("setting `{path}` has the wrong type, expected {expected}")]
    Type {
        path: String,
        expected: &'static str,
    },

    /// The config tree could not be serialized back to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config file could not be written.
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures talking to the window-manager subprocess.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The command could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The command ran but exited non-zero.
    #[error("command `{command}` failed with status {status}")]
    Failed {
        command: String,
        status: ExitStatus,
    },

    /// The command's output could not be parsed.
    #[error("failed to parse output of `{command}`: {source}")]
    Parse {
        command: String,
        source: serde_json::Error,
    },
}

/// Umbrella error returned by the engine and toggle controllers.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
