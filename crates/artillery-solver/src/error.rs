use std::path::PathBuf;

use artillery_models::ConfigurationError;
use thiserror::Error;

use crate::session::TeamId;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown artillery type or a bad artillery table.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Caller referenced a team that was never registered.
    #[error("no team with id {0}")]
    UnknownTeam(TeamId),
    #[error("invalid session config: {0}")]
    Config(String),
    #[error("failed to read config `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
