//! artillery-solver
//!
//! Spotter-side fire direction for indirect-fire teams.
//! - `impacts`: impact history, standing correction, hold-fire / correct decision.
//! - `engine`: spotter and per-team firing solutions (distance + azimuth).
//! - `session`: owns all inputs and produces a consistent [`Snapshot`] per update.
//! - `config`: session defaults from JSON and `ARTILLERY_*` environment variables.
//!
//! Pipeline on every update:
//!   spread envelope (target distance) → impact assessment → firing solutions
//!
//! Not a ballistic simulator: corrections are planar vector geometry only.

pub mod config;
pub mod engine;
pub mod error;
pub mod impacts;
pub mod session;

pub use artillery_core::{CorrectionVector, Point2D, Polar};
pub use artillery_models::{ArtilleryCatalog, ArtilleryProfile, ConfigurationError, SpreadEnvelope};
pub use config::SessionConfig;
pub use error::SessionError;
pub use impacts::{Assessment, ImpactTracker, Recommendation};
pub use session::{SessionState, Snapshot, Team, TeamId, TeamView};
