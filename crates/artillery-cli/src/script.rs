//! Command scripts: a JSON array of operations replayed against a session.
//!
//! ```json
//! [
//!   { "op": "artillery", "name": "Mortar" },
//!   { "op": "target", "distance": 500, "azimuth": 0 },
//!   { "op": "team", "team": 0, "distance": "35", "azimuth": "270" },
//!   { "op": "impact", "x": 50, "y": 500 }
//! ]
//! ```
//!
//! Numeric fields accept numbers or strings; unparseable strings read as 0.

use std::fmt;

use artillery_core::{LenientNumber, Point2D, Polar};
use artillery_solver::{SessionError, SessionState, TeamId};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Target {
        distance: LenientNumber,
        azimuth: LenientNumber,
    },
    Team {
        team: usize,
        distance: LenientNumber,
        azimuth: LenientNumber,
    },
    RangeRing {
        team: usize,
        show: bool,
    },
    AddTeam {
        name: String,
    },
    Artillery {
        name: String,
    },
    Impact {
        x: LenientNumber,
        y: LenientNumber,
    },
    ResetImpacts,
    FullReset,
}

impl Command {
    pub fn apply(&self, session: &mut SessionState) -> Result<(), SessionError> {
        match self {
            Command::Target { distance, azimuth } => {
                session.set_target(Polar::new(distance.0, azimuth.0));
            }
            Command::Team {
                team,
                distance,
                azimuth,
            } => session.set_team_position(TeamId(*team), Polar::new(distance.0, azimuth.0))?,
            Command::RangeRing { team, show } => session.set_range_ring(TeamId(*team), *show)?,
            Command::AddTeam { name } => {
                session.add_team(name.clone());
            }
            Command::Artillery { name } => session.set_artillery_type(name)?,
            Command::Impact { x, y } => session.record_impact(Point2D::new(x.0, y.0)),
            Command::ResetImpacts => session.reset_impacts(),
            Command::FullReset => session.full_reset(),
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Target { distance, azimuth } => {
                write!(f, "target {:.1}m / {:.1}°", distance.0, azimuth.0)
            }
            Command::Team {
                team,
                distance,
                azimuth,
            } => write!(f, "team {team} at {:.1}m / {:.1}°", distance.0, azimuth.0),
            Command::RangeRing { team, show } => write!(f, "team {team} range ring {show}"),
            Command::AddTeam { name } => write!(f, "add team {name}"),
            Command::Artillery { name } => write!(f, "artillery {name}"),
            Command::Impact { x, y } => write!(f, "impact ({:.1}, {:.1})", x.0, y.0),
            Command::ResetImpacts => f.write_str("reset impacts"),
            Command::FullReset => f.write_str("full reset"),
        }
    }
}

pub fn parse_script(json: &str) -> Result<Vec<Command>, serde_json::Error> {
    serde_json::from_str(json)
}
