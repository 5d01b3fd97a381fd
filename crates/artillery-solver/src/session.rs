//! Session orchestration.
//!
//! `SessionState` owns every input (target, teams, artillery selection,
//! impacts) and the derived [`Snapshot`]. Each mutating call finishes with a
//! full recompute, so a snapshot is never built from mixed inputs.

use std::fmt;

use artillery_core::{finite_or_zero, format_solution, CorrectionVector, Point2D, Polar};
use artillery_models::{ArtilleryCatalog, ArtilleryProfile, SpreadEnvelope};
use serde::{Deserialize, Serialize};

use crate::{
    config::SessionConfig,
    engine,
    error::SessionError,
    impacts::{ImpactTracker, Recommendation},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub usize);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A gun team. `position` is `None` until the team reports in.
#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub position: Option<Polar>,
    pub show_range_ring: bool,
}

/// One team as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamView {
    pub id: TeamId,
    pub name: String,
    pub position: Option<Polar>,
    pub point: Option<Point2D>,
    pub solution: Option<Polar>,
    pub solution_text: String,
    /// Whether the solution distance is inside the weapon's usable band.
    pub within_range: Option<bool>,
    pub show_range_ring: bool,
}

/// Everything the renderer needs after one update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub artillery: String,
    pub profile: ArtilleryProfile,
    pub target: Option<Polar>,
    pub target_point: Point2D,
    pub envelope: SpreadEnvelope,
    pub correction: CorrectionVector,
    pub recommendation: Recommendation,
    pub recommendation_text: String,
    pub spotter_solution: Option<Polar>,
    pub spotter_text: String,
    pub teams: Vec<TeamView>,
    /// Impacts in recorded order; labels are 1-based positions.
    pub impacts: Vec<Point2D>,
    pub display_scale: f64,
    pub axis_limit: f64,
}

#[derive(Clone, Debug)]
pub struct SessionState {
    config: SessionConfig,
    catalog: ArtilleryCatalog,
    artillery: String,
    profile: ArtilleryProfile,
    target: Option<Polar>,
    teams: Vec<Team>,
    tracker: ImpactTracker,
    snapshot: Snapshot,
}

impl SessionState {
    /// Start a session with `config.team_count` empty teams and the
    /// configured default artillery type.
    pub fn new(config: SessionConfig, catalog: ArtilleryCatalog) -> Result<Self, SessionError> {
        config.validate()?;
        let profile = *catalog.get(&config.default_artillery)?;
        let artillery = config.default_artillery.clone();
        let teams = (0..config.team_count)
            .map(|i| Team {
                id: TeamId(i),
                name: format!("Team {}", i + 1),
                position: None,
                show_range_ring: false,
            })
            .collect();

        let mut session = Self {
            snapshot: Snapshot {
                artillery: artillery.clone(),
                profile,
                target: None,
                target_point: Point2D::ORIGIN,
                envelope: SpreadEnvelope::default(),
                correction: CorrectionVector::ZERO,
                recommendation: Recommendation::NoImpacts,
                recommendation_text: String::new(),
                spotter_solution: None,
                spotter_text: String::new(),
                teams: Vec::new(),
                impacts: Vec::new(),
                display_scale: config.baseline_scale,
                axis_limit: config.baseline_scale * config.axis_margin,
            },
            config,
            catalog,
            artillery,
            profile,
            target: None,
            teams,
            tracker: ImpactTracker::new(),
        };
        session.recompute_all();
        Ok(session)
    }

    /// Default config and the built-in artillery table.
    pub fn with_defaults() -> Result<Self, SessionError> {
        Self::new(SessionConfig::default(), ArtilleryCatalog::builtin())
    }

    /* ------------------------------ inputs ------------------------------ */

    /// Set the spotter → target observation. `(0, 0)` clears the target and
    /// solutions fall back to the origin.
    pub fn set_target(&mut self, obs: Polar) {
        self.target = sanitize(obs).in_play();
        self.recompute_all();
    }

    /// Set a team's observed position. `(0, 0)` takes the team out of play.
    pub fn set_team_position(&mut self, id: TeamId, obs: Polar) -> Result<(), SessionError> {
        self.team_mut(id)?.position = sanitize(obs).in_play();
        self.recompute_all();
        Ok(())
    }

    pub fn set_range_ring(&mut self, id: TeamId, show: bool) -> Result<(), SessionError> {
        self.team_mut(id)?.show_range_ring = show;
        self.recompute_all();
        Ok(())
    }

    /// Register another team, initially not in play.
    pub fn add_team(&mut self, name: impl Into<String>) -> TeamId {
        let id = TeamId(self.teams.len());
        self.teams.push(Team {
            id,
            name: name.into(),
            position: None,
            show_range_ring: false,
        });
        self.recompute_all();
        id
    }

    /// Select an artillery type by name. Unknown names are rejected and the
    /// current selection is kept.
    pub fn set_artillery_type(&mut self, name: &str) -> Result<(), SessionError> {
        let profile = *self.catalog.get(name)?;
        if name != self.artillery {
            tracing::info!(from = %self.artillery, to = name, "artillery type changed");
            if self.config.reset_impacts_on_type_change && !self.tracker.impacts().is_empty() {
                tracing::info!(dropped = self.tracker.impacts().len(), "impacts cleared for new artillery type");
                self.tracker.reset();
            }
        }
        self.artillery = name.to_string();
        self.profile = profile;
        self.recompute_all();
        Ok(())
    }

    /// Record an observed impact in the spotter frame. Non-finite points are
    /// dropped.
    pub fn record_impact(&mut self, point: Point2D) {
        if point.x.is_finite() && point.y.is_finite() {
            self.tracker.push(point);
        } else {
            tracing::warn!(x = point.x, y = point.y, "ignoring non-finite impact");
        }
        self.recompute_all();
    }

    /// Clear impacts and the correction; positions are kept.
    pub fn reset_impacts(&mut self) {
        tracing::info!(dropped = self.tracker.impacts().len(), "impacts reset");
        self.tracker.reset();
        self.recompute_all();
    }

    /// Clear impacts, the correction, the target and every team position.
    pub fn full_reset(&mut self) {
        tracing::info!("full reset");
        self.tracker.reset();
        self.target = None;
        for team in &mut self.teams {
            team.position = None;
        }
        self.recompute_all();
    }

    /* ----------------------------- recompute ----------------------------- */

    /// Rebuild the snapshot from current inputs: spread envelope, then the
    /// impact assessment, then every firing solution.
    pub fn recompute_all(&mut self) -> &Snapshot {
        let target_point = self.target.map_or(Point2D::ORIGIN, Polar::to_cartesian);
        let target_distance = self.target.map_or(0.0, |t| t.distance);
        let envelope = self.profile.spread_at(target_distance);

        let assessment = self.tracker.recompute(target_point, &envelope);
        let correction = assessment.correction;

        // An unset target still anchors solutions at the origin once impacts
        // exist; only a fully empty plot shows placeholders.
        let spotter_solution = (self.target.is_some() || !self.tracker.impacts().is_empty())
            .then(|| engine::spotter_solution(target_point, correction));

        let teams: Vec<TeamView> = self
            .teams
            .iter()
            .map(|team| {
                let solution = engine::team_solution_for(target_point, team.position, correction);
                TeamView {
                    id: team.id,
                    name: team.name.clone(),
                    position: team.position,
                    point: team.position.map(Polar::to_cartesian),
                    solution,
                    solution_text: format_solution(solution),
                    within_range: solution.map(|s| self.profile.in_range(s.distance)),
                    show_range_ring: team.show_range_ring,
                }
            })
            .collect();

        let display_scale = teams
            .iter()
            .filter_map(|t| t.point)
            .chain(self.tracker.impacts().iter().copied())
            .chain(self.target.map(|_| target_point))
            .map(Point2D::max_abs)
            .fold(self.config.baseline_scale, f64::max);

        tracing::debug!(
            teams = teams.iter().filter(|t| t.solution.is_some()).count(),
            impacts = self.tracker.impacts().len(),
            recommendation = %assessment.recommendation,
            "recomputed firing solutions"
        );

        self.snapshot = Snapshot {
            artillery: self.artillery.clone(),
            profile: self.profile,
            target: self.target,
            target_point,
            envelope,
            correction,
            recommendation: assessment.recommendation,
            recommendation_text: assessment.recommendation.to_string(),
            spotter_solution,
            spotter_text: format_solution(spotter_solution),
            teams,
            impacts: self.tracker.impacts().to_vec(),
            display_scale,
            axis_limit: display_scale * self.config.axis_margin,
        };
        &self.snapshot
    }

    /* ----------------------------- accessors ----------------------------- */

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ArtilleryCatalog {
        &self.catalog
    }

    pub fn artillery(&self) -> &str {
        &self.artillery
    }

    pub fn target(&self) -> Option<Polar> {
        self.target
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, SessionError> {
        self.teams.get(id.0).ok_or(SessionError::UnknownTeam(id))
    }

    pub fn impacts(&self) -> &[Point2D] {
        self.tracker.impacts()
    }

    pub fn correction(&self) -> CorrectionVector {
        self.tracker.correction()
    }

    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, SessionError> {
        self.teams.get_mut(id.0).ok_or(SessionError::UnknownTeam(id))
    }
}

/// Non-finite values read as 0; negative distances clamp to 0.
fn sanitize(obs: Polar) -> Polar {
    let distance = finite_or_zero(obs.distance);
    if distance < 0.0 {
        tracing::warn!(distance, azimuth = obs.azimuth_deg, "negative distance clamped to 0");
    }
    Polar {
        distance: distance.max(0.0),
        azimuth_deg: finite_or_zero(obs.azimuth_deg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn session() -> SessionState {
        SessionState::with_defaults().unwrap()
    }

    #[test]
    fn fresh_session_is_all_placeholders() {
        let s = session();
        let snap = s.snapshot();
        assert_eq!(snap.teams.len(), 4);
        assert_eq!(snap.spotter_text, "-- / --");
        assert!(snap.teams.iter().all(|t| t.solution.is_none()));
        assert_eq!(snap.recommendation_text, "No impacts yet");
        assert_abs_diff_eq!(snap.display_scale, 100.0);
        assert_abs_diff_eq!(snap.axis_limit, 110.0, epsilon = 1e-9);
    }

    #[test]
    fn unknown_team_is_rejected() {
        let mut s = session();
        let err = s.set_team_position(TeamId(9), Polar::new(10.0, 10.0)).unwrap_err();
        assert!(matches!(err, SessionError::UnknownTeam(TeamId(9))));
    }

    #[test]
    fn unknown_artillery_keeps_selection() {
        let mut s = session();
        let err = s.set_artillery_type("Trebuchet").unwrap_err();
        assert!(matches!(err, SessionError::Configuration(_)));
        assert_eq!(s.artillery(), "Mortar");
    }

    #[test]
    fn bad_default_artillery_fails_construction() {
        let cfg = SessionConfig {
            default_artillery: "Nope".into(),
            ..SessionConfig::default()
        };
        assert!(SessionState::new(cfg, ArtilleryCatalog::builtin()).is_err());
    }

    #[test]
    fn zero_teams_supported() {
        let cfg = SessionConfig {
            team_count: 0,
            ..SessionConfig::default()
        };
        let mut s = SessionState::new(cfg, ArtilleryCatalog::builtin()).unwrap();
        assert!(s.snapshot().teams.is_empty());
        let id = s.add_team("Battery A");
        s.set_target(Polar::new(60.0, 0.0));
        s.set_team_position(id, Polar::new(10.0, 180.0)).unwrap();
        let view = &s.snapshot().teams[0];
        assert_eq!(view.name, "Battery A");
        assert_abs_diff_eq!(view.solution.unwrap().distance, 70.0, epsilon = 1e-9);
        assert_eq!(view.within_range, Some(true));
    }

    #[test]
    fn type_change_clears_impacts_by_default() {
        let mut s = session();
        s.set_target(Polar::new(60.0, 0.0));
        s.record_impact(Point2D::new(40.0, 60.0));
        assert!(!s.correction().is_zero());

        s.set_artillery_type("Gunship").unwrap();
        assert!(s.impacts().is_empty());
        assert!(s.correction().is_zero());
        assert_eq!(s.snapshot().recommendation, Recommendation::NoImpacts);
    }

    #[test]
    fn type_change_can_keep_impacts() {
        let cfg = SessionConfig {
            reset_impacts_on_type_change: false,
            ..SessionConfig::default()
        };
        let mut s = SessionState::new(cfg, ArtilleryCatalog::builtin()).unwrap();
        s.set_target(Polar::new(60.0, 0.0));
        s.record_impact(Point2D::new(40.0, 60.0));
        s.set_artillery_type("Gunship").unwrap();
        assert_eq!(s.impacts().len(), 1);
        assert_eq!(s.snapshot().artillery, "Gunship");
    }

    #[test]
    fn display_scale_tracks_inputs_and_never_drops_below_baseline() {
        let mut s = session();
        s.set_target(Polar::new(500.0, 0.0));
        assert_abs_diff_eq!(s.snapshot().display_scale, 500.0, epsilon = 1e-9);
        s.record_impact(Point2D::new(-650.0, 10.0));
        assert_abs_diff_eq!(s.snapshot().display_scale, 650.0);
        s.full_reset();
        assert_abs_diff_eq!(s.snapshot().display_scale, 100.0);
    }

    #[test]
    fn garbage_numbers_degrade_to_zero() {
        let mut s = session();
        s.set_target(Polar::new(f64::NAN, f64::INFINITY));
        assert_eq!(s.target(), None);
        s.record_impact(Point2D::new(f64::NAN, 1.0));
        assert!(s.impacts().is_empty());
    }

    #[test]
    fn origin_target_still_solves_for_teams_in_play() {
        let mut s = session();
        s.set_team_position(TeamId(0), Polar::new(30.0, 90.0)).unwrap();
        assert_eq!(s.snapshot().spotter_solution, None);
        // Team in play against the origin target before any impact.
        let before = s.snapshot().teams[0].solution.unwrap();
        assert_abs_diff_eq!(before.distance, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(before.azimuth_deg, 270.0, epsilon = 1e-9);

        s.record_impact(Point2D::new(15.0, 0.0));
        let snap = s.snapshot();
        assert_eq!(snap.recommendation, Recommendation::Correct { dx: -15.0, dy: 0.0 });

        let spotter = snap.spotter_solution.unwrap();
        assert_abs_diff_eq!(spotter.distance, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spotter.azimuth_deg, 270.0, epsilon = 1e-9);

        let team = snap.teams[0].solution.unwrap();
        assert_abs_diff_eq!(team.distance, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(team.azimuth_deg, 270.0, epsilon = 1e-9);
        assert_ne!(snap.teams[0].solution_text, "-- / --");
        assert!(snap.teams[1].solution.is_none());
    }

    #[test]
    fn negative_distance_clamps_to_zero() {
        let mut s = session();
        s.set_team_position(TeamId(0), Polar::new(-10.0, 0.0)).unwrap();
        assert_eq!(s.team(TeamId(0)).unwrap().position, None);

        s.set_team_position(TeamId(1), Polar::new(-10.0, 90.0)).unwrap();
        assert_eq!(s.team(TeamId(1)).unwrap().position, Some(Polar::new(0.0, 90.0)));
    }

    #[test]
    fn session_is_send_and_isolated() {
        fn assert_send<T: Send + Sync>() {}
        assert_send::<SessionState>();

        let mut a = session();
        let b = session();
        a.set_target(Polar::new(70.0, 45.0));
        a.record_impact(Point2D::new(0.0, 0.0));
        assert!(b.impacts().is_empty());
        assert_eq!(b.target(), None);
    }
}
