// End-to-end session checks: target + teams + impacts through the public API.
// Asserts the worked Mortar scenario, hold-fire persistence, and full reset.

use approx::assert_abs_diff_eq;
use artillery_solver::{
    ArtilleryCatalog, ArtilleryProfile, CorrectionVector, Point2D, Polar, Recommendation,
    SessionConfig, SessionState, TeamId,
};

#[test]
fn mortar_scenario_from_field_notes() {
    let mut s = SessionState::with_defaults().unwrap();
    assert_eq!(s.artillery(), "Mortar");

    // Target 500 m due north; team 1 left at the untouched (0, 0) input.
    s.set_target(Polar::new(500.0, 0.0));
    let snap = s.snapshot();
    assert_abs_diff_eq!(snap.target_point.x, 0.0);
    assert_abs_diff_eq!(snap.target_point.y, 500.0);
    // 500 m is past the Mortar band, so spread clamps to spread_max.
    assert_abs_diff_eq!(snap.envelope.outer_radius, 12.0);
    assert_abs_diff_eq!(snap.envelope.inner_radius, 6.0);

    s.record_impact(Point2D::new(50.0, 500.0));
    let snap = s.snapshot();
    assert_eq!(snap.correction, CorrectionVector::new(-50.0, 0.0));
    assert_eq!(snap.recommendation, Recommendation::Correct { dx: -50.0, dy: 0.0 });
    assert_eq!(snap.recommendation_text, "Correct by (-50.0, 0.0)");

    let spotter = snap.spotter_solution.expect("target is set");
    assert_abs_diff_eq!(spotter.distance, 502.49, epsilon = 5e-3);
    assert_abs_diff_eq!(spotter.azimuth_deg, 354.3, epsilon = 5e-2);
    assert_eq!(snap.spotter_text, "502.5m / 354.3°");

    let team1 = &snap.teams[0];
    assert_eq!(team1.solution, None, "untouched team must not get a solution");
    assert_eq!(team1.solution_text, "-- / --");
}

#[test]
fn degenerate_team_position_still_solves() {
    let mut s = SessionState::with_defaults().unwrap();
    s.set_target(Polar::new(300.0, 30.0));
    s.record_impact(Point2D::new(0.0, 0.0));

    s.set_team_position(TeamId(0), Polar::new(0.0, 90.0)).unwrap();
    let snap = s.snapshot();
    assert_eq!(snap.teams[0].solution, snap.spotter_solution);
    assert!(snap.teams[1].solution.is_none());
}

#[test]
fn hold_fire_keeps_standing_correction() {
    // Custom table: a single gun whose outer spread is exactly 10 m.
    let catalog =
        ArtilleryCatalog::from_profiles([("Test Gun", ArtilleryProfile::new(0.0, 1000.0, 10.0, 10.0))])
            .unwrap();
    let cfg = SessionConfig {
        default_artillery: "Test Gun".into(),
        ..SessionConfig::default()
    };
    let mut s = SessionState::new(cfg, catalog).unwrap();
    s.set_target(Polar::new(200.0, 90.0));
    let target = s.snapshot().target_point;

    // A: 15 m short in x, out of envelope.
    s.record_impact(Point2D::new(target.x - 15.0, target.y));
    let c1 = s.correction();
    assert_abs_diff_eq!(c1.dx, 15.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c1.dy, 0.0, epsilon = 1e-9);

    // B: 5 m off, inside the envelope.
    s.record_impact(Point2D::new(target.x, target.y + 5.0));
    assert_eq!(s.snapshot().recommendation, Recommendation::HoldFire);
    assert_eq!(s.correction(), c1, "hold fire must not touch the correction");
    assert_eq!(s.snapshot().recommendation_text, "Hold fire");

    // C: out of envelope again, only C counts.
    s.record_impact(Point2D::new(target.x, target.y - 40.0));
    let c2 = s.correction();
    assert_abs_diff_eq!(c2.dx, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c2.dy, 40.0, epsilon = 1e-9);
    assert_eq!(s.impacts().len(), 3);
}

#[test]
fn team_solutions_follow_every_input_change() {
    let mut s = SessionState::with_defaults().unwrap();
    s.set_target(Polar::new(70.0, 0.0));
    s.set_team_position(TeamId(1), Polar::new(20.0, 180.0)).unwrap();
    let before = s.snapshot().teams[1].solution.unwrap();
    assert_abs_diff_eq!(before.distance, 90.0, epsilon = 1e-9);
    assert_eq!(s.snapshot().teams[1].within_range, Some(false));

    s.set_target(Polar::new(40.0, 0.0));
    let after = s.snapshot().teams[1].solution.unwrap();
    assert_abs_diff_eq!(after.distance, 60.0, epsilon = 1e-9);
    assert_eq!(s.snapshot().teams[1].within_range, Some(true));

    s.set_range_ring(TeamId(1), true).unwrap();
    assert!(s.snapshot().teams[1].show_range_ring);
}

#[test]
fn reset_impacts_keeps_positions() {
    let mut s = SessionState::with_defaults().unwrap();
    s.set_target(Polar::new(60.0, 10.0));
    s.set_team_position(TeamId(2), Polar::new(15.0, 200.0)).unwrap();
    s.record_impact(Point2D::new(30.0, 30.0));

    s.reset_impacts();
    let snap = s.snapshot();
    assert!(snap.impacts.is_empty());
    assert!(snap.correction.is_zero());
    assert_eq!(snap.recommendation, Recommendation::NoImpacts);
    assert!(snap.target.is_some());
    assert!(snap.teams[2].solution.is_some());
}

#[test]
fn full_reset_returns_to_placeholders() {
    let mut s = SessionState::with_defaults().unwrap();
    s.set_target(Polar::new(60.0, 10.0));
    for i in 0..4 {
        s.set_team_position(TeamId(i), Polar::new(10.0 + i as f64, 45.0)).unwrap();
    }
    s.record_impact(Point2D::new(90.0, 0.0));

    s.full_reset();
    let snap = s.snapshot();
    assert_eq!(snap.target, None);
    assert!(s.teams().iter().all(|t| t.position.is_none()));
    assert!(snap.correction.is_zero());
    assert!(snap.impacts.is_empty());
    assert_eq!(snap.spotter_solution, None);
    assert!(snap.teams.iter().all(|t| t.solution_text == "-- / --"));
}

#[test]
fn snapshot_serializes_for_renderers() {
    let mut s = SessionState::with_defaults().unwrap();
    s.set_target(Polar::new(500.0, 0.0));
    s.record_impact(Point2D::new(50.0, 500.0));
    let json = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(json["recommendation"]["kind"], "correct");
    assert_eq!(json["artillery"], "Mortar");
    assert_eq!(json["teams"].as_array().unwrap().len(), 4);
}
