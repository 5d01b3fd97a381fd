//! Firing solutions.
//!
//! Pure functions: identical inputs give bit-identical outputs.

use artillery_core::{to_polar, CorrectionVector, Point2D, Polar};

/// Where the spotter should call fire: the target shifted by the correction,
/// as seen from the spotter origin.
pub fn spotter_solution(target: Point2D, correction: CorrectionVector) -> Polar {
    to_polar(target.offset(correction))
}

/// Distance and bearing a team must fire from its own position to land on
/// the corrected target.
pub fn team_solution(target: Point2D, team: Point2D, correction: CorrectionVector) -> Polar {
    to_polar(Point2D {
        x: target.x - team.x + correction.dx,
        y: target.y - team.y + correction.dy,
    })
}

/// Team solution for a possibly-absent team position. `None` means the team
/// is not in play and gets the placeholder.
pub fn team_solution_for(
    target: Point2D,
    team: Option<Polar>,
    correction: CorrectionVector,
) -> Option<Polar> {
    team.map(|pos| team_solution(target, pos.to_cartesian(), correction))
}
