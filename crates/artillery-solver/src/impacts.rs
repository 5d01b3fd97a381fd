//! Observed impacts and the standing fire correction.
//!
//! Only the most recent impact drives the decision. Older impacts are kept
//! for display and never reconsidered.

use std::fmt;

use artillery_core::{CorrectionVector, Point2D};
use artillery_models::SpreadEnvelope;
use serde::{Deserialize, Serialize};

/// What the spotter should tell the guns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    #[default]
    NoImpacts,
    HoldFire,
    Correct { dx: f64, dy: f64 },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::NoImpacts => f.write_str("No impacts yet"),
            Recommendation::HoldFire => f.write_str("Hold fire"),
            Recommendation::Correct { dx, dy } => write!(f, "Correct by ({dx:.1}, {dy:.1})"),
        }
    }
}

/// Result of one recompute pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assessment {
    pub correction: CorrectionVector,
    pub recommendation: Recommendation,
    /// Distance from the last impact to the target, if any impact exists.
    pub miss: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImpactTracker {
    impacts: Vec<Point2D>,
    correction: CorrectionVector,
    recommendation: Recommendation,
}

impl ImpactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an impact without re-evaluating.
    pub fn push(&mut self, point: Point2D) {
        self.impacts.push(point);
    }

    /// Append an impact and re-evaluate against `target`.
    pub fn record_impact(
        &mut self,
        point: Point2D,
        target: Point2D,
        envelope: &SpreadEnvelope,
    ) -> Assessment {
        self.push(point);
        self.recompute(target, envelope)
    }

    /// Judge the last impact against the envelope around `target`.
    ///
    /// Out of envelope: the correction becomes the vector impact → target.
    /// Within: hold fire and leave the standing correction alone.
    pub fn recompute(&mut self, target: Point2D, envelope: &SpreadEnvelope) -> Assessment {
        let Some(&last) = self.impacts.last() else {
            self.correction = CorrectionVector::ZERO;
            self.recommendation = Recommendation::NoImpacts;
            return self.assessment(None);
        };

        let miss = last.distance_to(target);
        if miss > envelope.outer_radius {
            let c = last.vector_to(target);
            if c != self.correction {
                tracing::debug!(dx = c.dx, dy = c.dy, miss, "correction updated");
            }
            self.correction = c;
            self.recommendation = Recommendation::Correct { dx: c.dx, dy: c.dy };
        } else {
            self.recommendation = Recommendation::HoldFire;
        }
        self.assessment(Some(miss))
    }

    /// Drop all impacts and zero the correction.
    pub fn reset(&mut self) {
        self.impacts.clear();
        self.correction = CorrectionVector::ZERO;
        self.recommendation = Recommendation::NoImpacts;
    }

    pub fn impacts(&self) -> &[Point2D] {
        &self.impacts
    }

    pub fn last_impact(&self) -> Option<Point2D> {
        self.impacts.last().copied()
    }

    pub fn correction(&self) -> CorrectionVector {
        self.correction
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    fn assessment(&self, miss: Option<f64>) -> Assessment {
        Assessment {
            correction: self.correction,
            recommendation: self.recommendation,
            miss,
        }
    }
}
