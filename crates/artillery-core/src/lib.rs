//! Core spotter-frame geometry
//!
//! Includes:
//! - Cartesian points and polar observations (distance, azimuth)
//! - Compass-bearing conversion and azimuth normalization
//! - Correction vectors
//! - Lenient numeric input (unparseable text reads as `0.0`)
//!
//! Conventions:
//! - Origin is the spotter. +y is azimuth 0°, azimuth grows clockwise.
//! - `x = d·sin(θ)`, `y = d·cos(θ)`; the inverse uses `atan2(x, y)`.
//! - Output azimuths are always in `[0, 360)`. Input azimuths are not wrapped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text shown in place of a firing solution that cannot be computed.
pub const PLACEHOLDER: &str = "-- / --";

/* ------------------------------- Points ------------------------------- */

/// A point in the spotter's Cartesian frame [m].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other` [m].
    pub fn distance_to(self, other: Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Vector pointing from `self` to `other`.
    pub fn vector_to(self, other: Point2D) -> CorrectionVector {
        CorrectionVector {
            dx: other.x - self.x,
            dy: other.y - self.y,
        }
    }

    /// `self` shifted by a correction.
    pub fn offset(self, c: CorrectionVector) -> Point2D {
        Point2D {
            x: self.x + c.dx,
            y: self.y + c.dy,
        }
    }

    pub fn to_polar(self) -> Polar {
        to_polar(self)
    }

    /// Largest absolute coordinate; used to size the plot around this point.
    pub fn max_abs(self) -> f64 {
        self.x.abs().max(self.y.abs())
    }
}

/* ---------------------------- Corrections ----------------------------- */

/// Offset added to the target to walk fire onto it [m].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionVector {
    pub dx: f64,
    pub dy: f64,
}

impl CorrectionVector {
    pub const ZERO: CorrectionVector = CorrectionVector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(self) -> f64 {
        self.dx.hypot(self.dy)
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

/* ------------------------------- Polar -------------------------------- */

/// Distance [m] and compass azimuth [°] measured from some origin.
///
/// Used both for user-entered observations (spotter → target, spotter → team)
/// and for computed firing solutions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub distance: f64,
    pub azimuth_deg: f64,
}

impl Polar {
    /// The untouched input pair `(0, 0)`, read as "not in play".
    pub const UNSET: Polar = Polar {
        distance: 0.0,
        azimuth_deg: 0.0,
    };

    pub fn new(distance: f64, azimuth_deg: f64) -> Self {
        Self {
            distance,
            azimuth_deg,
        }
    }

    /// True only for the exact `(0, 0)` pair. `(0, 90)` is a real position.
    #[allow(clippy::float_cmp)]
    pub fn is_unset(self) -> bool {
        self.distance == 0.0 && self.azimuth_deg == 0.0
    }

    /// `None` for the unset pair, `Some(self)` otherwise.
    pub fn in_play(self) -> Option<Polar> {
        if self.is_unset() {
            None
        } else {
            Some(self)
        }
    }

    pub fn to_cartesian(self) -> Point2D {
        to_cartesian(self.distance, self.azimuth_deg)
    }
}

/// A user-entered spotter → object observation.
pub type PolarObservation = Polar;
/// A computed distance/azimuth a gun should fire at.
pub type FiringSolution = Polar;

impl fmt::Display for Polar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}m / {:.1}°", self.distance, self.azimuth_deg)
    }
}

/// Render an optional solution, falling back to [`PLACEHOLDER`].
pub fn format_solution(solution: Option<Polar>) -> String {
    solution.map_or_else(|| PLACEHOLDER.to_string(), |s| s.to_string())
}

/* ----------------------------- Conversion ----------------------------- */

/// Compass bearing to Cartesian: `x = d·sin(θ)`, `y = d·cos(θ)`.
pub fn to_cartesian(distance: f64, azimuth_deg: f64) -> Point2D {
    let rad = azimuth_deg.to_radians();
    Point2D {
        x: distance * rad.sin(),
        y: distance * rad.cos(),
    }
}

/// Cartesian to compass bearing. Note the `atan2(x, y)` argument order:
/// azimuth is measured clockwise from +y.
pub fn to_polar(p: Point2D) -> Polar {
    Polar {
        distance: p.x.hypot(p.y),
        azimuth_deg: normalize_azimuth(p.x.atan2(p.y).to_degrees()),
    }
}

/// Wrap degrees into `[0, 360)`.
pub fn normalize_azimuth(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/* ------------------------------- Input -------------------------------- */

/// Parse user-entered text; anything unparseable or non-finite reads as `0.0`.
pub fn parse_or_zero(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Replace NaN/±inf with `0.0`.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// A number that deserializes from either a JSON number or a string.
/// Strings go through [`parse_or_zero`], so bad input never fails decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNumber", into = "f64")]
pub struct LenientNumber(pub f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl From<RawNumber> for LenientNumber {
    fn from(raw: RawNumber) -> Self {
        match raw {
            RawNumber::Number(v) => LenientNumber(finite_or_zero(v)),
            RawNumber::Text(s) => LenientNumber(parse_or_zero(&s)),
        }
    }
}

impl From<LenientNumber> for f64 {
    fn from(n: LenientNumber) -> Self {
        n.0
    }
}
