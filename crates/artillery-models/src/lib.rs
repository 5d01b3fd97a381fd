//! artillery-models
//!
//! Per-weapon accuracy data. Every artillery type has a usable distance band
//! `[range_min, range_max]` and an accuracy radius band `[spread_min, spread_max]`.
//! Spread degrades linearly with distance between those two calibration points:
//!
//!   d0     = clamp(d, range_min, range_max)
//!   frac   = (d0 - range_min) / (range_max - range_min)      (0 if the band is a point)
//!   outer  = spread_min + frac * (spread_max - spread_min)
//!   inner  = outer / 2
//!
//! Exports:
//!   - `ArtilleryProfile`, `SpreadEnvelope`, `interpolate`
//!   - `ArtilleryCatalog` (the built-in table, or a validated custom one)
//!   - `ConfigurationError`

use thiserror::Error;

/// Failures when selecting or building artillery data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown artillery type `{0}`")]
    UnknownArtillery(String),
    #[error("invalid artillery profile `{name}`: {reason}")]
    InvalidProfile { name: String, reason: &'static str },
    #[error("duplicate artillery type `{0}`")]
    DuplicateArtillery(String),
    #[error("malformed artillery table: {0}")]
    Malformed(String),
}

/// Usable distance band and accuracy radius band of one artillery type [m].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtilleryProfile {
    pub range_min: f64,
    pub range_max: f64,
    pub spread_min: f64,
    pub spread_max: f64,
}

impl ArtilleryProfile {
    pub const fn new(range_min: f64, range_max: f64, spread_min: f64, spread_max: f64) -> Self {
        Self {
            range_min,
            range_max,
            spread_min,
            spread_max,
        }
    }

    /// Spread rings for a target at `target_distance`.
    pub fn spread_at(&self, target_distance: f64) -> SpreadEnvelope {
        interpolate(self, target_distance)
    }

    /// Whether `distance` falls inside the usable band (inclusive).
    pub fn in_range(&self, distance: f64) -> bool {
        distance >= self.range_min && distance <= self.range_max
    }

    fn validate(&self, name: &str) -> Result<(), ConfigurationError> {
        let invalid = |reason| ConfigurationError::InvalidProfile {
            name: name.to_string(),
            reason,
        };
        let fields = [self.range_min, self.range_max, self.spread_min, self.spread_max];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(invalid("values must be finite"));
        }
        if fields.iter().any(|v| *v < 0.0) {
            return Err(invalid("values must be non-negative"));
        }
        if self.range_min > self.range_max {
            return Err(invalid("range_min exceeds range_max"));
        }
        if self.spread_min > self.spread_max {
            return Err(invalid("spread_min exceeds spread_max"));
        }
        Ok(())
    }
}

/// Accuracy rings drawn around the target [m].
///
/// `inner_radius` is the high-confidence zone; `outer_radius` is the full
/// acceptable miss distance used for the hold-fire decision.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpreadEnvelope {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl SpreadEnvelope {
    /// A miss of `miss` metres counts as on target.
    pub fn contains(&self, miss: f64) -> bool {
        miss <= self.outer_radius
    }
}

/// Linear spread interpolation across the profile's range band.
///
/// Distances outside the band clamp to the nearest bound. A zero-width band
/// (`range_min == range_max`) always yields `spread_min`.
pub fn interpolate(profile: &ArtilleryProfile, target_distance: f64) -> SpreadEnvelope {
    // max/min rather than clamp: clamp panics on an inverted band
    let d0 = target_distance.max(profile.range_min).min(profile.range_max);
    let frac = if profile.range_max > profile.range_min {
        (d0 - profile.range_min) / (profile.range_max - profile.range_min)
    } else {
        0.0
    };
    let total = profile.spread_min + frac * (profile.spread_max - profile.spread_min);
    SpreadEnvelope {
        inner_radius: total / 2.0,
        outer_radius: total,
    }
}

/* ---------------------------- Built-in table ---------------------------- */

const BUILTIN: &[(&str, ArtilleryProfile)] = &[
    //  name,                              range_min, range_max, spread_min, spread_max
    ("Mortar",           ArtilleryProfile::new( 45.0,  80.0,  5.5, 12.0 )),
    ("Gunship",          ArtilleryProfile::new( 75.0, 100.0,  2.5, 14.5 )),
    ("Devitt-Caine",     ArtilleryProfile::new( 45.0,  80.0,  2.5,  9.45)),
    ("Peltast",          ArtilleryProfile::new( 45.0,  80.0,  2.5,  9.45)),
    ("Skycaller",        ArtilleryProfile::new(275.0, 350.0, 37.5, 60.0 )),
    ("Rocket Battery",   ArtilleryProfile::new(350.0, 400.0, 41.5, 57.7 )),
    ("Wasp Nest",        ArtilleryProfile::new(375.0, 450.0, 37.5, 60.0 )),
    ("Hades' Net",       ArtilleryProfile::new(300.0, 575.0, 35.0, 52.0 )),
    ("O'Brien Squire",   ArtilleryProfile::new(375.0, 500.0, 39.0, 51.0 )),
    ("r-17 Skirmisher",  ArtilleryProfile::new(375.0, 500.0, 37.0, 51.0 )),
];

/// Immutable, ordered lookup of artillery profiles by display name.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtilleryCatalog {
    entries: Vec<(String, ArtilleryProfile)>,
}

impl Default for ArtilleryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ArtilleryCatalog {
    /// The reference table, in display order.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(name, p)| ((*name).to_string(), *p))
                .collect(),
        }
    }

    /// Build a custom table. Profiles are validated and names must be unique.
    pub fn from_profiles<I, S>(profiles: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, ArtilleryProfile)>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, ArtilleryProfile)> = Vec::new();
        for (name, profile) in profiles {
            let name = name.into();
            profile.validate(&name)?;
            if entries.iter().any(|(n, _)| *n == name) {
                return Err(ConfigurationError::DuplicateArtillery(name));
            }
            entries.push((name, profile));
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{ "name": .., "range_min": .., ... }` objects.
    #[cfg(feature = "with-serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        #[derive(serde::Deserialize)]
        struct NamedProfile {
            name: String,
            #[serde(flatten)]
            profile: ArtilleryProfile,
        }

        let rows: Vec<NamedProfile> =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        Self::from_profiles(rows.into_iter().map(|r| (r.name, r.profile)))
    }

    pub fn get(&self, name: &str) -> Result<&ArtilleryProfile, ConfigurationError> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
            .ok_or_else(|| ConfigurationError::UnknownArtillery(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Names in table order, for populating a selector.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtilleryProfile)> + '_ {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/* -------------------------------- tests -------------------------------- */
