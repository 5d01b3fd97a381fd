//! Session configuration: JSON file and/or environment overrides.

use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

pub const DEFAULT_BASELINE_SCALE: f64 = 100.0;
pub const DEFAULT_AXIS_MARGIN: f64 = 1.1;
pub const DEFAULT_TEAM_COUNT: usize = 4;
pub const DEFAULT_ARTILLERY: &str = "Mortar";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Floor of the display scale [m]; the plot never shrinks below it.
    pub baseline_scale: f64,
    /// Multiplier applied to the display scale to get axis limits.
    pub axis_margin: f64,
    /// Teams created when the session starts.
    pub team_count: usize,
    /// Artillery type selected at start; must exist in the catalog.
    pub default_artillery: String,
    /// Clear impacts and correction when the artillery type changes.
    pub reset_impacts_on_type_change: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baseline_scale: DEFAULT_BASELINE_SCALE,
            axis_margin: DEFAULT_AXIS_MARGIN,
            team_count: DEFAULT_TEAM_COUNT,
            default_artillery: DEFAULT_ARTILLERY.to_string(),
            reset_impacts_on_type_change: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| SessionError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Apply `ARTILLERY_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| env::var(name).ok())
    }

    /// Same as [`Self::with_env_overrides`] with an arbitrary variable source.
    /// Values that fail to parse or validate are logged and ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = read_var(&lookup, "ARTILLERY_BASELINE_SCALE", |v: &f64| v.is_finite() && *v > 0.0) {
            self.baseline_scale = v;
        }
        if let Some(v) = read_var(&lookup, "ARTILLERY_AXIS_MARGIN", |v: &f64| v.is_finite() && *v > 0.0) {
            self.axis_margin = v;
        }
        if let Some(v) = read_var(&lookup, "ARTILLERY_TEAM_COUNT", |_: &usize| true) {
            self.team_count = v;
        }
        if let Some(v) = read_var(&lookup, "ARTILLERY_RESET_ON_TYPE_CHANGE", |_: &bool| true) {
            self.reset_impacts_on_type_change = v;
        }
        if let Some(name) = lookup("ARTILLERY_DEFAULT_TYPE").filter(|s| !s.trim().is_empty()) {
            self.default_artillery = name.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if !(self.baseline_scale.is_finite() && self.baseline_scale > 0.0) {
            return Err(SessionError::Config(format!(
                "baseline_scale must be positive, got {}",
                self.baseline_scale
            )));
        }
        if !(self.axis_margin.is_finite() && self.axis_margin > 0.0) {
            return Err(SessionError::Config(format!(
                "axis_margin must be positive, got {}",
                self.axis_margin
            )));
        }
        Ok(())
    }
}

fn read_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    accept: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => Some(value),
        _ => {
            tracing::warn!(var = name, value = %raw, "ignoring invalid config override");
            None
        }
    }
}
