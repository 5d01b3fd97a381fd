// crates/artillery-ffi-wasm/src/lib.rs
//
// WASM bindings: a session handle the browser renderer drives. Every
// mutating call returns the fresh snapshot so the page redraws from one
// consistent state.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

// --- our crates ---
use artillery_core::{LenientNumber, Point2D, Polar};
use artillery_models::ArtilleryCatalog;
use artillery_solver::{SessionConfig, SessionState, TeamId};

// Better panic messages in browser console
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

/* --------------------------- Shared DTOs (JS) --------------------------- */

/// Raw field values from the page. Text that does not parse reads as 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JsObservation {
    pub distance: LenientNumber,
    pub azimuth_deg: LenientNumber,
}
impl From<JsObservation> for Polar {
    fn from(o: JsObservation) -> Self {
        Polar::new(o.distance.into(), o.azimuth_deg.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsArtilleryType {
    pub name: String,
    pub range_min: f64,
    pub range_max: f64,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn artillery_types(catalog: &ArtilleryCatalog) -> Vec<JsArtilleryType> {
    catalog
        .iter()
        .map(|(name, p)| JsArtilleryType {
            name: name.to_string(),
            range_min: p.range_min,
            range_max: p.range_max,
        })
        .collect()
}

/* ------------------------------- Session ------------------------------- */

#[wasm_bindgen]
pub struct ArtillerySession {
    inner: SessionState,
}

#[wasm_bindgen]
impl ArtillerySession {
    /// `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ArtillerySession, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            swb::from_value(config)?
        };
        let inner = SessionState::new(config, ArtilleryCatalog::builtin()).map_err(js_err)?;
        Ok(ArtillerySession::from_state(inner))
    }

    /// Selector entries in table order.
    #[wasm_bindgen(js_name = artilleryTypes)]
    pub fn artillery_types(&self) -> Result<JsValue, JsValue> {
        swb::to_value(&artillery_types(self.inner.catalog())).map_err(|e| e.into())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        swb::to_value(self.inner.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = setTarget)]
    pub fn set_target(&mut self, obs: JsValue) -> Result<JsValue, JsValue> {
        let obs: JsObservation = swb::from_value(obs)?;
        self.inner.set_target(obs.into());
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setTeamPosition)]
    pub fn set_team_position(&mut self, team: usize, obs: JsValue) -> Result<JsValue, JsValue> {
        let obs: JsObservation = swb::from_value(obs)?;
        self.inner
            .set_team_position(TeamId(team), obs.into())
            .map_err(js_err)?;
        self.snapshot()
    }

    /// Register another team (not in play until positioned).
    #[wasm_bindgen(js_name = addTeam)]
    pub fn add_team(&mut self, name: &str) -> Result<JsValue, JsValue> {
        self.register_team(name);
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setRangeRing)]
    pub fn set_range_ring(&mut self, team: usize, show: bool) -> Result<JsValue, JsValue> {
        self.inner.set_range_ring(TeamId(team), show).map_err(js_err)?;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setArtilleryType)]
    pub fn set_artillery_type(&mut self, name: &str) -> Result<JsValue, JsValue> {
        self.inner.set_artillery_type(name).map_err(js_err)?;
        self.snapshot()
    }

    /// `x`, `y` are already in the spotter frame (the plot's data coords).
    #[wasm_bindgen(js_name = recordImpact)]
    pub fn record_impact(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.inner.record_impact(Point2D::new(x, y));
        self.snapshot()
    }

    #[wasm_bindgen(js_name = resetImpacts)]
    pub fn reset_impacts(&mut self) -> Result<JsValue, JsValue> {
        self.inner.reset_impacts();
        self.snapshot()
    }

    #[wasm_bindgen(js_name = fullReset)]
    pub fn full_reset(&mut self) -> Result<JsValue, JsValue> {
        self.inner.full_reset();
        self.snapshot()
    }
}

impl ArtillerySession {
    fn from_state(inner: SessionState) -> Self {
        ArtillerySession { inner }
    }

    fn register_team(&mut self, name: &str) -> TeamId {
        self.inner.add_team(name)
    }
}
