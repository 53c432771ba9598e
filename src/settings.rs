//! Wheel settings
//!
//! Geometry, label rules and spin tuning. Persisted separately from the
//! ledger through the same key-value store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::storage::KeyValueStore;
use crate::wheel::Easing;
use crate::wheel::hit_test::HitTester;
use crate::wheel::spin::SpinAnimator;

/// Font size used for sectors narrower than `below_sweep_deg`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontBucket {
    pub below_sweep_deg: f32,
    pub font_px: f32,
}

/// Label placement rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Sectors narrower than this pull their label toward the hub
    pub narrow_sweep_deg: f32,
    /// Label distance for narrow sectors, as a fraction of the radius
    pub narrow_distance: f32,
    /// Label distance for everything else
    pub wide_distance: f32,
    /// Checked in order; first matching bucket wins
    pub font_buckets: Vec<FontBucket>,
    /// Used when no bucket matches
    pub default_font_px: f32,
    /// Per-tier font size, applied regardless of bucket
    pub font_overrides: BTreeMap<String, f32>,
    pub font_family: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            narrow_sweep_deg: 18.0,
            narrow_distance: 0.50,
            wide_distance: 0.65,
            font_buckets: vec![
                FontBucket {
                    below_sweep_deg: 18.0,
                    font_px: 16.0,
                },
                FontBucket {
                    below_sweep_deg: 36.0,
                    font_px: 20.0,
                },
            ],
            default_font_px: 24.0,
            // The 1% grand prize label is long; smallest font regardless of bucket
            font_overrides: BTreeMap::from([("jackpot".to_string(), 14.0)]),
            font_family: "Arial".to_string(),
        }
    }
}

/// Everything tunable about the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSettings {
    // === Geometry ===
    pub radius: f32,
    /// Pointer dead zone around the hub
    pub hub_radius: f32,
    pub stroke_width: f32,

    // === Labels ===
    pub labels: LabelStyle,

    // === Spin ===
    pub full_turns: u32,
    pub spin_duration_ms: u32,
    pub easing: Easing,

    // === Ledger ===
    pub ledger_capacity: usize,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            radius: WHEEL_RADIUS,
            hub_radius: HUB_RADIUS,
            stroke_width: SECTOR_STROKE_WIDTH,

            labels: LabelStyle::default(),

            full_turns: MIN_FULL_TURNS,
            spin_duration_ms: SPIN_DURATION_MS,
            easing: Easing::EASE,

            ledger_capacity: LEDGER_CAPACITY,
        }
    }
}

impl WheelSettings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "prize_wheel_settings";

    /// Clamp values into a usable range
    pub fn validated(mut self) -> Self {
        self.full_turns = self.full_turns.max(MIN_FULL_TURNS);
        self.ledger_capacity = self.ledger_capacity.max(1);
        self.radius = self.radius.max(1.0);
        self.hub_radius = self.hub_radius.clamp(0.0, self.radius);
        self.stroke_width = self.stroke_width.max(0.0);
        self
    }

    pub fn hit_tester(&self) -> HitTester {
        HitTester::new(self.hub_radius, self.radius)
    }

    pub fn spin_animator(&self) -> SpinAnimator {
        SpinAnimator::new(self.full_turns, self.spin_duration_ms, self.easing)
    }

    /// Load settings from storage, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<WheelSettings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded wheel settings");
                    return settings.validated();
                }
                Err(e) => log::warn!("Ignoring malformed wheel settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Wheel settings unavailable: {e}"),
        }

        log::info!("Using default wheel settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Wheel settings saved"),
                Err(e) => log::warn!("Failed to save wheel settings: {e}"),
            },
            Err(e) => log::warn!("Failed to serialize wheel settings: {e}"),
        }
    }
}
