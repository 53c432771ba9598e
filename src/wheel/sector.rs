//! Sector layout: weighted entries partitioned around the wheel
//!
//! All angles stored here are *relative* angles in [0, 2π), measured clockwise
//! (screen space, y down) from `REFERENCE_ANGLE`, the 12 o'clock pointer.
//! The renderer and the hit tester both go through `surface_angle` /
//! `relative_angle` so they can never disagree about where a sector is.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::TOTAL_WEIGHT;
use crate::error::{Result, WheelError};
use crate::wrap_angle;

/// Surface angle (radians) where relative angle 0 sits: straight up
pub const REFERENCE_ANGLE: f32 = -FRAC_PI_2;

/// Prize category identifier, independent of the display label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(pub String);

impl Tier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tier {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One configured prize entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSpec {
    pub label: String,
    /// Integer percentage of the wheel, (0, 100]
    #[serde(alias = "probability")]
    pub weight: u32,
    #[serde(alias = "level")]
    pub tier: Tier,
    /// Number of draws the prize is worth (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
}

impl SectorSpec {
    pub fn new(label: impl Into<String>, weight: u32, tier: impl Into<Tier>) -> Self {
        Self {
            label: label.into(),
            weight,
            tier: tier.into(),
            times: None,
        }
    }
}

/// A sector with its angular extent resolved
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutSector {
    pub spec: SectorSpec,
    /// Position in the configuration (drives palette cycling)
    pub index: usize,
    /// Sum of the weights before this sector
    pub cumulative_weight: u32,
    /// Relative start angle (radians)
    pub start_angle: f32,
    /// Angular size (radians)
    pub sweep_angle: f32,
    end_angle: f32,
}

impl LaidOutSector {
    /// Relative end angle; identical to the next sector's start
    #[inline]
    pub fn end_angle(&self) -> f32 {
        self.end_angle
    }

    /// Relative bisector angle (radians)
    #[inline]
    pub fn mid_angle(&self) -> f32 {
        self.start_angle + self.sweep_angle / 2.0
    }

    /// Bisector in degrees, computed from the integer weights so it stays exact
    pub fn mid_degrees(&self) -> f32 {
        weight_to_degrees(2 * self.cumulative_weight + self.spec.weight) / 2.0
    }

    pub fn start_degrees(&self) -> f32 {
        weight_to_degrees(self.cumulative_weight)
    }

    pub fn sweep_degrees(&self) -> f32 {
        weight_to_degrees(self.spec.weight)
    }

    /// Half-open containment test on a relative angle in [0, 2π)
    #[inline]
    pub fn contains(&self, relative: f32) -> bool {
        relative >= self.start_angle && relative < self.end_angle
    }
}

/// Ordered, angle-partitioned wheel layout
#[derive(Debug, Clone, PartialEq)]
pub struct SectorLayout {
    sectors: Vec<LaidOutSector>,
}

impl SectorLayout {
    /// Partition the wheel by prefix-summing weights.
    ///
    /// Fails when the list is empty, a weight is outside (0, 100], or the
    /// weights do not sum to exactly 100.
    pub fn build(specs: Vec<SectorSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(WheelError::invalid_config("no sectors configured"));
        }

        let mut total: u64 = 0;
        for spec in &specs {
            if spec.weight == 0 || spec.weight > TOTAL_WEIGHT {
                return Err(WheelError::invalid_config(format!(
                    "sector '{}' has weight {}, expected 1..={}",
                    spec.label, spec.weight, TOTAL_WEIGHT
                )));
            }
            total += u64::from(spec.weight);
        }
        if total != u64::from(TOTAL_WEIGHT) {
            return Err(WheelError::invalid_config(format!(
                "weights sum to {}, expected {}",
                total, TOTAL_WEIGHT
            )));
        }

        let mut cumulative = 0u32;
        let sectors = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let start = cumulative;
                cumulative += spec.weight;
                LaidOutSector {
                    index,
                    cumulative_weight: start,
                    start_angle: weight_to_angle(start),
                    sweep_angle: weight_to_angle(spec.weight),
                    end_angle: weight_to_angle(cumulative),
                    spec,
                }
            })
            .collect();

        Ok(Self { sectors })
    }

    pub fn sectors(&self) -> &[LaidOutSector] {
        &self.sectors
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Sector whose half-open interval contains the (wrapped) relative angle.
    ///
    /// A boundary angle belongs to the sector that begins there.
    pub fn sector_at(&self, relative: f32) -> Option<&LaidOutSector> {
        let angle = wrap_angle(relative);
        self.sectors
            .iter()
            .find(|s| angle < s.end_angle)
            // End of the last sector may round just below TAU
            .or_else(|| self.sectors.last())
    }

    /// First sector carrying the given tier
    pub fn find_tier(&self, tier: &Tier) -> Option<&LaidOutSector> {
        self.sectors.iter().find(|s| &s.spec.tier == tier)
    }

    /// Relative angle -> surface angle (what a canvas `arc` call expects)
    #[inline]
    pub fn surface_angle(relative: f32) -> f32 {
        REFERENCE_ANGLE + relative
    }

    /// Surface angle (e.g. from `atan2` in screen space) -> relative angle in [0, 2π)
    #[inline]
    pub fn relative_angle(surface: f32) -> f32 {
        wrap_angle(surface - REFERENCE_ANGLE)
    }
}

#[inline]
fn weight_to_angle(weight: u32) -> f32 {
    weight as f32 / TOTAL_WEIGHT as f32 * TAU
}

/// Integer arithmetic first keeps whole-percent boundaries exact
#[inline]
fn weight_to_degrees(weight: u32) -> f32 {
    (weight * 360) as f32 / TOTAL_WEIGHT as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn abc() -> SectorLayout {
        SectorLayout::build(vec![
            SectorSpec::new("A", 1, "a"),
            SectorSpec::new("B", 5, "b"),
            SectorSpec::new("C", 94, "c"),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_concrete_layout() {
        let layout = abc();
        let sweeps: Vec<f32> = layout.sectors().iter().map(|s| s.sweep_degrees()).collect();
        let starts: Vec<f32> = layout.sectors().iter().map(|s| s.start_degrees()).collect();

        for (got, want) in sweeps.iter().zip([3.6, 18.0, 338.4]) {
            assert!((got - want).abs() < 1e-3, "sweep {got} != {want}");
        }
        for (got, want) in starts.iter().zip([0.0, 3.6, 21.6]) {
            assert!((got - want).abs() < 1e-3, "start {got} != {want}");
        }
        assert!((layout.sectors()[1].mid_degrees() - 12.6).abs() < 1e-4);
    }

    #[test]
    fn test_build_rejects_bad_configs() {
        assert!(matches!(
            SectorLayout::build(vec![]),
            Err(WheelError::InvalidConfiguration { .. })
        ));
        assert!(SectorLayout::build(vec![
            SectorSpec::new("A", 0, "a"),
            SectorSpec::new("B", 100, "b"),
        ])
        .is_err());
        assert!(SectorLayout::build(vec![
            SectorSpec::new("A", 50, "a"),
            SectorSpec::new("B", 49, "b"),
        ])
        .is_err());
        assert!(SectorLayout::build(vec![SectorSpec::new("A", 101, "a")]).is_err());
    }

    #[test]
    fn test_sector_at_boundaries() {
        let layout = abc();
        assert_eq!(layout.sector_at(2.0_f32.to_radians()).unwrap().spec.label, "A");
        assert_eq!(layout.sector_at(0.0).unwrap().spec.label, "A");

        // Exactly on A/B boundary -> B, which starts there
        let boundary = layout.sectors()[1].start_angle;
        assert_eq!(layout.sector_at(boundary).unwrap().spec.label, "B");

        // Just below 2π wraps nowhere else than the last sector
        assert_eq!(layout.sector_at(TAU - 1e-6).unwrap().spec.label, "C");
        // Full turn wraps back to the first sector
        assert_eq!(layout.sector_at(TAU).unwrap().spec.label, "A");
    }

    #[test]
    fn test_angle_convention() {
        // Straight up on screen is relative zero
        assert!(SectorLayout::relative_angle(-FRAC_PI_2).abs() < 1e-6);
        // 3 o'clock on screen is a quarter turn clockwise
        assert!((SectorLayout::relative_angle(0.0) - FRAC_PI_2).abs() < 1e-6);
        let rel = 1.234;
        assert!((SectorLayout::relative_angle(SectorLayout::surface_angle(rel)) - rel).abs() < 1e-5);
    }

    #[test]
    fn test_single_sector_covers_everything() {
        let layout = SectorLayout::build(vec![SectorSpec::new("All", 100, "all")]).unwrap();
        for deg in [0.0_f32, 90.0, 180.0, 359.9] {
            assert_eq!(layout.sector_at(deg.to_radians()).unwrap().spec.label, "All");
        }
    }

    #[test]
    fn test_deserialize_original_field_names() {
        let json = r#"[{"label":"Grand","probability":1,"level":"jackpot","times":10000},
                       {"label":"Rest","probability":99,"level":"common"}]"#;
        let specs: Vec<SectorSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(specs[0].weight, 1);
        assert_eq!(specs[0].tier, Tier::new("jackpot"));
        assert_eq!(specs[0].times, Some(10000));
        assert!(SectorLayout::build(specs).is_ok());
    }

    /// Random positive weights summing to 100
    fn weights() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(1u32..=100, 1..12).prop_map(|raw| {
            let mut out = Vec::new();
            let mut left = TOTAL_WEIGHT;
            for w in raw {
                if left == 0 {
                    break;
                }
                let w = w.min(left);
                out.push(w);
                left -= w;
            }
            if left > 0 {
                out.push(left);
            }
            out
        })
    }

    fn layout_from(weights: &[u32]) -> SectorLayout {
        SectorLayout::build(
            weights
                .iter()
                .enumerate()
                .map(|(i, w)| SectorSpec::new(format!("S{i}"), *w, format!("t{i}").as_str()))
                .collect(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn prop_sweeps_cover_full_turn(ws in weights()) {
            let layout = layout_from(&ws);
            let total: f32 = layout.sectors().iter().map(|s| s.sweep_angle).sum();
            prop_assert!((total - TAU).abs() < 1e-4);
            for pair in layout.sectors().windows(2) {
                prop_assert!(pair[0].start_angle <= pair[1].start_angle);
                prop_assert_eq!(pair[0].end_angle(), pair[1].start_angle);
            }
        }

        #[test]
        fn prop_every_angle_has_exactly_one_sector(ws in weights(), theta in 0.0f32..TAU) {
            let layout = layout_from(&ws);
            let owners = layout.sectors().iter().filter(|s| s.contains(theta)).count();
            let last = layout.sectors().last().unwrap();
            // The last sector's end can round a hair below TAU
            prop_assert!(owners == 1 || (owners == 0 && theta >= last.end_angle()));
            let hit = layout.sector_at(theta).unwrap();
            prop_assert!(hit.contains(theta) || hit.index == last.index);
        }
    }
}
