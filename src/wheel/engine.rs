//! Engine facade owning all mutable wheel state

use chrono::{DateTime, Utc};
use glam::Vec2;

use super::hit_test::HitTester;
use super::outcome::{ApiResponse, DrawOutcome};
use super::sector::{SectorLayout, SectorSpec};
use super::spin::{SpinAnimator, SpinPhase, Trajectory};
use crate::error::{Result, WheelError};
use crate::ledger::{LedgerEntry, RedemptionLedger};
use crate::renderer::{self, Surface};
use crate::settings::WheelSettings;

/// One wheel: its layout, rest angle, in-flight draw and ledger
pub struct WheelEngine {
    settings: WheelSettings,
    layout: Option<SectorLayout>,
    hit_tester: HitTester,
    animator: SpinAnimator,
    /// Outcome of the spin in flight, consumed when it settles
    pending: Option<DrawOutcome>,
    ledger: RedemptionLedger,
}

impl WheelEngine {
    pub fn new(settings: WheelSettings, ledger: RedemptionLedger) -> Self {
        let settings = settings.validated();
        Self {
            hit_tester: settings.hit_tester(),
            animator: settings.spin_animator(),
            settings,
            layout: None,
            pending: None,
            ledger,
        }
    }

    /// Replace the wheel configuration.
    ///
    /// The new layout is built completely before it is swapped in; on error
    /// the previous layout stays. Refused while a spin is in flight.
    pub fn load_config(&mut self, specs: Vec<SectorSpec>) -> Result<()> {
        if self.animator.is_spinning() {
            return Err(WheelError::SpinAlreadyInFlight);
        }
        let layout = SectorLayout::build(specs)?;
        log::info!("Wheel configured with {} sectors", layout.len());
        self.layout = Some(layout);
        Ok(())
    }

    pub fn settings(&self) -> &WheelSettings {
        &self.settings
    }

    pub fn layout(&self) -> Option<&SectorLayout> {
        self.layout.as_ref()
    }

    pub fn phase(&self) -> &SpinPhase {
        self.animator.phase()
    }

    pub fn is_spinning(&self) -> bool {
        self.animator.is_spinning()
    }

    /// Wheel rotation at rest, in [0, 360)
    pub fn rest_angle(&self) -> f32 {
        self.animator.rest_degrees()
    }

    pub fn ledger(&self) -> &RedemptionLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut RedemptionLedger {
        &mut self.ledger
    }

    fn require_layout(&self) -> Result<&SectorLayout> {
        self.layout.as_ref().ok_or(WheelError::NotConfigured)
    }

    /// Paint the current layout
    pub fn paint(&self, surface: &mut dyn Surface) -> Result<()> {
        let layout = self.require_layout()?;
        renderer::paint(layout, surface, &self.settings);
        Ok(())
    }

    /// Sector under the pointer, accounting for the rest rotation.
    ///
    /// Nothing while a spin is playing: the rest angle is stale until it settles.
    pub fn hover(&self, point: Vec2, surface_size: Vec2) -> Option<&SectorSpec> {
        if self.animator.is_spinning() {
            return None;
        }
        let layout = self.layout.as_ref()?;
        self.hit_tester
            .hit_test(point, surface_size, layout, self.animator.rest_degrees())
    }

    /// Plan what a draw for `tier` would look like without starting it
    pub fn preview(&self, outcome: &DrawOutcome) -> Result<Trajectory> {
        self.animator
            .compute_trajectory(self.require_layout()?, &outcome.tier)
    }

    /// Start spinning toward a server-chosen outcome.
    ///
    /// The caller plays the returned trajectory and calls `finish_draw` once
    /// `duration_ms` has elapsed.
    pub fn begin_draw(&mut self, outcome: DrawOutcome) -> Result<Trajectory> {
        let layout = self.layout.as_ref().ok_or(WheelError::NotConfigured)?;
        let trajectory = self.animator.begin(layout, &outcome.tier)?;
        log::info!("Drawing '{}' ({})", outcome.label, outcome.tier);
        self.pending = Some(outcome);
        Ok(trajectory)
    }

    /// Start a draw from the draw service's response body.
    ///
    /// A rejected or malformed response is returned as an error and leaves
    /// the animator and the ledger untouched.
    pub fn begin_draw_from_json(&mut self, body: &str) -> Result<Trajectory> {
        let outcome = ApiResponse::<DrawOutcome>::from_json(body)?;
        self.begin_draw(outcome)
    }

    /// Rotation to display `elapsed_ms` into the current spin
    pub fn frame(&self, elapsed_ms: f64) -> Option<f32> {
        self.animator.frame(elapsed_ms)
    }

    /// Settle the spin, record the outcome in the ledger and hand it back
    pub fn finish_draw(&mut self, elapsed_ms: f64) -> Result<DrawOutcome> {
        self.finish_draw_at(elapsed_ms, Utc::now())
    }

    pub fn finish_draw_at(
        &mut self,
        elapsed_ms: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<DrawOutcome> {
        let rest = self.animator.settle(elapsed_ms)?;
        let outcome = self.pending.take().ok_or(WheelError::NotSpinning)?;
        log::info!("Settled on '{}' at {:.1}°", outcome.label, rest);

        // Ledger trouble is reported by the ledger itself and never fails a draw
        self.ledger
            .append(LedgerEntry::from_outcome(&outcome, recorded_at));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;
    use crate::renderer::MeshSurface;
    use crate::wheel::sector::{REFERENCE_ANGLE, Tier};
    use crate::{polar_to_cartesian, wrap_degrees};

    fn specs() -> Vec<SectorSpec> {
        vec![
            SectorSpec::new("A", 1, "a"),
            SectorSpec::new("B", 5, "b"),
            SectorSpec::new("C", 94, "c"),
        ]
    }

    fn outcome(tier: &str, code: &str) -> DrawOutcome {
        DrawOutcome {
            tier: Tier::new(tier),
            label: tier.to_uppercase(),
            code: code.to_string(),
            times: None,
            quota: None,
        }
    }

    fn engine() -> WheelEngine {
        let ledger = RedemptionLedger::open(MemoryStore::new(), 3);
        let mut engine = WheelEngine::new(WheelSettings::default(), ledger);
        engine.load_config(specs()).unwrap();
        engine
    }

    #[test]
    fn test_unconfigured_engine() {
        let ledger = RedemptionLedger::open(MemoryStore::new(), 3);
        let mut engine = WheelEngine::new(WheelSettings::default(), ledger);
        let mut mesh = MeshSurface::new(500.0, 500.0);
        assert!(matches!(engine.paint(&mut mesh), Err(WheelError::NotConfigured)));
        assert!(matches!(
            engine.begin_draw(outcome("a", "X")),
            Err(WheelError::NotConfigured)
        ));
        assert!(engine.hover(Vec2::new(250.0, 100.0), Vec2::splat(500.0)).is_none());
    }

    #[test]
    fn test_full_draw_cycle() {
        let mut engine = engine();
        let t = engine.begin_draw(outcome("b", "CODE-1")).unwrap();
        assert!((t.total_rotation_degrees - 1427.4).abs() < 1e-3);
        assert!(engine.is_spinning());

        // Too early: nothing revealed, nothing recorded
        assert!(matches!(
            engine.finish_draw(1000.0),
            Err(WheelError::SpinStillRunning { .. })
        ));
        assert!(engine.ledger().is_empty());

        let revealed = engine.finish_draw(f64::from(t.duration_ms)).unwrap();
        assert_eq!(revealed.code, "CODE-1");
        assert_eq!(engine.phase(), &SpinPhase::Settled);
        assert!((engine.rest_angle() - 347.4).abs() < 1e-3);
        assert_eq!(engine.ledger().latest().unwrap().code, "CODE-1");

        // Outcome is consumed exactly once
        assert!(matches!(engine.finish_draw(5000.0), Err(WheelError::NotSpinning)));
        assert_eq!(engine.ledger().len(), 1);
    }

    #[test]
    fn test_reentrant_draw_keeps_first_outcome() {
        let mut engine = engine();
        let first = engine.begin_draw(outcome("b", "FIRST")).unwrap();
        assert!(matches!(
            engine.begin_draw(outcome("c", "SECOND")),
            Err(WheelError::SpinAlreadyInFlight)
        ));
        assert_eq!(engine.frame(4000.0), Some(first.total_rotation_degrees));
        assert_eq!(engine.finish_draw(4000.0).unwrap().code, "FIRST");
    }

    #[test]
    fn test_unknown_outcome_does_not_spin() {
        let mut engine = engine();
        assert!(matches!(
            engine.begin_draw(outcome("nope", "X")),
            Err(WheelError::OutcomeNotFound { .. })
        ));
        assert_eq!(engine.phase(), &SpinPhase::Idle);
        assert!(engine.frame(0.0).is_none());
    }

    #[test]
    fn test_reload_is_atomic() {
        let mut engine = engine();
        let bad = vec![SectorSpec::new("A", 60, "a"), SectorSpec::new("B", 30, "b")];
        assert!(engine.load_config(bad).is_err());
        assert_eq!(engine.layout().unwrap().len(), 3);

        engine.begin_draw(outcome("a", "X")).unwrap();
        assert!(matches!(
            engine.load_config(vec![SectorSpec::new("All", 100, "all")]),
            Err(WheelError::SpinAlreadyInFlight)
        ));
        engine.finish_draw(4000.0).unwrap();
        engine
            .load_config(vec![SectorSpec::new("All", 100, "all")])
            .unwrap();
        assert_eq!(engine.layout().unwrap().len(), 1);
    }

    #[test]
    fn test_hover_follows_rest_angle() {
        let mut engine = engine();
        let size = Vec2::splat(500.0);
        let top = size / 2.0 + polar_to_cartesian(150.0, REFERENCE_ANGLE);

        assert_eq!(engine.hover(top, size).unwrap().label, "A");

        engine.begin_draw(outcome("b", "X")).unwrap();
        engine.finish_draw(4000.0).unwrap();
        // B now sits under the pointer
        assert_eq!(engine.hover(top, size).unwrap().label, "B");
    }

    #[test]
    fn test_no_hover_while_spinning() {
        let mut engine = engine();
        let size = Vec2::splat(500.0);
        let top = size / 2.0 + polar_to_cartesian(150.0, REFERENCE_ANGLE);

        engine.begin_draw(outcome("b", "X")).unwrap();
        assert!(engine.hover(top, size).is_none());
        engine.finish_draw(4000.0).unwrap();
        assert!(engine.hover(top, size).is_some());
    }

    #[test]
    fn test_draw_from_response_body() {
        let mut engine = engine();
        let rejected = r#"{"success":false,"message":"quota exhausted"}"#;
        match engine.begin_draw_from_json(rejected) {
            Err(WheelError::DrawRejected(msg)) => assert_eq!(msg, "quota exhausted"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(engine.phase(), &SpinPhase::Idle);
        assert!(matches!(engine.finish_draw(4000.0), Err(WheelError::NotSpinning)));
        assert!(engine.ledger().is_empty());

        let ok = r#"{"success":true,"data":{"level":"c","label":"C","cdk":"OK-1"}}"#;
        let t = engine.begin_draw_from_json(ok).unwrap();
        assert_eq!(t.tier, Tier::new("c"));
        assert_eq!(engine.finish_draw(4000.0).unwrap().code, "OK-1");
    }

    #[test]
    fn test_many_spins_keep_rest_bounded() {
        let mut engine = engine();
        for (i, tier) in ["a", "b", "c", "b", "a", "c", "c"].iter().enumerate() {
            let t = engine.begin_draw(outcome(tier, &format!("C{i}"))).unwrap();
            let mid = engine
                .layout()
                .unwrap()
                .find_tier(&Tier::new(*tier))
                .unwrap()
                .mid_degrees();
            assert!((wrap_degrees(t.total_rotation_degrees) - wrap_degrees(360.0 - mid)).abs() < 1e-2);
            engine.finish_draw(4000.0).unwrap();
            assert!(engine.rest_angle() < 360.0);
        }
        // Ledger capacity is 3
        let codes: Vec<&str> = engine.ledger().list().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["C6", "C5", "C4"]);
    }

    #[test]
    fn test_preview_does_not_start() {
        let engine = engine();
        let t = engine.preview(&outcome("c", "X")).unwrap();
        assert!(t.total_rotation_degrees > 1080.0);
        assert_eq!(engine.phase(), &SpinPhase::Idle);
    }
}
