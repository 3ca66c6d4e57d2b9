//! Hours reconciliation
//!
//! A beneficiary owes a fixed total of community-service hours, split into
//! a served/remaining pair. The pair is edited in two places (the hours
//! dialog and the intake form) and both must keep the same arithmetic:
//! the total is fixed at load time and editing one side of the pair
//! recomputes the other. [`HoursLedger`] is the single owner of that
//! arithmetic.

use crate::HORAS_EPSILON;

/// Editable view over a served/remaining hours pair with a fixed total.
///
/// Loading clamps stray negatives to zero. `set_cumpridas` is the primary
/// edit path; `set_restantes` exists for forms that capture the remainder
/// directly and re-derives the total instead (last-edited field wins).
/// `close` reconciles the pair one final time before persistence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursLedger {
    cumpridas: f64,
    restantes: f64,
    total: f64,
    original_cumpridas: f64,
    original_restantes: f64,
}

impl HoursLedger {
    /// Build a ledger from a stored pair. Negative components are clamped
    /// to zero before the total is fixed.
    pub fn load(cumpridas: f64, restantes: f64) -> Self {
        let cumpridas = cumpridas.max(0.0);
        let restantes = restantes.max(0.0);
        Self {
            cumpridas,
            restantes,
            total: cumpridas + restantes,
            original_cumpridas: cumpridas,
            original_restantes: restantes,
        }
    }

    pub fn cumpridas(&self) -> f64 {
        self.cumpridas
    }

    pub fn restantes(&self) -> f64 {
        self.restantes
    }

    /// Total of the obligation as fixed at load time (or re-derived by the
    /// most recent `set_restantes`).
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Set the served hours. The value is clamped to `[0, total]` and the
    /// remaining hours are recomputed so the pair still sums to the total.
    pub fn set_cumpridas(&mut self, horas: f64) {
        self.cumpridas = horas.clamp(0.0, self.total);
        self.restantes = (self.total - self.cumpridas).max(0.0);
    }

    /// Set the remaining hours directly. Served hours are kept and the
    /// total is re-derived from the new pair.
    pub fn set_restantes(&mut self, horas: f64) {
        self.restantes = horas.max(0.0);
        self.total = self.cumpridas + self.restantes;
    }

    /// Nudge the served hours by half-hour steps. Negative `steps` walk
    /// back toward zero.
    pub fn step_cumpridas(&mut self, steps: i32) {
        self.set_cumpridas(self.cumpridas + f64::from(steps) * 0.5);
    }

    /// Whether either component moved beyond floating-point noise since
    /// load. Drives the enabled state of the save action.
    pub fn is_dirty(&self) -> bool {
        (self.cumpridas - self.original_cumpridas).abs() > HORAS_EPSILON
            || (self.restantes - self.original_restantes).abs() > HORAS_EPSILON
    }

    /// Whether the obligation is fully served.
    pub fn is_concluido(&self) -> bool {
        self.restantes <= HORAS_EPSILON && self.total > 0.0
    }

    /// Fraction served, in `[0, 1]`. Zero-total obligations report zero.
    pub fn progresso(&self) -> f64 {
        if self.total <= 0.0 {
            0.0
        } else {
            (self.cumpridas / self.total).clamp(0.0, 1.0)
        }
    }

    /// Reconcile the pair for persistence: the remaining hours are
    /// re-derived from the total so a stale remainder can never be saved.
    /// Returns the `(cumpridas, restantes)` pair to store.
    pub fn close(&self) -> (f64, f64) {
        let restantes = (self.total - self.cumpridas).max(0.0);
        (self.cumpridas, restantes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_load_fixes_total() {
        let ledger = HoursLedger::load(10.0, 30.0);
        assert_eq!(ledger.total(), 40.0);
        assert_eq!(ledger.cumpridas(), 10.0);
        assert_eq!(ledger.restantes(), 30.0);
    }

    #[test]
    fn test_load_clamps_negative_components() {
        let ledger = HoursLedger::load(-4.0, 25.0);
        assert_eq!(ledger.cumpridas(), 0.0);
        assert_eq!(ledger.total(), 25.0);
    }

    #[test]
    fn test_set_cumpridas_recomputes_restantes() {
        let mut ledger = HoursLedger::load(10.0, 30.0);
        ledger.set_cumpridas(25.0);
        assert_eq!(ledger.restantes(), 15.0);
        assert_eq!(ledger.total(), 40.0);
    }

    #[test]
    fn test_set_cumpridas_clamps_to_total() {
        let mut ledger = HoursLedger::load(10.0, 30.0);
        ledger.set_cumpridas(99.0);
        assert_eq!(ledger.cumpridas(), 40.0);
        assert_eq!(ledger.restantes(), 0.0);
        ledger.set_cumpridas(-1.0);
        assert_eq!(ledger.cumpridas(), 0.0);
        assert_eq!(ledger.restantes(), 40.0);
    }

    #[test]
    fn test_set_rest_rederives_total() {
        let mut ledger = HoursLedger::load(10.0, 30.0);
        ledger.set_restantes(50.0);
        assert_eq!(ledger.total(), 60.0);
        assert_eq!(ledger.cumpridas(), 10.0);
    }

    #[test]
    fn test_step_cumpridas_half_hours() {
        let mut ledger = HoursLedger::load(10.0, 30.0);
        ledger.step_cumpridas(3);
        assert_eq!(ledger.cumpridas(), 11.5);
        ledger.step_cumpridas(-1);
        assert_eq!(ledger.cumpridas(), 11.0);
    }

    #[test]
    fn test_dirty_tolerance() {
        let mut ledger = HoursLedger::load(10.0, 30.0);
        assert!(!ledger.is_dirty());
        ledger.set_cumpridas(10.005);
        assert!(!ledger.is_dirty());
        ledger.set_cumpridas(10.5);
        assert!(ledger.is_dirty());
    }

    #[test]
    fn test_concluido_and_progresso() {
        let mut ledger = HoursLedger::load(0.0, 40.0);
        assert!(!ledger.is_concluido());
        assert_eq!(ledger.progresso(), 0.0);
        ledger.set_cumpridas(40.0);
        assert!(ledger.is_concluido());
        assert_eq!(ledger.progresso(), 1.0);
    }

    #[test]
    fn test_zero_total_obligation() {
        let ledger = HoursLedger::load(0.0, 0.0);
        assert!(!ledger.is_concluido());
        assert_eq!(ledger.progresso(), 0.0);
        assert_eq!(ledger.close(), (0.0, 0.0));
    }

    #[test]
    fn test_fully_served_then_corrected_down() {
        let mut ledger = HoursLedger::load(40.0, 0.0);
        assert_eq!(ledger.total(), 40.0);
        ledger.set_cumpridas(25.0);
        assert_eq!(ledger.close(), (25.0, 15.0));
    }

    #[test]
    fn test_close_rederives_stale_remainder() {
        let mut ledger = HoursLedger::load(10.0, 30.0);
        ledger.set_cumpridas(35.0);
        let (cumpridas, restantes) = ledger.close();
        assert_eq!(cumpridas, 35.0);
        assert_eq!(restantes, 5.0);
    }

    proptest! {
        #[test]
        fn prop_pair_sums_to_total_after_edit(
            c in 0.0f64..500.0,
            r in 0.0f64..500.0,
            edit in -100.0f64..600.0,
        ) {
            let mut ledger = HoursLedger::load(c, r);
            let total = ledger.total();
            ledger.set_cumpridas(edit);
            prop_assert!((ledger.cumpridas() + ledger.restantes() - total).abs() < 1e-9);
            prop_assert!(ledger.cumpridas() >= 0.0);
            prop_assert!(ledger.restantes() >= 0.0);
        }

        #[test]
        fn prop_close_never_negative(
            c in -100.0f64..500.0,
            r in -100.0f64..500.0,
            edit in -100.0f64..600.0,
        ) {
            let mut ledger = HoursLedger::load(c, r);
            ledger.set_cumpridas(edit);
            let (cumpridas, restantes) = ledger.close();
            prop_assert!(cumpridas >= 0.0);
            prop_assert!(restantes >= 0.0);
            prop_assert!((cumpridas + restantes - ledger.total()).abs() < 1e-9);
        }
    }
}
