use crate::models::{CropParams, FieldState, Nutrient, UptakeLedger};

/// Maximum uptake of any one nutrient per day (kg/ha).
pub const DAILY_UPTAKE_CAP: f64 = 8.0;

/// Lower bound on the nitrogen-stress factor.
pub const MIN_NITROGEN_STRESS: f64 = 0.4;

const STRESS_EPSILON: f64 = 1e-6;

/// Tracks nutrient uptake against per-stage targets.
pub struct NutrientTracker<'a> {
    crop: &'a CropParams,
}

impl<'a> NutrientTracker<'a> {
    pub fn new(crop: &'a CropParams) -> Self {
        Self { crop }
    }

    /// Take up nutrients for the stage at `stage_index`, scaled by water
    /// stress, then refresh nitrogen stress.
    pub fn uptake(&self, state: &mut FieldState, stage_index: usize) {
        if let Some(stage) = self.crop.stage(stage_index) {
            for (nutrient, target) in stage.nuptake_target.demanded() {
                let taken = state.uptake.taken(stage_index, nutrient);
                let needed = (target - taken).max(0.0);
                let take = needed.min(DAILY_UPTAKE_CAP) * state.stress_w;
                state.stock_kg_ha.add(nutrient, take);
                state.uptake.record(stage_index, nutrient, take);
            }
        }
        state.stress_n = self.nitrogen_stress(&state.uptake, stage_index);
    }

    /// Ratio of nitrogen taken to nitrogen demanded through `stage_index`.
    pub fn nitrogen_stress(&self, ledger: &UptakeLedger, stage_index: usize) -> f64 {
        let demanded: f64 = self
            .crop
            .stages
            .iter()
            .take(stage_index + 1)
            .map(|s| s.nuptake_target.get(Nutrient::N))
            .sum();
        if demanded <= 0.0 {
            return 1.0;
        }
        let taken = ledger.total(Nutrient::N);
        ((taken + STRESS_EPSILON) / (demanded + STRESS_EPSILON)).clamp(MIN_NITROGEN_STRESS, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldConfig, Management, SoilProfile, StageParams, StressSensitivity};
    use chrono::NaiveDate;

    fn field() -> FieldConfig {
        FieldConfig {
            id: "f1".into(),
            name: "Test".into(),
            area_ha: 1.0,
            soil: SoilProfile::default(),
            crop: CropParams {
                species: "testcrop".into(),
                cultivar: "T".into(),
                tb: 8.0,
                to: 30.0,
                lai_max: 4.0,
                hi: 0.5,
                stress_sensitivity: StressSensitivity::default(),
                stages: vec![
                    StageParams::new("early").with_dap(5).with_uptake(20.0, 3.0, 0.0),
                    StageParams::new("late").with_dap(10).with_uptake(10.0, 0.0, 0.0),
                    StageParams::new("maturity"),
                ],
            },
            management: Management::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 6.0),
        }
    }

    #[test]
    fn uptake_is_capped_per_day() {
        let field = field();
        let tracker = NutrientTracker::new(&field.crop);
        let mut state = FieldState::new(field.management.plant_date, &field);

        tracker.uptake(&mut state, 0);
        assert_eq!(state.stock_kg_ha.n, 8.0);
        assert_eq!(state.stock_kg_ha.p, 3.0);
        assert_eq!(state.stock_kg_ha.k, 0.0);
        assert!((state.stress_n - 0.4).abs() < 1e-6);

        tracker.uptake(&mut state, 0);
        tracker.uptake(&mut state, 0);
        assert_eq!(state.uptake.taken(0, Nutrient::N), 20.0);
        assert_eq!(state.uptake.taken(0, Nutrient::P), 3.0);
        assert!((state.stress_n - 1.0).abs() < 1e-6);
    }

    #[test]
    fn water_stress_scales_uptake() {
        let field = field();
        let tracker = NutrientTracker::new(&field.crop);
        let mut state = FieldState::new(field.management.plant_date, &field);
        state.stress_w = 0.5;

        tracker.uptake(&mut state, 0);
        assert_eq!(state.stock_kg_ha.n, 4.0);
        assert_eq!(state.stress_n, MIN_NITROGEN_STRESS);
    }

    #[test]
    fn nitrogen_demand_accumulates_over_stages() {
        let field = field();
        let tracker = NutrientTracker::new(&field.crop);
        let mut ledger = UptakeLedger::with_stages(3);
        ledger.record(0, Nutrient::N, 20.0);

        assert!((tracker.nitrogen_stress(&ledger, 0) - 1.0).abs() < 1e-6);
        // 20 taken of 30 demanded once the second stage is active
        assert!((tracker.nitrogen_stress(&ledger, 1) - 20.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn no_nitrogen_demand_means_no_stress() {
        let mut field = field();
        for stage in &mut field.crop.stages {
            stage.nuptake_target.n = 0.0;
        }
        let tracker = NutrientTracker::new(&field.crop);
        let mut state = FieldState::new(field.management.plant_date, &field);
        tracker.uptake(&mut state, 0);
        assert_eq!(state.stress_n, 1.0);
    }
}
