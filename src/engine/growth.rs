use super::calculations::intercepted_fraction;
use crate::models::{CropParams, FieldState, StageParams};

/// Daily canopy expansion and dry-matter gain.
pub struct BiomassAccumulator<'a> {
    crop: &'a CropParams,
}

impl<'a> BiomassAccumulator<'a> {
    pub fn new(crop: &'a CropParams) -> Self {
        Self { crop }
    }

    /// Logistic LAI growth limited by both stresses.
    pub fn expand_canopy(&self, state: &mut FieldState, stage: &StageParams) {
        let lai_max = self.crop.lai_max.max(0.0);
        if lai_max <= 0.0 {
            state.lai = 0.0;
            return;
        }
        let gain = stage.lai_gain
            * state.lai
            * (1.0 - state.lai / lai_max)
            * state.stress_w
            * state.stress_n;
        state.lai = (state.lai + gain).clamp(0.0, lai_max);
    }

    /// Radiation-use-efficiency biomass gain (kg/ha) from the current canopy.
    pub fn accumulate(&self, state: &mut FieldState, stage: &StageParams, rad: f64) -> f64 {
        let apar = rad * intercepted_fraction(state.lai);
        let gain = (stage.rue * apar * state.stress_w * state.stress_n).max(0.0);
        state.biomass_dm_kg_ha += gain;
        gain
    }

    pub fn grow(&self, state: &mut FieldState, stage: &StageParams, rad: f64) -> f64 {
        self.expand_canopy(state, stage);
        self.accumulate(state, stage, rad)
    }
}
