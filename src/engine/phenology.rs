use super::calculations::gdd_day;
use crate::models::{CropParams, FieldState, StageTarget, WeatherDay};

/// Thermal-time and calendar clock driving stage transitions.
pub struct PhenologyClock<'a> {
    crop: &'a CropParams,
}

impl<'a> PhenologyClock<'a> {
    pub fn new(crop: &'a CropParams) -> Self {
        Self { crop }
    }

    /// Record the day and accumulate thermal time.
    pub fn tick(&self, state: &mut FieldState, day: &WeatherDay) {
        state.date = day.date;
        state.dap += 1;
        state.gdd_accum += gdd_day(day.tmin, day.tmax, self.crop.tb);
    }

    pub fn target_reached(&self, state: &FieldState) -> bool {
        match self.crop.stage(state.stage_index).and_then(|s| s.target()) {
            Some(StageTarget::ThermalTime(gdd)) => state.gdd_accum >= gdd,
            Some(StageTarget::DaysAfterPlanting(days)) => state.dap >= days,
            None => false,
        }
    }

    /// Move to the next stage if the current target is met.
    ///
    /// At most one stage per call, even when accumulated thermal time already
    /// covers several targets.
    pub fn advance(&self, state: &mut FieldState) -> bool {
        if state.stage_index < self.crop.last_stage_index() && self.target_reached(state) {
            state.stage_index += 1;
            true
        } else {
            false
        }
    }
}
