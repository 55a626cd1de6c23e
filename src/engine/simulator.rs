use super::calculations::{etc_from_kc, reference_et0};
use super::growth::BiomassAccumulator;
use super::nutrients::NutrientTracker;
use super::phenology::PhenologyClock;
use super::water::WaterBalance;
use super::yield_estimate::estimate_yield;
use crate::error::{CropCastError, Result};
use crate::models::{DayResult, FieldConfig, FieldState, RunResult, WeatherDay};
use rayon::prelude::*;

/// Daily simulation for a single field.
pub struct FieldSimulator<'a> {
    field: &'a FieldConfig,
    clock: PhenologyClock<'a>,
    water: WaterBalance,
    nutrients: NutrientTracker<'a>,
    growth: BiomassAccumulator<'a>,
}

impl<'a> FieldSimulator<'a> {
    pub fn new(field: &'a FieldConfig) -> Self {
        Self {
            field,
            clock: PhenologyClock::new(&field.crop),
            water: WaterBalance::new(&field.soil),
            nutrients: NutrientTracker::new(&field.crop),
            growth: BiomassAccumulator::new(&field.crop),
        }
    }

    pub fn initial_state(&self, start: &WeatherDay) -> FieldState {
        FieldState::new(start.date, self.field)
    }

    /// Advance `state` by one day of weather and return the day's snapshot.
    ///
    /// Crop coefficients come from the stage active at the start of the day;
    /// the stage transition, if any, is applied last.
    pub fn step(&self, state: &mut FieldState, day: &WeatherDay) -> Result<DayResult> {
        let crop = &self.field.crop;
        let stage_index = state.stage_index;
        let stage = crop.stage(stage_index).ok_or_else(|| {
            CropCastError::InvalidInput(format!(
                "crop '{}' has no stage {}",
                crop.species, stage_index
            ))
        })?;

        self.clock.tick(state, day);

        let etc_pot = etc_from_kc(reference_et0(day), stage.kc);
        let inflow = day.rain + self.field.management.irrigation_mm_day.max(0.0);
        let flux = self
            .water
            .apply(&mut state.soil_water_mm, inflow, etc_pot, state.lai);
        state.stress_w = flux.stress_w;

        self.nutrients.uptake(state, stage_index);
        let gain = self.growth.grow(state, stage, day.rad);
        let advanced = self.clock.advance(state);

        tracing::debug!(
            field = %self.field.id,
            date = %day.date,
            dap = state.dap,
            stage = %stage.name,
            advanced,
            runoff = flux.runoff,
            transpiration = flux.transpiration,
            evaporation = flux.evaporation,
            stress_w = state.stress_w,
            stress_n = state.stress_n,
            biomass_gain = gain,
            "Simulated day"
        );

        Ok(DayResult::snapshot(state, crop))
    }

    /// Run the whole weather series and estimate yield from the result.
    pub fn run(&self, weather: &[WeatherDay]) -> Result<RunResult> {
        let first = weather.first().ok_or_else(|| {
            CropCastError::InvalidInput(format!(
                "no weather data available for field '{}'",
                self.field.id
            ))
        })?;

        let mut state = self.initial_state(first);
        let series = weather
            .iter()
            .map(|day| self.step(&mut state, day))
            .collect::<Result<Vec<_>>>()?;

        let estimate = estimate_yield(&self.field.crop, &series)?;
        tracing::info!(
            field = %self.field.id,
            crop = %self.field.crop.species,
            days = series.len(),
            yield_t_ha = estimate.yield_t_ha,
            harvest_date = %estimate.harvest_date,
            grade = %estimate.grade,
            "Simulation complete"
        );

        let mut result = RunResult::new(self.field.id.clone(), series);
        result.yield_t_ha = Some(estimate.yield_t_ha);
        result.harvest_date = Some(estimate.harvest_date);
        result.grade = Some(estimate.grade);
        Ok(result)
    }
}

pub fn run_field(field: &FieldConfig, weather: &[WeatherDay]) -> Result<RunResult> {
    FieldSimulator::new(field).run(weather)
}

/// Simulate every field against the same weather, in parallel.
///
/// Results come back in input order.
pub fn run_fields(fields: &[FieldConfig], weather: &[WeatherDay]) -> Result<Vec<RunResult>> {
    fields
        .par_iter()
        .map(|field| run_field(field, weather))
        .collect()
}
