use super::crop::{CropParams, Nutrient, NutrientAmounts};
use super::soil::{Management, SoilProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Initial soil water in the bucket before the first simulated day (mm).
pub const INITIAL_SOIL_WATER_MM: f64 = 120.0;

/// Initial leaf-area index at emergence.
pub const INITIAL_LAI: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    pub name: String,
    pub area_ha: f64,
    pub soil: SoilProfile,
    pub crop: CropParams,
    pub management: Management,
}

/// Cumulative uptake per stage ordinal and nutrient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptakeLedger {
    stages: Vec<NutrientAmounts>,
}

impl UptakeLedger {
    pub fn with_stages(count: usize) -> Self {
        Self {
            stages: vec![NutrientAmounts::default(); count],
        }
    }

    pub fn taken(&self, stage_index: usize, nutrient: Nutrient) -> f64 {
        self.stages
            .get(stage_index)
            .map(|a| a.get(nutrient))
            .unwrap_or(0.0)
    }

    pub fn record(&mut self, stage_index: usize, nutrient: Nutrient, amount: f64) {
        if self.stages.len() <= stage_index {
            self.stages
                .resize(stage_index + 1, NutrientAmounts::default());
        }
        self.stages[stage_index].add(nutrient, amount);
    }

    /// Total uptake of one nutrient across every stage.
    pub fn total(&self, nutrient: Nutrient) -> f64 {
        self.stages.iter().map(|a| a.get(nutrient)).sum()
    }

    pub fn stage_totals(&self) -> &[NutrientAmounts] {
        &self.stages
    }
}

/// Mutable per-field simulation state, owned by a single run.
#[derive(Debug, Clone)]
pub struct FieldState {
    pub date: NaiveDate,
    pub stage_index: usize,
    pub gdd_accum: f64,
    pub dap: u32,
    pub lai: f64,
    pub biomass_dm_kg_ha: f64,
    pub soil_water_mm: f64,
    pub stress_w: f64,
    pub stress_n: f64,
    pub stock_kg_ha: NutrientAmounts,
    pub uptake: UptakeLedger,
}

impl FieldState {
    pub fn new(date: NaiveDate, field: &FieldConfig) -> Self {
        Self {
            date,
            stage_index: 0,
            gdd_accum: 0.0,
            dap: 0,
            lai: INITIAL_LAI.min(field.crop.lai_max),
            biomass_dm_kg_ha: 0.0,
            soil_water_mm: INITIAL_SOIL_WATER_MM.min(field.soil.rootzone_capacity()),
            stress_w: 1.0,
            stress_n: 1.0,
            stock_kg_ha: NutrientAmounts::default(),
            uptake: UptakeLedger::with_stages(field.crop.stages.len()),
        }
    }
}

/// Immutable end-of-day snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    pub date: NaiveDate,
    pub stage: String,
    pub stage_index: usize,
    pub lai: f64,
    pub biomass_dm_kg_ha: f64,
    pub soil_water_mm: f64,
    pub stress_w: f64,
    pub stress_n: f64,
    pub n_stock_kg_ha: f64,
    pub p_stock_kg_ha: f64,
    pub k_stock_kg_ha: f64,
    pub gdd_progress: f64,
    pub gdd_target: Option<f64>,
    pub maturity_ratio: f64,
    pub crop: String,
}

impl DayResult {
    pub fn snapshot(state: &FieldState, crop: &CropParams) -> Self {
        let stage = crop
            .stage(state.stage_index)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        Self {
            date: state.date,
            stage,
            stage_index: state.stage_index,
            lai: state.lai,
            biomass_dm_kg_ha: state.biomass_dm_kg_ha,
            soil_water_mm: state.soil_water_mm,
            stress_w: state.stress_w,
            stress_n: state.stress_n,
            n_stock_kg_ha: state.stock_kg_ha.get(Nutrient::N),
            p_stock_kg_ha: state.stock_kg_ha.get(Nutrient::P),
            k_stock_kg_ha: state.stock_kg_ha.get(Nutrient::K),
            gdd_progress: state.gdd_accum,
            gdd_target: crop.final_gdd_target(),
            maturity_ratio: crop.maturity_ratio(state.gdd_accum, state.dap),
            crop: crop.species.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub field_id: String,
    pub series: Vec<DayResult>,
    pub yield_t_ha: Option<f64>,
    pub harvest_date: Option<NaiveDate>,
    pub grade: Option<Grade>,
}

impl RunResult {
    pub fn new(field_id: impl Into<String>, series: Vec<DayResult>) -> Self {
        Self {
            field_id: field_id.into(),
            series,
            yield_t_ha: None,
            harvest_date: None,
            grade: None,
        }
    }

    pub fn final_day(&self) -> Option<&DayResult> {
        self.series.last()
    }
}
