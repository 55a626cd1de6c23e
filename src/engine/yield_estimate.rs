use crate::error::{CropCastError, Result};
use crate::models::{CropParams, DayResult, Grade};
use chrono::NaiveDate;
use serde::Serialize;

const FLOWERING: &str = "flowering";
const GRAINFILL: &str = "grainfill";
const MATURITY: &str = "maturity";

/// Bounds applied to the stress-adjusted harvest index.
const HI_MIN: f64 = 0.3;
const HI_MAX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldEstimate {
    pub yield_t_ha: f64,
    pub harvest_date: NaiveDate,
    pub grade: Grade,
    pub flower_min_stress_w: f64,
    pub grain_min_stress_w: f64,
    pub harvest_index: f64,
}

fn stage_min_stress(series: &[DayResult], stage: &str) -> f64 {
    series
        .iter()
        .filter(|d| d.stage == stage)
        .map(|d| d.stress_w)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
        .unwrap_or(1.0)
}

pub fn grade_for(avg_stress: f64) -> Grade {
    if avg_stress > 0.8 {
        Grade::A
    } else if avg_stress > 0.6 {
        Grade::B
    } else {
        Grade::C
    }
}

/// First day after the first whose stage is grain fill or maturity, else the last day.
pub fn harvest_date(series: &[DayResult]) -> Option<NaiveDate> {
    series
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, d)| d.stage == MATURITY || d.stage == GRAINFILL)
        .map(|(_, d)| d.date)
        .or_else(|| series.last().map(|d| d.date))
}

/// Yield, harvest date and grade from a finished daily series.
pub fn estimate_yield(crop: &CropParams, series: &[DayResult]) -> Result<YieldEstimate> {
    let last = series.last().ok_or_else(|| {
        CropCastError::InvalidInput("cannot estimate yield from an empty series".to_string())
    })?;

    let flower_min = stage_min_stress(series, FLOWERING);
    let grain_min = stage_min_stress(series, GRAINFILL);

    let sens = &crop.stress_sensitivity;
    let penalty =
        1.0 - sens.flower_water * (1.0 - flower_min) - sens.grainfill_water * (1.0 - grain_min);
    let harvest_index = (crop.hi * penalty).clamp(HI_MIN, HI_MAX);
    let yield_t_ha = (last.biomass_dm_kg_ha * harvest_index / 1000.0).max(0.0);

    Ok(YieldEstimate {
        yield_t_ha,
        harvest_date: harvest_date(series).unwrap_or(last.date),
        grade: grade_for((flower_min + grain_min) / 2.0),
        flower_min_stress_w: flower_min,
        grain_min_stress_w: grain_min,
        harvest_index,
    })
}
