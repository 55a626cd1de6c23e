use super::calculations::canopy_cover;
use crate::models::SoilProfile;

/// Fraction of inflow above the threshold lost as runoff.
const RUNOFF_FRACTION: f64 = 0.3;

const STRESS_EPSILON: f64 = 1e-6;

/// Lower bound on the water-stress factor.
pub const MIN_WATER_STRESS: f64 = 0.001;

/// Daily water fluxes (mm) and the resulting stress factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterFlux {
    pub runoff: f64,
    pub transpiration_potential: f64,
    pub transpiration: f64,
    pub evaporation: f64,
    pub stress_w: f64,
}

/// Single-bucket root-zone water balance.
#[derive(Debug, Clone, Copy)]
pub struct WaterBalance {
    capacity_mm: f64,
    runoff_threshold_mm: f64,
}

impl WaterBalance {
    pub fn new(soil: &SoilProfile) -> Self {
        Self {
            capacity_mm: soil.rootzone_capacity(),
            runoff_threshold_mm: soil.runoff_threshold_mm,
        }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity_mm
    }

    fn clamp(&self, water: f64) -> f64 {
        water.clamp(0.0, self.capacity_mm)
    }

    /// Apply one day of inflow and crop demand to `soil_water`.
    pub fn apply(&self, soil_water: &mut f64, inflow_mm: f64, etc_pot: f64, lai: f64) -> WaterFlux {
        let inflow = inflow_mm.max(0.0);
        let runoff = (inflow - self.runoff_threshold_mm).max(0.0) * RUNOFF_FRACTION;
        *soil_water = self.clamp(*soil_water + inflow - runoff);

        let cover = canopy_cover(lai);
        let transpiration_potential = etc_pot * cover;
        let transpiration = transpiration_potential.min(*soil_water);
        *soil_water = self.clamp(*soil_water - transpiration);

        let evaporation = ((etc_pot - transpiration).max(0.0) * (1.0 - cover)).min(*soil_water);
        *soil_water = self.clamp(*soil_water - evaporation);

        let stress_w = ((transpiration + STRESS_EPSILON)
            / (transpiration_potential + STRESS_EPSILON))
            .clamp(MIN_WATER_STRESS, 1.0);

        WaterFlux {
            runoff,
            transpiration_potential,
            transpiration,
            evaporation,
            stress_w,
        }
    }
}
