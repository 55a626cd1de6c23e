use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilLayer {
    pub depth_cm: u32,
    /// Field capacity (mm)
    pub fc: f64,
    /// Wilting point (mm)
    pub wp: f64,
    /// Saturated conductivity (mm/day)
    pub ks: f64,
    #[serde(default = "default_om_pct")]
    pub om_pct: f64,
    #[serde(default = "default_ph")]
    pub ph: f64,
}

fn default_om_pct() -> f64 {
    1.5
}

fn default_ph() -> f64 {
    6.5
}

impl SoilLayer {
    pub fn new(depth_cm: u32, fc: f64, wp: f64, ks: f64) -> Self {
        Self {
            depth_cm,
            fc,
            wp,
            ks,
            om_pct: default_om_pct(),
            ph: default_ph(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilProfile {
    pub layers: Vec<SoilLayer>,
    #[serde(default = "default_runoff_threshold")]
    pub runoff_threshold_mm: f64,
}

fn default_runoff_threshold() -> f64 {
    20.0
}

impl SoilProfile {
    pub fn new(layers: Vec<SoilLayer>) -> Self {
        Self {
            layers,
            runoff_threshold_mm: default_runoff_threshold(),
        }
    }

    pub fn single_layer(depth_cm: u32, fc: f64, wp: f64, ks: f64) -> Self {
        Self::new(vec![SoilLayer::new(depth_cm, fc, wp, ks)])
    }

    pub fn with_runoff_threshold(mut self, threshold_mm: f64) -> Self {
        self.runoff_threshold_mm = threshold_mm;
        self
    }

    /// Total plant-available water the bucket can hold (mm).
    pub fn rootzone_capacity(&self) -> f64 {
        self.layers.iter().map(|l| l.fc.max(0.0)).sum()
    }
}

impl Default for SoilProfile {
    fn default() -> Self {
        Self::single_layer(60, 150.0, 40.0, 50.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Management {
    pub plant_date: NaiveDate,
    pub density_plants_m2: f64,
    #[serde(default)]
    pub irrigation_mm_day: f64,
}

impl Management {
    pub fn new(plant_date: NaiveDate, density_plants_m2: f64) -> Self {
        Self {
            plant_date,
            density_plants_m2,
            irrigation_mm_day: 0.0,
        }
    }

    pub fn with_irrigation(mut self, mm_day: f64) -> Self {
        self.irrigation_mm_day = mm_day.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rootzone_capacity_sums_field_capacity() {
        let soil = SoilProfile::new(vec![
            SoilLayer::new(30, 80.0, 20.0, 40.0),
            SoilLayer::new(60, 70.0, 25.0, 30.0),
        ]);
        assert!((soil.rootzone_capacity() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn rootzone_capacity_ignores_negative_layers() {
        let soil = SoilProfile::new(vec![
            SoilLayer::new(30, 80.0, 20.0, 40.0),
            SoilLayer::new(60, -10.0, 0.0, 0.0),
        ]);
        assert!((soil.rootzone_capacity() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn default_profile_matches_reference_layer() {
        let soil = SoilProfile::default();
        assert_eq!(soil.layers.len(), 1);
        assert_eq!(soil.runoff_threshold_mm, 20.0);
        assert_eq!(soil.rootzone_capacity(), 150.0);
    }

    #[test]
    fn irrigation_never_negative() {
        let mgmt = Management::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 6.0)
            .with_irrigation(-2.0);
        assert_eq!(mgmt.irrigation_mm_day, 0.0);
    }
}
