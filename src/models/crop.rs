use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nutrient {
    N,
    P,
    K,
}

impl Nutrient {
    pub fn all() -> &'static [Nutrient] {
        &[Nutrient::N, Nutrient::P, Nutrient::K]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::N => "Nitrogen",
            Nutrient::P => "Phosphorus",
            Nutrient::K => "Potassium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" | "nitrogen" => Some(Nutrient::N),
            "p" | "phosphorus" => Some(Nutrient::P),
            "k" | "potassium" => Some(Nutrient::K),
            _ => None,
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-nutrient quantities in kg/ha, serialized as `{"N": .., "P": .., "K": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientAmounts {
    #[serde(rename = "N", default)]
    pub n: f64,
    #[serde(rename = "P", default)]
    pub p: f64,
    #[serde(rename = "K", default)]
    pub k: f64,
}

impl NutrientAmounts {
    pub fn new(n: f64, p: f64, k: f64) -> Self {
        Self { n, p, k }
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::N => self.n,
            Nutrient::P => self.p,
            Nutrient::K => self.k,
        }
    }

    pub fn add(&mut self, nutrient: Nutrient, amount: f64) {
        match nutrient {
            Nutrient::N => self.n += amount,
            Nutrient::P => self.p += amount,
            Nutrient::K => self.k += amount,
        }
    }

    /// Nutrients with a strictly positive quantity, in N/P/K order.
    pub fn demanded(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::all()
            .iter()
            .map(move |n| (*n, self.get(*n)))
            .filter(|(_, v)| *v > 0.0)
    }
}

/// Harvest-index sensitivity to stress during reproductive stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StressSensitivity {
    #[serde(default)]
    pub flower_water: f64,
    #[serde(default)]
    pub grainfill_water: f64,
    #[serde(default)]
    pub n: f64,
}

/// Threshold that moves a stage forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageTarget {
    ThermalTime(f64),
    DaysAfterPlanting(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdd_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dap_target: Option<u32>,
    #[serde(default = "default_kc")]
    pub kc: f64,
    #[serde(default = "default_rue")]
    pub rue: f64,
    #[serde(default = "default_lai_gain")]
    pub lai_gain: f64,
    #[serde(default)]
    pub partition: BTreeMap<String, f64>,
    #[serde(default)]
    pub nuptake_target: NutrientAmounts,
}

fn default_kc() -> f64 {
    1.0
}

fn default_rue() -> f64 {
    1.5
}

fn default_lai_gain() -> f64 {
    0.12
}

impl StageParams {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            gdd_target: None,
            dap_target: None,
            kc: default_kc(),
            rue: default_rue(),
            lai_gain: default_lai_gain(),
            partition: BTreeMap::new(),
            nuptake_target: NutrientAmounts::default(),
        }
    }

    pub fn with_gdd(mut self, target: f64) -> Self {
        self.gdd_target = Some(target);
        self
    }

    pub fn with_dap(mut self, target: u32) -> Self {
        self.dap_target = Some(target);
        self
    }

    pub fn with_growth(mut self, kc: f64, rue: f64, lai_gain: f64) -> Self {
        self.kc = kc;
        self.rue = rue;
        self.lai_gain = lai_gain;
        self
    }

    pub fn with_partition(mut self, leaf: f64, stem: f64, root: f64, storage: f64) -> Self {
        self.partition = BTreeMap::from([
            ("leaf".to_string(), leaf),
            ("stem".to_string(), stem),
            ("root".to_string(), root),
            ("storage".to_string(), storage),
        ]);
        self
    }

    pub fn with_uptake(mut self, n: f64, p: f64, k: f64) -> Self {
        self.nuptake_target = NutrientAmounts::new(n, p, k);
        self
    }

    /// Thermal time wins when both targets are set.
    pub fn target(&self) -> Option<StageTarget> {
        match (self.gdd_target, self.dap_target) {
            (Some(gdd), _) => Some(StageTarget::ThermalTime(gdd)),
            (None, Some(dap)) => Some(StageTarget::DaysAfterPlanting(dap)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropParams {
    pub species: String,
    pub cultivar: String,
    /// Base temperature (°C)
    pub tb: f64,
    /// Optimum temperature (°C)
    pub to: f64,
    pub lai_max: f64,
    /// Harvest index
    pub hi: f64,
    #[serde(default)]
    pub stress_sensitivity: StressSensitivity,
    pub stages: Vec<StageParams>,
}

impl CropParams {
    pub fn stage(&self, index: usize) -> Option<&StageParams> {
        self.stages.get(index)
    }

    pub fn last_stage_index(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// Thermal-time target of the terminal stage, as reported on day results.
    pub fn final_gdd_target(&self) -> Option<f64> {
        self.stages.last().and_then(|s| s.gdd_target)
    }

    /// Progress toward physiological maturity in [0, 1].
    ///
    /// Measured against the last stage that defines a thermal-time target, or
    /// the last day-count target for crops staged purely by calendar.
    pub fn maturity_ratio(&self, gdd_accum: f64, dap: u32) -> f64 {
        let ratio = if let Some(gdd) = self.stages.iter().rev().find_map(|s| s.gdd_target) {
            if gdd > 0.0 {
                gdd_accum / gdd
            } else {
                1.0
            }
        } else if let Some(days) = self.stages.iter().rev().find_map(|s| s.dap_target) {
            if days > 0 {
                dap as f64 / days as f64
            } else {
                1.0
            }
        } else {
            0.0
        };
        ratio.clamp(0.0, 1.0)
    }
}
