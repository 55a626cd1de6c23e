//! Built-in crop parameter sets.
//!
//! Values are planning-grade placeholders and should be calibrated against
//! field trials before being relied on.

use crate::models::{CropParams, StageParams, StressSensitivity};

#[allow(clippy::too_many_arguments)]
fn crop(
    species: &str,
    cultivar: &str,
    tb: f64,
    to: f64,
    lai_max: f64,
    hi: f64,
    sensitivity: (f64, f64, f64),
    stages: Vec<StageParams>,
) -> CropParams {
    CropParams {
        species: species.to_string(),
        cultivar: cultivar.to_string(),
        tb,
        to,
        lai_max,
        hi,
        stress_sensitivity: StressSensitivity {
            flower_water: sensitivity.0,
            grainfill_water: sensitivity.1,
            n: sensitivity.2,
        },
        stages,
    }
}

fn terminal(kc: f64, rue: f64) -> StageParams {
    StageParams::new("maturity")
        .with_growth(kc, rue, 0.0)
        .with_partition(0.0, 0.0, 0.0, 1.0)
}

// Cereals

pub fn maize() -> CropParams {
    crop(
        "maize",
        "DMR-Early",
        8.0,
        30.0,
        5.0,
        0.48,
        (0.6, 0.4, 0.5),
        vec![
            StageParams::new("incubation")
                .with_gdd(80.0)
                .with_growth(0.35, 0.8, 0.10)
                .with_partition(0.6, 0.4, 0.0, 0.0)
                .with_uptake(15.0, 5.0, 10.0),
            StageParams::new("vegetative")
                .with_gdd(650.0)
                .with_growth(1.05, 1.6, 0.16)
                .with_partition(0.45, 0.40, 0.15, 0.0)
                .with_uptake(80.0, 20.0, 60.0),
            StageParams::new("flowering")
                .with_gdd(850.0)
                .with_growth(1.20, 1.7, 0.10)
                .with_partition(0.25, 0.35, 0.10, 0.30)
                .with_uptake(40.0, 10.0, 30.0),
            StageParams::new("grainfill")
                .with_gdd(1200.0)
                .with_growth(0.95, 1.4, 0.06)
                .with_partition(0.10, 0.15, 0.05, 0.70)
                .with_uptake(20.0, 5.0, 15.0),
            terminal(0.6, 0.5),
        ],
    )
}

pub fn rice() -> CropParams {
    crop(
        "rice",
        "IR-64",
        10.0,
        30.0,
        6.0,
        0.50,
        (0.7, 0.5, 0.45),
        vec![
            StageParams::new("nursery")
                .with_dap(20)
                .with_growth(1.0, 1.5, 0.10)
                .with_partition(0.5, 0.4, 0.1, 0.0)
                .with_uptake(25.0, 10.0, 25.0),
            StageParams::new("vegetative")
                .with_dap(60)
                .with_growth(1.1, 1.8, 0.15)
                .with_partition(0.4, 0.4, 0.2, 0.0)
                .with_uptake(60.0, 20.0, 50.0),
            StageParams::new("flowering")
                .with_dap(90)
                .with_growth(1.2, 1.9, 0.08)
                .with_partition(0.2, 0.3, 0.1, 0.4)
                .with_uptake(30.0, 10.0, 30.0),
            StageParams::new("grainfill")
                .with_dap(120)
                .with_growth(1.1, 1.5, 0.06)
                .with_partition(0.1, 0.1, 0.05, 0.75)
                .with_uptake(20.0, 6.0, 25.0),
            terminal(0.8, 0.9),
        ],
    )
}

pub fn sorghum() -> CropParams {
    crop(
        "sorghum",
        "Macia",
        8.0,
        32.0,
        4.5,
        0.45,
        (0.6, 0.4, 0.5),
        vec![
            StageParams::new("emergence")
                .with_dap(10)
                .with_growth(0.4, 1.0, 0.08)
                .with_partition(0.7, 0.2, 0.1, 0.0)
                .with_uptake(10.0, 4.0, 15.0),
            StageParams::new("vegetative")
                .with_dap(45)
                .with_growth(1.05, 1.6, 0.15)
                .with_partition(0.45, 0.35, 0.20, 0.0)
                .with_uptake(50.0, 15.0, 40.0),
            StageParams::new("flowering")
                .with_dap(75)
                .with_growth(1.2, 1.7, 0.08)
                .with_partition(0.25, 0.25, 0.10, 0.40)
                .with_uptake(30.0, 8.0, 30.0),
            StageParams::new("grainfill")
                .with_dap(105)
                .with_growth(1.0, 1.4, 0.05)
                .with_partition(0.10, 0.10, 0.05, 0.75)
                .with_uptake(15.0, 5.0, 20.0),
            terminal(0.85, 0.8),
        ],
    )
}

// Root and tuber crops

pub fn cassava() -> CropParams {
    crop(
        "cassava",
        "Local-12m",
        12.0,
        30.0,
        4.0,
        0.55,
        (0.3, 0.3, 0.4),
        vec![
            StageParams::new("incubation")
                .with_dap(15)
                .with_growth(0.4, 0.9, 0.09)
                .with_partition(0.6, 0.3, 0.1, 0.0)
                .with_uptake(10.0, 5.0, 15.0),
            StageParams::new("vegetative")
                .with_dap(120)
                .with_growth(1.0, 1.5, 0.14)
                .with_partition(0.45, 0.35, 0.20, 0.0)
                .with_uptake(60.0, 20.0, 80.0),
            StageParams::new("bulking")
                .with_dap(300)
                .with_growth(1.05, 1.4, 0.08)
                .with_partition(0.20, 0.25, 0.15, 0.40)
                .with_uptake(30.0, 10.0, 60.0),
            StageParams::new("maturity")
                .with_dap(360)
                .with_growth(0.9, 1.0, 0.02)
                .with_partition(0.05, 0.10, 0.10, 0.75)
                .with_uptake(10.0, 5.0, 20.0),
        ],
    )
}

pub fn yams() -> CropParams {
    crop(
        "yam",
        "White Yam",
        12.0,
        30.0,
        4.5,
        0.60,
        (0.4, 0.3, 0.4),
        vec![
            StageParams::new("sprouting")
                .with_dap(20)
                .with_growth(0.5, 1.0, 0.08)
                .with_partition(0.6, 0.3, 0.1, 0.0)
                .with_uptake(15.0, 6.0, 20.0),
            StageParams::new("vegetative")
                .with_dap(100)
                .with_growth(1.0, 1.6, 0.14)
                .with_partition(0.45, 0.35, 0.20, 0.0)
                .with_uptake(70.0, 25.0, 60.0),
            StageParams::new("tuberization")
                .with_dap(240)
                .with_growth(1.05, 1.4, 0.08)
                .with_partition(0.20, 0.25, 0.15, 0.40)
                .with_uptake(35.0, 12.0, 50.0),
            StageParams::new("maturity")
                .with_dap(300)
                .with_growth(0.9, 1.0, 0.02)
                .with_partition(0.05, 0.10, 0.10, 0.75)
                .with_uptake(10.0, 4.0, 15.0),
        ],
    )
}

// Vegetables

pub fn tomato() -> CropParams {
    crop(
        "tomato",
        "Field-Det",
        10.0,
        28.0,
        4.5,
        0.65,
        (0.6, 0.5, 0.5),
        vec![
            StageParams::new("incubation")
                .with_gdd(80.0)
                .with_growth(0.5, 1.2, 0.10)
                .with_partition(0.6, 0.35, 0.05, 0.0)
                .with_uptake(20.0, 8.0, 18.0),
            StageParams::new("vegetative")
                .with_gdd(400.0)
                .with_growth(1.05, 1.6, 0.16)
                .with_partition(0.45, 0.35, 0.20, 0.0)
                .with_uptake(60.0, 20.0, 60.0),
            StageParams::new("flowering")
                .with_gdd(600.0)
                .with_growth(1.15, 1.7, 0.10)
                .with_partition(0.25, 0.25, 0.10, 0.40)
                .with_uptake(30.0, 10.0, 40.0),
            StageParams::new("fruitfill")
                .with_gdd(900.0)
                .with_growth(1.15, 1.5, 0.06)
                .with_partition(0.10, 0.15, 0.05, 0.70)
                .with_uptake(20.0, 8.0, 50.0),
            terminal(0.9, 0.8),
        ],
    )
}

pub fn pepper() -> CropParams {
    crop(
        "pepper",
        "Capsicum-Field",
        10.0,
        28.0,
        4.0,
        0.60,
        (0.55, 0.45, 0.45),
        vec![
            StageParams::new("incubation")
                .with_gdd(90.0)
                .with_growth(0.5, 1.1, 0.09)
                .with_partition(0.6, 0.35, 0.05, 0.0)
                .with_uptake(18.0, 7.0, 16.0),
            StageParams::new("vegetative")
                .with_gdd(420.0)
                .with_growth(1.0, 1.5, 0.15)
                .with_partition(0.45, 0.35, 0.20, 0.0)
                .with_uptake(55.0, 18.0, 55.0),
            StageParams::new("flowering")
                .with_gdd(620.0)
                .with_growth(1.1, 1.6, 0.10)
                .with_partition(0.20, 0.25, 0.10, 0.45)
                .with_uptake(25.0, 9.0, 35.0),
            StageParams::new("fruitfill")
                .with_gdd(950.0)
                .with_growth(1.1, 1.4, 0.06)
                .with_partition(0.10, 0.15, 0.05, 0.70)
                .with_uptake(18.0, 7.0, 40.0),
            terminal(0.9, 0.8),
        ],
    )
}

pub fn onion() -> CropParams {
    crop(
        "onion",
        "Bulb-IntermediateDay",
        5.0,
        22.0,
        3.0,
        0.75,
        (0.5, 0.5, 0.4),
        vec![
            StageParams::new("incubation")
                .with_gdd(60.0)
                .with_growth(0.45, 1.0, 0.08)
                .with_partition(0.7, 0.2, 0.1, 0.0)
                .with_uptake(15.0, 6.0, 18.0),
            StageParams::new("leaf")
                .with_gdd(300.0)
                .with_growth(0.95, 1.4, 0.14)
                .with_partition(0.55, 0.25, 0.20, 0.0)
                .with_uptake(50.0, 15.0, 50.0),
            StageParams::new("bulbinit")
                .with_gdd(450.0)
                .with_growth(1.05, 1.4, 0.10)
                .with_partition(0.30, 0.10, 0.10, 0.50)
                .with_uptake(25.0, 8.0, 35.0),
            StageParams::new("bulbing")
                .with_gdd(700.0)
                .with_growth(1.05, 1.2, 0.06)
                .with_partition(0.10, 0.05, 0.05, 0.80)
                .with_uptake(15.0, 5.0, 30.0),
            terminal(0.85, 0.7),
        ],
    )
}

pub fn garlic() -> CropParams {
    crop(
        "garlic",
        "Softneck",
        3.0,
        20.0,
        2.8,
        0.72,
        (0.45, 0.45, 0.35),
        vec![
            StageParams::new("incubation")
                .with_gdd(40.0)
                .with_growth(0.45, 0.9, 0.07)
                .with_partition(0.7, 0.2, 0.1, 0.0)
                .with_uptake(12.0, 5.0, 15.0),
            StageParams::new("leaf")
                .with_gdd(250.0)
                .with_growth(0.95, 1.3, 0.12)
                .with_partition(0.55, 0.25, 0.20, 0.0)
                .with_uptake(40.0, 12.0, 45.0),
            StageParams::new("bulb")
                .with_gdd(520.0)
                .with_growth(1.0, 1.1, 0.06)
                .with_partition(0.10, 0.05, 0.05, 0.80)
                .with_uptake(18.0, 6.0, 28.0),
            terminal(0.8, 0.7),
        ],
    )
}

pub fn carrot() -> CropParams {
    crop(
        "carrot",
        "Nantes",
        4.0,
        22.0,
        3.5,
        0.80,
        (0.4, 0.4, 0.35),
        vec![
            StageParams::new("incubation")
                .with_gdd(50.0)
                .with_growth(0.45, 1.0, 0.08)
                .with_partition(0.7, 0.2, 0.1, 0.0)
                .with_uptake(10.0, 4.0, 15.0),
            StageParams::new("vegetative")
                .with_gdd(300.0)
                .with_growth(0.95, 1.4, 0.14)
                .with_partition(0.50, 0.20, 0.30, 0.0)
                .with_uptake(40.0, 12.0, 50.0),
            StageParams::new("bulking")
                .with_gdd(650.0)
                .with_growth(1.0, 1.2, 0.07)
                .with_partition(0.10, 0.10, 0.10, 0.70)
                .with_uptake(20.0, 6.0, 35.0),
            terminal(0.85, 0.7),
        ],
    )
}

pub fn spinach() -> CropParams {
    crop(
        "spinach",
        "AgroSpin-F1",
        5.0,
        20.0,
        3.0,
        0.75,
        (0.5, 0.4, 0.3),
        vec![
            StageParams::new("germination")
                .with_dap(10)
                .with_growth(0.5, 0.9, 0.08)
                .with_partition(0.8, 0.1, 0.1, 0.0)
                .with_uptake(10.0, 4.0, 12.0),
            StageParams::new("vegetative")
                .with_dap(30)
                .with_growth(1.1, 1.2, 0.14)
                .with_partition(0.70, 0.15, 0.15, 0.0)
                .with_uptake(25.0, 10.0, 30.0),
            StageParams::new("harvest")
                .with_dap(45)
                .with_growth(0.9, 1.0, 0.02)
                .with_partition(1.0, 0.0, 0.0, 0.0),
        ],
    )
}

pub fn cucumber() -> CropParams {
    crop(
        "cucumber",
        "Field-Cu",
        8.0,
        30.0,
        4.0,
        0.70,
        (0.6, 0.5, 0.4),
        vec![
            StageParams::new("incubation")
                .with_gdd(50.0)
                .with_growth(0.5, 1.0, 0.10)
                .with_partition(0.7, 0.2, 0.1, 0.0)
                .with_uptake(15.0, 6.0, 15.0),
            StageParams::new("vegetative")
                .with_gdd(200.0)
                .with_growth(1.0, 1.4, 0.14)
                .with_partition(0.55, 0.25, 0.20, 0.0)
                .with_uptake(40.0, 12.0, 40.0),
            StageParams::new("flowering")
                .with_gdd(300.0)
                .with_growth(1.1, 1.6, 0.10)
                .with_partition(0.25, 0.25, 0.10, 0.40)
                .with_uptake(20.0, 7.0, 25.0),
            StageParams::new("fruitfill")
                .with_gdd(450.0)
                .with_growth(1.1, 1.5, 0.06)
                .with_partition(0.10, 0.15, 0.05, 0.70)
                .with_uptake(15.0, 5.0, 30.0),
            terminal(0.9, 0.8),
        ],
    )
}

// Legumes

pub fn beans() -> CropParams {
    crop(
        "beans",
        "Common Bean",
        10.0,
        28.0,
        3.5,
        0.60,
        (0.6, 0.5, 0.4),
        vec![
            StageParams::new("germination")
                .with_dap(7)
                .with_growth(0.5, 1.0, 0.10)
                .with_partition(0.6, 0.2, 0.2, 0.0)
                .with_uptake(10.0, 4.0, 12.0),
            StageParams::new("vegetative")
                .with_dap(30)
                .with_growth(1.0, 1.4, 0.14)
                .with_partition(0.50, 0.20, 0.30, 0.0)
                .with_uptake(25.0, 8.0, 30.0),
            StageParams::new("flowering")
                .with_dap(45)
                .with_growth(1.1, 1.5, 0.10)
                .with_partition(0.25, 0.20, 0.10, 0.45)
                .with_uptake(20.0, 6.0, 25.0),
            terminal(0.9, 0.8),
        ],
    )
}

pub fn cowpea() -> CropParams {
    crop(
        "cowpea",
        "Local Cowpea",
        10.0,
        28.0,
        3.0,
        0.65,
        (0.6, 0.5, 0.45),
        vec![
            StageParams::new("germination")
                .with_dap(7)
                .with_growth(0.5, 1.0, 0.09)
                .with_partition(0.6, 0.2, 0.2, 0.0)
                .with_uptake(10.0, 4.0, 12.0),
            StageParams::new("vegetative")
                .with_dap(25)
                .with_growth(1.0, 1.3, 0.13)
                .with_partition(0.50, 0.20, 0.30, 0.0)
                .with_uptake(20.0, 7.0, 25.0),
            StageParams::new("flowering")
                .with_dap(40)
                .with_growth(1.1, 1.4, 0.08)
                .with_partition(0.25, 0.20, 0.10, 0.45)
                .with_uptake(15.0, 6.0, 20.0),
            terminal(0.9, 0.8),
        ],
    )
}

pub fn mung_bean() -> CropParams {
    crop(
        "mung bean",
        "Vermic",
        10.0,
        30.0,
        3.0,
        0.70,
        (0.6, 0.5, 0.4),
        vec![
            StageParams::new("germination")
                .with_dap(7)
                .with_growth(0.5, 1.0, 0.10)
                .with_partition(0.6, 0.2, 0.2, 0.0)
                .with_uptake(10.0, 4.0, 12.0),
            StageParams::new("vegetative")
                .with_dap(25)
                .with_growth(1.0, 1.3, 0.14)
                .with_partition(0.50, 0.20, 0.30, 0.0)
                .with_uptake(20.0, 7.0, 25.0),
            StageParams::new("flowering")
                .with_dap(35)
                .with_growth(1.1, 1.4, 0.08)
                .with_partition(0.25, 0.20, 0.10, 0.45)
                .with_uptake(15.0, 6.0, 20.0),
            terminal(0.9, 0.8),
        ],
    )
}

/// Lookup key and constructor for every built-in crop.
pub fn builtin_crops() -> Vec<(&'static str, CropParams)> {
    vec![
        ("maize", maize()),
        ("rice", rice()),
        ("sorghum", sorghum()),
        ("cassava", cassava()),
        ("yams", yams()),
        ("tomato", tomato()),
        ("pepper", pepper()),
        ("onion", onion()),
        ("garlic", garlic()),
        ("carrot", carrot()),
        ("spinach", spinach()),
        ("cucumber", cucumber()),
        ("beans", beans()),
        ("cowpea", cowpea()),
        ("mung bean", mung_bean()),
    ]
}

/// Display groupings for crop listings.
pub fn categories() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("Cereals", vec!["Maize", "Rice", "Sorghum"]),
        ("Root and Tuber Crops", vec!["Cassava", "Yams"]),
        (
            "Vegetables",
            vec![
                "Spinach", "Cucumber", "Tomato", "Onion", "Pepper", "Garlic", "Carrot",
            ],
        ),
        ("Legumes", vec!["Beans", "Cowpea", "Mung Bean"]),
    ]
}

/// Business baselines: (name, tonnes per acre, typical cycle days).
pub fn baselines() -> Vec<(&'static str, f64, u32)> {
    vec![
        ("Maize", 3.5, 110),
        ("Rice", 2.8, 120),
        ("Sorghum", 2.2, 100),
        ("Cassava", 10.0, 300),
        ("Yams", 7.0, 270),
        ("Spinach", 8.0, 45),
        ("Cucumber", 6.0, 55),
        ("Tomato", 5.5, 85),
        ("Onion", 4.5, 90),
        ("Pepper", 3.8, 90),
        ("Beans", 2.0, 80),
        ("Cowpea", 1.8, 75),
        ("Mung Bean", 1.5, 70),
    ]
}
