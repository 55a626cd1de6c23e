pub mod calculations;
pub mod growth;
pub mod nutrients;
pub mod phenology;
pub mod scheduler;
pub mod simulator;
pub mod water;
pub mod yield_estimate;

pub use growth::BiomassAccumulator;
pub use nutrients::NutrientTracker;
pub use phenology::PhenologyClock;
pub use scheduler::{build_harvest_plan, HarvestScheduler, DEFAULT_STORAGE_CAPACITY_T};
pub use simulator::{run_field, run_fields, FieldSimulator};
pub use water::{WaterBalance, WaterFlux};
pub use yield_estimate::{estimate_yield, YieldEstimate};
