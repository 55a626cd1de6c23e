use crate::models::{
    DayResult, FarmLayout, Grade, HarvestPlan, HarvestTask, PlanSummary, PlannedHarvest,
    RunResult, StatusColor,
};
use chrono::NaiveDate;

/// Final-day water stress below which a zone is painted as stressed.
const STRESSED_ZONE_THRESHOLD: f64 = 0.6;

pub const DEFAULT_STORAGE_CAPACITY_T: f64 = 100.0;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Cross-field harvest queue plus the zone colours that mirror it.
#[derive(Debug, Clone, Default)]
pub struct HarvestScheduler {
    tasks: Vec<HarvestTask>,
    layout: FarmLayout,
}

impl HarvestScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[HarvestTask] {
        &self.tasks
    }

    pub fn layout(&self) -> &FarmLayout {
        &self.layout
    }

    pub fn task(&self, field_id: &str) -> Option<&HarvestTask> {
        self.tasks.iter().find(|t| t.field_id == field_id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &HarvestTask> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &HarvestTask> {
        self.tasks.iter().filter(|t| t.completed)
    }

    /// Queue a harvest task for a simulated field and refresh its zone colour.
    ///
    /// Returns `false` when a task for the same field and crop already exists;
    /// the zone is still refreshed.
    pub fn register(
        &mut self,
        field_id: &str,
        crop: &str,
        series: &[DayResult],
        expected_yield_t: f64,
        harvest_date: NaiveDate,
        maturity: f64,
    ) -> bool {
        let maturity = maturity.clamp(0.0, 1.0);
        let exists = self
            .tasks
            .iter()
            .any(|t| t.field_id == field_id && t.crop == crop);
        if !exists {
            self.tasks.push(HarvestTask::new(
                field_id,
                crop,
                harvest_date,
                expected_yield_t.max(0.0),
                maturity,
            ));
        }

        let stress_w = series.last().map(|d| d.stress_w).unwrap_or(1.0);
        let zone = self.layout.zone_mut_or_insert(field_id);
        zone.maturity_ratio = maturity;
        zone.moisture_status = stress_w;
        zone.color = if stress_w < STRESSED_ZONE_THRESHOLD {
            StatusColor::Stressed
        } else {
            StatusColor::for_maturity(maturity)
        };

        tracing::debug!(
            field = field_id,
            crop,
            maturity,
            color = zone.color.hex(),
            inserted = !exists,
            "Registered harvest task"
        );
        !exists
    }

    /// Register a finished run; maturity defaults to the final day's ratio.
    pub fn register_run(&mut self, run: &RunResult, maturity: Option<f64>) -> bool {
        let last = match run.final_day() {
            Some(d) => d,
            None => {
                tracing::warn!(field = %run.field_id, "Skipping run with empty series");
                return false;
            }
        };
        let crop = if last.crop.is_empty() {
            "unknown"
        } else {
            last.crop.as_str()
        };
        self.register(
            &run.field_id,
            crop,
            &run.series,
            run.yield_t_ha.unwrap_or(0.0),
            run.harvest_date.unwrap_or(last.date),
            maturity.unwrap_or(last.maturity_ratio),
        )
    }

    /// Date-ordered plan that stops once storage is used up.
    ///
    /// The task that exhausts the capacity is still included.
    pub fn plan(&self, storage_capacity_t: f64) -> Vec<PlannedHarvest> {
        let mut ordered: Vec<&HarvestTask> = self.tasks.iter().collect();
        ordered.sort_by_key(|t| t.planned_date);

        let mut remaining = storage_capacity_t;
        let mut plan = Vec::new();
        for task in ordered {
            plan.push(PlannedHarvest {
                field_id: task.field_id.clone(),
                crop: task.crop.clone(),
                planned_date: task.planned_date,
                expected_yield_t: round2(task.expected_yield_t),
                grade: if task.is_ready() { Grade::A } else { Grade::B },
                maturity_ratio: task.maturity_ratio,
                ripe_color: StatusColor::for_maturity(task.maturity_ratio),
            });
            remaining -= task.expected_yield_t;
            if remaining <= 0.0 {
                break;
            }
        }
        plan
    }

    pub fn mark_completed(&mut self, field_id: &str, actual_yield_t: f64) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.field_id == field_id) else {
            return false;
        };
        task.actual_yield_t = Some(actual_yield_t);
        task.completed = true;
        task.ripe_color = StatusColor::Harvested;
        if let Some(zone) = self.layout.zone_mut(field_id) {
            zone.color = StatusColor::Harvested;
        }
        tracing::info!(field = field_id, actual_yield_t, "Harvest completed");
        true
    }

    pub fn summarize(&self) -> PlanSummary {
        let total = self.tasks.len();
        let average_maturity = if total == 0 {
            0.0
        } else {
            round2(self.tasks.iter().map(|t| t.maturity_ratio).sum::<f64>() / total as f64)
        };
        PlanSummary {
            total_fields: total,
            pending: self.pending().count(),
            completed: self.completed().count(),
            average_maturity,
        }
    }

    pub fn build_plan(&self, storage_capacity_t: f64) -> HarvestPlan {
        let plan = self.plan(storage_capacity_t);
        tracing::info!(
            fields = self.tasks.len(),
            planned = plan.len(),
            storage_capacity_t,
            "Built harvest plan"
        );
        HarvestPlan {
            summary: self.summarize(),
            plan,
            fields: self.tasks.clone(),
            timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

/// Register every run in order and build a plan in one call.
pub fn build_harvest_plan(results: &[RunResult], storage_capacity_t: f64) -> HarvestPlan {
    let mut scheduler = HarvestScheduler::new();
    for run in results {
        scheduler.register_run(run, None);
    }
    scheduler.build_plan(storage_capacity_t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn series(stress_w: f64, maturity: f64) -> Vec<DayResult> {
        vec![DayResult {
            date: date(1),
            stage: "grainfill".into(),
            stage_index: 3,
            lai: 3.0,
            biomass_dm_kg_ha: 9000.0,
            soil_water_mm: 60.0,
            stress_w,
            stress_n: 1.0,
            n_stock_kg_ha: 0.0,
            p_stock_kg_ha: 0.0,
            k_stock_kg_ha: 0.0,
            gdd_progress: 0.0,
            gdd_target: None,
            maturity_ratio: maturity,
            crop: "maize".into(),
        }]
    }

    #[test]
    fn register_is_idempotent_per_field_and_crop() {
        let mut s = HarvestScheduler::new();
        assert!(s.register("f1", "maize", &series(1.0, 0.5), 4.0, date(10), 0.5));
        assert!(!s.register("f1", "maize", &series(1.0, 0.8), 9.0, date(12), 0.8));
        assert!(s.register("f1", "rice", &series(1.0, 0.8), 3.0, date(12), 0.8));

        assert_eq!(s.tasks().len(), 2);
        assert_eq!(s.task("f1").unwrap().expected_yield_t, 4.0);
        assert_eq!(s.layout().zones.len(), 1);
    }

    #[test]
    fn zone_colour_follows_maturity_and_stress() {
        let mut s = HarvestScheduler::new();
        s.register("young", "maize", &series(1.0, 0.1), 1.0, date(1), 0.1);
        s.register("mid", "maize", &series(0.9, 0.5), 1.0, date(1), 0.5);
        s.register("ripe", "maize", &series(0.9, 0.95), 1.0, date(1), 0.95);
        s.register("dry", "maize", &series(0.4, 0.95), 1.0, date(1), 0.95);

        let colour = |id: &str| s.layout().zone(id).unwrap().color.hex();
        assert_eq!(colour("young"), "#66bb6a");
        assert_eq!(colour("mid"), "#fbc02d");
        assert_eq!(colour("ripe"), "#e53935");
        assert_eq!(colour("dry"), "#8b4513");
    }

    #[test]
    fn plan_is_date_ordered_and_capacity_gated() {
        let mut s = HarvestScheduler::new();
        s.register("c", "maize", &series(1.0, 0.95), 30.0, date(20), 0.95);
        s.register("a", "maize", &series(1.0, 0.5), 40.126, date(5), 0.5);
        s.register("b", "rice", &series(1.0, 0.9), 70.0, date(10), 0.9);

        let plan = s.plan(100.0);
        let ids: Vec<&str> = plan.iter().map(|p| p.field_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(plan[0].expected_yield_t, 40.13);
        assert_eq!(plan[0].grade, Grade::B);
        assert_eq!(plan[1].grade, Grade::A);
        assert_eq!(plan[1].ripe_color, StatusColor::Red);

        assert_eq!(s.plan(1000.0).len(), 3);
    }

    #[test]
    fn plan_keeps_insertion_order_for_same_date() {
        let mut s = HarvestScheduler::new();
        s.register("first", "maize", &series(1.0, 0.5), 1.0, date(5), 0.5);
        s.register("second", "beans", &series(1.0, 0.5), 1.0, date(5), 0.5);
        let plan = s.plan(100.0);
        assert_eq!(plan[0].field_id, "first");
        assert_eq!(plan[1].field_id, "second");
    }

    #[test]
    fn mark_completed_updates_task_and_zone() {
        let mut s = HarvestScheduler::new();
        s.register("f1", "maize", &series(1.0, 0.9), 5.0, date(3), 0.9);
        s.register("f2", "maize", &series(1.0, 0.2), 5.0, date(3), 0.2);

        assert!(s.mark_completed("f1", 4.6));
        assert!(!s.mark_completed("nope", 1.0));

        let task = s.task("f1").unwrap();
        assert!(task.completed);
        assert_eq!(task.actual_yield_t, Some(4.6));
        assert_eq!(s.layout().zone("f1").unwrap().color.hex(), "#8d6e63");

        let summary = s.summarize();
        assert_eq!(summary.total_fields, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.average_maturity, 0.55);
    }

    #[test]
    fn empty_scheduler_summary() {
        let s = HarvestScheduler::new();
        assert_eq!(
            s.summarize(),
            PlanSummary {
                total_fields: 0,
                pending: 0,
                completed: 0,
                average_maturity: 0.0,
            }
        );
        assert!(s.plan(100.0).is_empty());
    }

    #[test]
    fn build_harvest_plan_from_runs() {
        let mut run = RunResult::new("north", series(0.95, 0.92));
        run.yield_t_ha = Some(6.5);
        run.harvest_date = Some(date(1));
        let empty = RunResult::new("ghost", Vec::new());

        let plan = build_harvest_plan(&[run, empty], DEFAULT_STORAGE_CAPACITY_T);
        assert_eq!(plan.summary.total_fields, 1);
        assert_eq!(plan.plan.len(), 1);
        assert_eq!(plan.plan[0].grade, Grade::A);
        assert_eq!(plan.fields[0].crop, "maize");
        assert_eq!(plan.timestamp.len(), "2025-07-01T12:00:00".len());
    }

    #[test]
    fn built_plan_serializes_planned_date_and_hex_colours() {
        let mut s = HarvestScheduler::new();
        s.register("f1", "maize", &series(1.0, 0.95), 4.0, date(1), 0.95);
        let json = serde_json::to_value(s.build_plan(100.0)).unwrap();

        let entry = &json["plan"][0];
        assert_eq!(entry["planned_date"], "2025-07-01");
        assert_eq!(entry["ripe_color"], "#e53935");
        assert!(entry.get("date").is_none());
        assert_eq!(json["fields"][0]["ripe_color"], "#e53935");
    }
}
