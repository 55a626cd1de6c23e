use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::field::Grade;

/// Maturity ratio at which a field counts as ready to harvest.
pub const READY_MATURITY: f64 = 0.9;

/// Zone colour shown on the farm layout. Serialized as its hex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
    Stressed,
    Harvested,
}

impl StatusColor {
    /// Ripeness colour for a maturity ratio.
    pub fn for_maturity(maturity: f64) -> Self {
        if maturity < 0.3 {
            StatusColor::Green
        } else if maturity < 0.7 {
            StatusColor::Yellow
        } else {
            StatusColor::Red
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            StatusColor::Green => "#66bb6a",
            StatusColor::Yellow => "#fbc02d",
            StatusColor::Red => "#e53935",
            StatusColor::Stressed => "#8b4513",
            StatusColor::Harvested => "#8d6e63",
        }
    }

    pub fn from_hex(code: &str) -> Option<Self> {
        let code = code.trim();
        [
            StatusColor::Green,
            StatusColor::Yellow,
            StatusColor::Red,
            StatusColor::Stressed,
            StatusColor::Harvested,
        ]
        .into_iter()
        .find(|c| c.hex().eq_ignore_ascii_case(code))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Green => "Immature",
            StatusColor::Yellow => "Ripening",
            StatusColor::Red => "Ripe",
            StatusColor::Stressed => "Water Stressed",
            StatusColor::Harvested => "Harvested",
        }
    }
}

impl std::fmt::Display for StatusColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<StatusColor> for String {
    fn from(color: StatusColor) -> Self {
        color.hex().to_string()
    }
}

impl TryFrom<String> for StatusColor {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        StatusColor::from_hex(&code).ok_or_else(|| format!("unknown status colour '{}'", code))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestTask {
    pub field_id: String,
    pub crop: String,
    pub planned_date: NaiveDate,
    pub expected_yield_t: f64,
    pub maturity_ratio: f64,
    pub ripe_color: StatusColor,
    pub actual_yield_t: Option<f64>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HarvestTask {
    pub fn new(
        field_id: impl Into<String>,
        crop: impl Into<String>,
        planned_date: NaiveDate,
        expected_yield_t: f64,
        maturity_ratio: f64,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            crop: crop.into(),
            planned_date,
            expected_yield_t,
            maturity_ratio,
            ripe_color: StatusColor::for_maturity(maturity_ratio),
            actual_yield_t: None,
            completed: false,
            notes: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.maturity_ratio >= READY_MATURITY
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldZone {
    pub zone_id: String,
    pub label: String,
    pub color: StatusColor,
    pub moisture_status: f64,
    pub maturity_ratio: f64,
}

impl FieldZone {
    pub fn new(zone_id: impl Into<String>) -> Self {
        let zone_id = zone_id.into();
        Self {
            label: zone_id.clone(),
            zone_id,
            color: StatusColor::Green,
            moisture_status: 1.0,
            maturity_ratio: 0.0,
        }
    }
}

/// Visual companion state keyed by zone id, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmLayout {
    pub zones: Vec<FieldZone>,
}

impl FarmLayout {
    pub fn zone(&self, zone_id: &str) -> Option<&FieldZone> {
        self.zones.iter().find(|z| z.zone_id == zone_id)
    }

    pub fn zone_mut_or_insert(&mut self, zone_id: &str) -> &mut FieldZone {
        let idx = match self.zones.iter().position(|z| z.zone_id == zone_id) {
            Some(idx) => idx,
            None => {
                self.zones.push(FieldZone::new(zone_id));
                self.zones.len() - 1
            }
        };
        &mut self.zones[idx]
    }

    pub fn zone_mut(&mut self, zone_id: &str) -> Option<&mut FieldZone> {
        self.zones.iter_mut().find(|z| z.zone_id == zone_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedHarvest {
    pub field_id: String,
    pub crop: String,
    pub planned_date: NaiveDate,
    pub expected_yield_t: f64,
    pub grade: Grade,
    pub maturity_ratio: f64,
    pub ripe_color: StatusColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_fields: usize,
    pub pending: usize,
    pub completed: usize,
    pub average_maturity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestPlan {
    pub summary: PlanSummary,
    pub plan: Vec<PlannedHarvest>,
    pub fields: Vec<HarvestTask>,
    /// Local time, ISO 8601 to the second.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maturity_colour_bands() {
        assert_eq!(StatusColor::for_maturity(0.0), StatusColor::Green);
        assert_eq!(StatusColor::for_maturity(0.29), StatusColor::Green);
        assert_eq!(StatusColor::for_maturity(0.3), StatusColor::Yellow);
        assert_eq!(StatusColor::for_maturity(0.69), StatusColor::Yellow);
        assert_eq!(StatusColor::for_maturity(0.7), StatusColor::Red);
        assert_eq!(StatusColor::Red.hex(), "#e53935");
        assert_eq!(StatusColor::Harvested.hex(), "#8d6e63");
    }

    #[test]
    fn colours_serialize_as_hex_codes() {
        assert_eq!(serde_json::to_string(&StatusColor::Red).unwrap(), "\"#e53935\"");
        let parsed: StatusColor = serde_json::from_str("\"#8B4513\"").unwrap();
        assert_eq!(parsed, StatusColor::Stressed);
        assert!(serde_json::from_str::<StatusColor>("\"red\"").is_err());
    }

    #[test]
    fn planned_harvest_wire_shape() {
        let entry = PlannedHarvest {
            field_id: "north".into(),
            crop: "maize".into(),
            planned_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            expected_yield_t: 6.5,
            grade: Grade::A,
            maturity_ratio: 0.95,
            ripe_color: StatusColor::Red,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["planned_date"], "2025-07-01");
        assert_eq!(json["ripe_color"], "#e53935");
        assert!(json.get("date").is_none());

        let back: PlannedHarvest = serde_json::from_value(json).unwrap();
        assert_eq!(back.planned_date, entry.planned_date);
        assert_eq!(back.ripe_color, StatusColor::Red);
    }

    #[test]
    fn task_readiness() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(HarvestTask::new("f1", "maize", date, 4.0, 0.9).is_ready());
        assert!(!HarvestTask::new("f1", "maize", date, 4.0, 0.89).is_ready());
    }

    #[test]
    fn layout_upserts_zone_once() {
        let mut layout = FarmLayout::default();
        layout.zone_mut_or_insert("north").color = StatusColor::Red;
        layout.zone_mut_or_insert("north").maturity_ratio = 0.8;
        assert_eq!(layout.zones.len(), 1);
        let zone = layout.zone("north").unwrap();
        assert_eq!(zone.color, StatusColor::Red);
        assert_eq!(zone.maturity_ratio, 0.8);
        assert!(layout.zone_mut("south").is_none());
    }
}
