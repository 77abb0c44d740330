//! Seven-day activity plan models

use serde::{Deserialize, Serialize};

/// Number of days a weekly plan is expected to cover
pub const DAYS_PER_PLAN: usize = 7;

/// One day of the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(alias = "day")]
    pub day_label: String,
    pub activity: String,
    #[serde(alias = "risk")]
    pub risk_level: String,
}

/// Plan body in the shape the AI service is asked to return
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanContent {
    pub days: Vec<DayPlan>,
    pub general_advice: String,
}

impl WeeklyPlanContent {
    pub fn covers_full_week(&self) -> bool {
        self.days.len() == DAYS_PER_PLAN
    }
}

/// A generated plan, stamped with its generation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    #[serde(flatten)]
    pub content: WeeklyPlanContent,
    #[serde(alias = "generatedAt")]
    pub generated_at_epoch_millis: i64,
}

impl WeeklyPlan {
    pub fn new(content: WeeklyPlanContent, generated_at_epoch_millis: i64) -> Self {
        Self {
            content,
            generated_at_epoch_millis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_legacy_saved_plan() {
        let json = r#"{
            "days": [{"day": "Monday", "activity": "Weed the rows", "risk": "Low"}],
            "generalAdvice": "Keep fields drained.",
            "generatedAt": 1700000000000
        }"#;
        let plan: WeeklyPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.content.days[0].day_label, "Monday");
        assert_eq!(plan.content.days[0].risk_level, "Low");
        assert_eq!(plan.generated_at_epoch_millis, 1_700_000_000_000);
        assert!(!plan.content.covers_full_week());
    }

    #[test]
    fn test_serializes_flat_with_timestamp() {
        let plan = WeeklyPlan::new(
            WeeklyPlanContent {
                days: vec![],
                general_advice: "Rest".to_string(),
            },
            7,
        );
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["generalAdvice"], "Rest");
        assert_eq!(value["generatedAtEpochMillis"], 7);
    }
}
